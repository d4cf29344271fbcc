pub mod exchange_service;

pub use exchange_service::ExchangeServiceProvider;
