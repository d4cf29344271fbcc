pub mod fetch;
pub mod ui;
