pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::fetch::FetchOutcome;
use crate::core::config::{AppConfig, Overrides, Settings};
use crate::core::log::ErrorLog;
use crate::core::request::{RawArgs, validate};
use anyhow::Result;
use tracing::{debug, info};

/// Everything the command line can ask for.
#[derive(Debug, Clone, Default)]
pub struct FetchArgs {
    pub from_currency: String,
    pub to_currency: String,
    pub date: Option<String>,
    pub range: Option<(String, String)>,
    pub overrides: Overrides,
    pub config_path: Option<String>,
}

/// Runs one fetch against the process environment. Any failure is also
/// appended to the error log before it is returned.
pub async fn run(args: FetchArgs) -> Result<FetchOutcome> {
    run_with_env(args, |name| std::env::var(name).ok()).await
}

/// Like [`run`], with environment variables looked up through `env`.
pub async fn run_with_env<F>(args: FetchArgs, env: F) -> Result<FetchOutcome>
where
    F: Fn(&str) -> Option<String>,
{
    info!("Rate fetcher starting...");

    let config = match load_config(args.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            ErrorLog::default().record(&format!("{e:#}"));
            return Err(e);
        }
    };

    let error_log = ErrorLog::new(config.error_log_path());
    let result = execute(&args, &config, env).await;
    if let Err(e) = &result {
        error_log.record(&format!("{e:#}"));
    }
    result
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
}

async fn execute<F>(args: &FetchArgs, config: &AppConfig, env: F) -> Result<FetchOutcome>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = Settings::resolve(&args.overrides, config, env);
    debug!(
        base_url = %settings.base_url,
        timeout = settings.timeout_secs,
        data_dir = %settings.data_dir.display(),
        "Resolved settings"
    );

    let request = validate(&RawArgs {
        from_currency: args.from_currency.clone(),
        to_currency: args.to_currency.clone(),
        date: args.date.clone(),
        range: args.range.clone(),
        api_key: settings.api_key,
        base_url: settings.base_url,
        timeout_secs: settings.timeout_secs,
    })?;

    let provider = providers::exchange_service::ExchangeServiceProvider::from_request(&request)?;
    let store = store::ArtifactStore::new(settings.data_dir);

    cli::fetch::run(&request, &provider, &store).await
}
