use anyhow::bail;
use clap::{ArgAction, Parser};
use fxrate::cli::ui::{StyleType, style_text};
use fxrate::core::config::Overrides;
use fxrate::core::log::{ErrorLog, init_logging};
use std::path::PathBuf;
use std::process::ExitCode;

/// Fetch currency exchange rates from the rate service and save them as JSON
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Three-letter currency code to convert from
    from_currency: String,

    /// Three-letter currency code to convert to
    to_currency: String,

    /// Date of the rate in YYYY-MM-DD format
    date: Option<String>,

    /// Inclusive date range in YYYY-MM-DD format
    #[arg(
        long,
        num_args = 2,
        value_names = ["START", "END"],
        action = ArgAction::Set,
        conflicts_with = "date"
    )]
    range: Option<Vec<String>>,

    /// API key for the service (defaults to EXCHANGE_API_KEY or API_KEY env variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL for the service (defaults to EXCHANGE_API_BASE_URL or API_BASE_URL env variable)
    #[arg(long)]
    base_url: Option<String>,

    /// HTTP request timeout in seconds [default: 10]
    #[arg(long)]
    timeout: Option<f64>,

    /// Directory to write JSON files to [default: data]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl TryFrom<Cli> for fxrate::FetchArgs {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> anyhow::Result<fxrate::FetchArgs> {
        let range = match cli.range {
            Some(bounds) => match <[String; 2]>::try_from(bounds) {
                Ok([start, end]) => Some((start, end)),
                Err(bounds) => bail!(
                    "--range expects exactly START and END, got {} values",
                    bounds.len()
                ),
            },
            None => None,
        };

        Ok(fxrate::FetchArgs {
            from_currency: cli.from_currency,
            to_currency: cli.to_currency,
            date: cli.date,
            range,
            overrides: Overrides {
                api_key: cli.api_key,
                base_url: cli.base_url,
                timeout: cli.timeout,
                output_dir: cli.output_dir,
            },
            config_path: cli.config_path,
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            if !e.use_stderr() {
                return ExitCode::SUCCESS;
            }
            let message = e.to_string();
            ErrorLog::default().record(message.lines().next().unwrap_or_default());
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.verbose);

    let result = match fxrate::FetchArgs::try_from(cli) {
        Ok(args) => fxrate::run(args).await,
        Err(e) => {
            ErrorLog::default().record(&format!("{e:#}"));
            Err(e)
        }
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Application failed");
            eprintln!("{} {e:#}", style_text("Error:", StyleType::Error));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("fxrate").chain(args.iter().copied()))
    }

    #[test]
    fn test_single_date_args() {
        let cli = parse(&["usd", "eur", "2024-01-01", "--api-key", "k", "--timeout", "2.5"]).unwrap();
        let args = fxrate::FetchArgs::try_from(cli).unwrap();

        assert_eq!(args.from_currency, "usd");
        assert_eq!(args.to_currency, "eur");
        assert_eq!(args.date.as_deref(), Some("2024-01-01"));
        assert!(args.range.is_none());
        assert_eq!(args.overrides.api_key.as_deref(), Some("k"));
        assert_eq!(args.overrides.timeout, Some(2.5));
    }

    #[test]
    fn test_range_args() {
        let cli = parse(&["USD", "EUR", "--range", "2024-01-01", "2024-01-03"]).unwrap();
        let args = fxrate::FetchArgs::try_from(cli).unwrap();

        assert!(args.date.is_none());
        assert_eq!(
            args.range,
            Some(("2024-01-01".to_string(), "2024-01-03".to_string()))
        );
    }

    #[test]
    fn test_repeated_range_is_rejected() {
        let err = parse(&[
            "USD",
            "EUR",
            "2024-01-01",
            "--range",
            "2024-01-01",
            "2024-01-02",
            "--range",
            "2024-01-03",
            "2024-01-04",
            "--api-key",
            "k",
        ])
        .err()
        .expect("repeated --range must not parse");

        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_date_and_range_conflict() {
        let err = parse(&["USD", "EUR", "2024-01-01", "--range", "2024-01-01", "2024-01-02"])
            .err()
            .expect("DATE with --range must not parse");

        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_range_needs_two_values() {
        assert!(parse(&["USD", "EUR", "--range", "2024-01-01"]).is_err());
    }

    #[test]
    fn test_bad_range_arity_is_an_error_not_dropped() {
        let mut cli = parse(&["USD", "EUR", "--range", "2024-01-01", "2024-01-02"]).unwrap();
        cli.range = Some(vec![
            "2024-01-01".to_string(),
            "2024-01-02".to_string(),
            "2024-01-03".to_string(),
        ]);

        let err = fxrate::FetchArgs::try_from(cli).unwrap_err();
        assert!(err.to_string().contains("--range expects exactly START and END"));
    }
}
