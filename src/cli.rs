use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

pub mod commands;

use crate::config::AppConfig;
use commands::{forecast, serve};

#[derive(Parser)]
#[command(name = "stockcast")]
#[command(about = "Stock price dashboard with closing price forecasts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server and serve the dashboard
    Serve {
        #[command(flatten)]
        config: AppConfig,
    },
    /// Load prices and print a forecast without starting the server
    ///
    /// Example:
    ///   stockcast forecast --symbol AAPL --start 2020-01-01 --end 2020-12-31 --years 1
    Forecast {
        /// Ticker symbol, e.g. AAPL
        #[arg(long)]
        symbol: String,

        /// First day to load (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Day after the last day to load (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Years to predict (1-5)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=5))]
        years: u32,

        #[command(flatten)]
        config: AppConfig,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve { config } => {
                serve(&config).await?;
            }
            Commands::Forecast {
                symbol,
                start,
                end,
                years,
                config,
            } => {
                forecast(&config, &symbol, start, end, years).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forecast_command() {
        let cli = Cli::try_parse_from([
            "stockcast",
            "forecast",
            "--symbol",
            "AAPL",
            "--start",
            "2020-01-01",
            "--end",
            "2020-12-31",
            "--years",
            "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Forecast {
                symbol,
                start,
                end,
                years,
                ..
            } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(start, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
                assert_eq!(end, NaiveDate::from_ymd_opt(2020, 12, 31).unwrap());
                assert_eq!(years, 2);
            }
            _ => panic!("expected forecast command"),
        }
    }

    #[test]
    fn test_years_out_of_range_rejected() {
        let result = Cli::try_parse_from([
            "stockcast",
            "forecast",
            "--symbol",
            "AAPL",
            "--start",
            "2020-01-01",
            "--end",
            "2020-12-31",
            "--years",
            "6",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["stockcast", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { config } => {
                assert_eq!(config.cache_capacity, 1000);
                assert_eq!(config.cache_ttl_secs, 300);
            }
            _ => panic!("expected serve command"),
        }
    }
}
