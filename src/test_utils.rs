#[cfg(test)]
pub mod test_utils {
    use crate::router::create_router;
    use crate::schemas::AppState;
    use async_trait::async_trait;
    use axum::Router;
    use chrono::{Datelike, Duration, NaiveDate, Weekday};
    use compute::prices::{PriceBar, build_price_table, empty_price_table};
    use market::{MarketError, PriceProvider, normalize_symbol};
    use moka::future::Cache;
    use polars::prelude::DataFrame;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// NYSE holidays of 2020 that fall on weekdays.
    const HOLIDAYS_2020: [(u32, u32); 9] = [
        (1, 1),
        (1, 20),
        (2, 17),
        (4, 10),
        (5, 25),
        (7, 3),
        (9, 7),
        (11, 26),
        (12, 25),
    ];

    /// Symbol with one year of synthetic trading days.
    pub const TRADED_SYMBOL: &str = "AAPL";
    /// Symbol whose range only ever holds one trading day.
    pub const SINGLE_DAY_SYMBOL: &str = "ONEDAY";
    /// Symbol for which the provider always fails.
    pub const FAILING_SYMBOL: &str = "FAIL";

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn is_trading_day(day: NaiveDate) -> bool {
        let weekend = matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
        let holiday = day.year() == 2020 && HOLIDAYS_2020.contains(&(day.month(), day.day()));
        !weekend && !holiday
    }

    /// Synthetic daily bars for the trading days in `[start, end)`.
    ///
    /// 2020-01-01..2020-12-31 gives 252 rows.
    pub fn synthetic_bars(start: NaiveDate, end: NaiveDate) -> Vec<PriceBar> {
        let mut bars = Vec::new();
        let mut day = start;
        let mut i = 0.0_f64;
        while day < end {
            if is_trading_day(day) {
                let close = 75.0 + 0.2 * i + 3.0 * (i / 10.0).sin();
                bars.push(PriceBar {
                    date: day,
                    open: Some(close - 0.4),
                    high: Some(close + 1.1),
                    low: Some(close - 1.3),
                    close: Some(close),
                    adj_close: Some(close * 0.98),
                    volume: Some(100_000_000 + (i as u64) * 1_000),
                });
                i += 1.0;
            }
            day += Duration::days(1);
        }
        bars
    }

    /// Provider serving synthetic tables, counting the fetches it answers.
    #[derive(Debug, Default)]
    pub struct StubProvider {
        pub calls: AtomicUsize,
    }

    impl StubProvider {
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceProvider for StubProvider {
        async fn fetch(
            &self,
            symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> market::Result<DataFrame> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let symbol = normalize_symbol(symbol)?;
            if start > end {
                return Err(MarketError::InvalidRange { start, end });
            }

            match symbol.as_str() {
                TRADED_SYMBOL => Ok(build_price_table(synthetic_bars(start, end))?),
                SINGLE_DAY_SYMBOL => {
                    let bars = synthetic_bars(start, end).into_iter().take(1);
                    Ok(build_price_table(bars)?)
                }
                FAILING_SYMBOL => Err(MarketError::Status {
                    status: 503,
                    body: "Service Unavailable".to_string(),
                }),
                _ => Ok(empty_price_table()?),
            }
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    /// Create AppState for testing, returning the provider for call counting
    pub fn setup_test_app_state() -> (AppState, Arc<StubProvider>) {
        let provider = Arc::new(StubProvider::default());
        let cache = Cache::new(100);
        let state = AppState {
            provider: provider.clone(),
            cache,
        };
        (state, provider)
    }

    /// Install a global test subscriber once per test binary.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set. Later calls leave the installed subscriber in place.
    pub fn init_test_tracing() {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let _ = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    }

    /// Create axum app for testing
    pub fn setup_test_app() -> Router {
        init_test_tracing();
        let (state, _) = setup_test_app_state();
        create_router(state, None)
    }

    /// Create axum app for testing together with its provider
    pub fn setup_test_app_with_provider() -> (Router, Arc<StubProvider>) {
        init_test_tracing();
        let (state, provider) = setup_test_app_state();
        (create_router(state, None), provider)
    }

    #[test]
    fn test_tracing_init_is_repeatable() {
        init_test_tracing();
        init_test_tracing();
        assert!(tracing::dispatcher::has_been_set());
    }

    #[test]
    fn test_synthetic_year_has_252_trading_days() {
        let bars = synthetic_bars(date(2020, 1, 1), date(2020, 12, 31));
        assert_eq!(bars.len(), 252);
        assert_eq!(bars[0].date, date(2020, 1, 2));
        assert_eq!(bars.last().unwrap().date, date(2020, 12, 30));
    }
}
