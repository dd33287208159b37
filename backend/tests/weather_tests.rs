//! Weather gateway tests
//!
//! Covers cache TTL behavior under an injected manual clock, date
//! matching against the forecast horizon, and alternative-date
//! suggestions.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use planner_backend::cache::{Clock, TtlCache};
use planner_backend::error::AppError;
use planner_backend::services::weather::{match_forecast_date, suggest_alternatives, DateMatch};
use shared::models::{EventCategory, WeatherSample};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Manual clock for deterministic TTL expiry
struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 14, 9, 0, 0).unwrap()
}

fn forecast_sample(date: NaiveDate, hour: u32, temp: &str, precip: &str) -> WeatherSample {
    WeatherSample {
        observed_at: date
            .and_hms_opt(hour, 0, 0)
            .unwrap()
            .and_utc(),
        temperature_celsius: dec(temp),
        humidity_percent: None,
        wind_speed_kmh: dec("10.0"),
        condition: "Clear".to_string(),
        description: "clear sky".to_string(),
        precipitation_mm: Decimal::ZERO,
        precipitation_probability_percent: Some(dec(precip)),
    }
}

fn day(offset: i64) -> NaiveDate {
    start_time().date_naive() + Duration::days(offset)
}

// ============================================================================
// Cache Tests
// ============================================================================

#[cfg(test)]
mod cache_tests {
    use super::*;

    #[test]
    fn test_fresh_entry_reads_back_identical() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TtlCache::new(Duration::hours(1), clock);

        let sample = forecast_sample(day(1), 12, "21.5", "15.0");
        let value = serde_json::to_value(&sample).unwrap();
        cache.insert("current:52.37:4.89", value.clone());

        let cached = cache.get("current:52.37:4.89").expect("entry should be fresh");
        assert_eq!(cached, value);

        let round_tripped: WeatherSample = serde_json::from_value(cached).unwrap();
        assert_eq!(round_tripped, sample);
    }

    #[test]
    fn test_entry_within_ttl_survives_clock_advance() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TtlCache::new(Duration::hours(1), clock.clone());

        cache.insert("coords:Amsterdam", serde_json::json!({"lat": "52.37"}));

        clock.advance(Duration::minutes(59));
        assert!(cache.get("coords:Amsterdam").is_some());
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TtlCache::new(Duration::hours(1), clock.clone());

        cache.insert("forecast:52.37:4.89", serde_json::json!([1, 2, 3]));

        clock.advance(Duration::hours(1));
        assert!(cache.get("forecast:52.37:4.89").is_none());
    }

    #[test]
    fn test_reinsert_refreshes_expiry() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TtlCache::new(Duration::hours(1), clock.clone());

        cache.insert("coords:Berlin", serde_json::json!(1));
        clock.advance(Duration::minutes(45));
        cache.insert("coords:Berlin", serde_json::json!(2));
        clock.advance(Duration::minutes(45));

        // 90 minutes after the first insert, but only 45 after the second
        assert_eq!(cache.get("coords:Berlin"), Some(serde_json::json!(2)));
    }

    #[test]
    fn test_keys_are_operation_qualified() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TtlCache::new(Duration::hours(1), clock);

        cache.insert("current:10:20", serde_json::json!("current"));
        cache.insert("forecast:10:20", serde_json::json!("forecast"));

        assert_eq!(cache.get("current:10:20"), Some(serde_json::json!("current")));
        assert_eq!(cache.get("forecast:10:20"), Some(serde_json::json!("forecast")));
    }
}

// ============================================================================
// Date Matching Tests
// ============================================================================

#[cfg(test)]
mod date_matching_tests {
    use super::*;

    const HORIZON: i64 = 14;

    #[test]
    fn test_today_resolves_to_current() {
        let result = match_forecast_date(day(0), day(0), HORIZON, &[]).unwrap();
        assert_eq!(result, DateMatch::Current);
    }

    #[test]
    fn test_past_date_rejected() {
        let err = match_forecast_date(day(-1), day(0), HORIZON, &[]).unwrap_err();
        assert!(matches!(err, AppError::PastDate));
    }

    #[test]
    fn test_beyond_horizon_rejected() {
        let err = match_forecast_date(day(15), day(0), HORIZON, &[]).unwrap_err();
        assert!(matches!(err, AppError::HorizonExceeded(14)));

        // Exactly on the horizon is still allowed
        let result = match_forecast_date(day(14), day(0), HORIZON, &[]).unwrap();
        assert_eq!(result, DateMatch::Unavailable);
    }

    #[test]
    fn test_first_entry_on_target_day_wins() {
        let forecast = vec![
            forecast_sample(day(2), 6, "15.0", "10.0"),
            forecast_sample(day(3), 9, "18.0", "10.0"),
            forecast_sample(day(3), 12, "22.0", "10.0"),
        ];

        let result = match_forecast_date(day(3), day(0), HORIZON, &forecast).unwrap();
        match result {
            DateMatch::Entry(sample) => {
                assert_eq!(sample.temperature_celsius, dec("18.0"));
            }
            other => panic!("expected forecast entry, got {:?}", other),
        }
    }

    /// No matching entry inside the horizon is a soft outcome, not an
    /// error
    #[test]
    fn test_missing_forecast_entry_is_soft_unavailable() {
        let forecast = vec![forecast_sample(day(2), 12, "20.0", "10.0")];
        let result = match_forecast_date(day(5), day(0), HORIZON, &forecast).unwrap();
        assert_eq!(result, DateMatch::Unavailable);
    }
}

// ============================================================================
// Alternative Date Tests
// ============================================================================

#[cfg(test)]
mod alternatives_tests {
    use super::*;

    #[test]
    fn test_warmest_entry_represents_its_day() {
        let forecast = vec![
            forecast_sample(day(1), 6, "12.0", "5.0"),
            forecast_sample(day(1), 12, "24.0", "5.0"),
            forecast_sample(day(1), 18, "17.0", "5.0"),
        ];

        let alternatives = suggest_alternatives(&forecast, EventCategory::OutdoorSports);
        assert_eq!(alternatives.len(), 1);
        assert_eq!(alternatives[0].sample.temperature_celsius, dec("24.0"));
        assert_eq!(alternatives[0].date, day(1));
    }

    #[test]
    fn test_low_scoring_days_discarded() {
        // Days 1 and 2 are hostile (score <= 40), day 3 is pleasant
        let mut rainy_day1 = forecast_sample(day(1), 12, "-5.0", "90.0");
        rainy_day1.condition = "Rain".to_string();
        let mut rainy_day2 = forecast_sample(day(2), 12, "-3.0", "85.0");
        rainy_day2.condition = "Rain".to_string();
        let forecast = vec![
            rainy_day1,
            rainy_day2,
            forecast_sample(day(3), 12, "22.0", "5.0"),
        ];

        let alternatives = suggest_alternatives(&forecast, EventCategory::OutdoorSports);
        assert_eq!(alternatives.len(), 1);
        assert_eq!(alternatives[0].date, day(3));
        assert!(alternatives[0].assessment.score > 40);
    }

    #[test]
    fn test_sorted_descending_and_capped_at_three() {
        // Five qualifying days with distinct scores
        let forecast = vec![
            forecast_sample(day(1), 12, "22.0", "5.0"),  // ideal
            forecast_sample(day(2), 12, "33.0", "5.0"),  // second temp band
            forecast_sample(day(3), 12, "22.0", "25.0"), // second precip band
            forecast_sample(day(4), 12, "22.0", "45.0"), // third precip band
            forecast_sample(day(5), 12, "37.0", "45.0"), // third temp + precip bands
        ];

        let alternatives = suggest_alternatives(&forecast, EventCategory::OutdoorSports);
        assert_eq!(alternatives.len(), 3);
        assert!(alternatives[0].assessment.score >= alternatives[1].assessment.score);
        assert!(alternatives[1].assessment.score >= alternatives[2].assessment.score);
        assert_eq!(alternatives[0].date, day(1));
    }

    #[test]
    fn test_empty_forecast_yields_no_alternatives() {
        let alternatives = suggest_alternatives(&[], EventCategory::Wedding);
        assert!(alternatives.is_empty());
    }
}

// ============================================================================
// Gateway Cache Tests
// ============================================================================

#[cfg(test)]
mod gateway_tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{routing::get, Json, Router};
    use planner_backend::external::weather::WeatherClient;
    use planner_backend::services::weather::WeatherGateway;

    /// Serve a fixed current-conditions payload, counting requests
    async fn spawn_provider(hits: Arc<AtomicUsize>) -> String {
        let payload = serde_json::json!({
            "weather": [{"main": "Clear", "description": "clear sky"}],
            "main": {"temp": 21.5, "humidity": 60},
            "wind": {"speed": 3.0},
            "dt": start_time().timestamp(),
        });

        let app = Router::new().route(
            "/weather",
            get(move || {
                let hits = hits.clone();
                let payload = payload.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(payload)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_second_current_weather_call_within_ttl_skips_upstream() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = spawn_provider(hits.clone()).await;

        let client = WeatherClient::with_base_urls("test-key".to_string(), base.clone(), base);
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = Arc::new(TtlCache::new(Duration::hours(1), clock.clone()));
        let gateway = WeatherGateway::new(client, cache, clock.clone(), 14);

        let first = gateway
            .current_weather(dec("52.37"), dec("4.89"))
            .await
            .unwrap();
        let second = gateway
            .current_weather(dec("52.37"), dec("4.89"))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.temperature_celsius, dec("21.5"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Once the TTL elapses the provider is consulted again
        clock.advance(Duration::hours(1));
        gateway
            .current_weather(dec("52.37"), dec("4.89"))
            .await
            .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_distinct_coordinates_do_not_share_cache_entries() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = spawn_provider(hits.clone()).await;

        let client = WeatherClient::with_base_urls("test-key".to_string(), base.clone(), base);
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = Arc::new(TtlCache::new(Duration::hours(1), clock.clone()));
        let gateway = WeatherGateway::new(client, cache, clock, 14);

        gateway
            .current_weather(dec("52.37"), dec("4.89"))
            .await
            .unwrap();
        gateway
            .current_weather(dec("48.85"), dec("2.35"))
            .await
            .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}

// ============================================================================
// Analysis Assembly Tests
// ============================================================================

#[cfg(test)]
mod analysis_tests {
    use super::*;
    use planner_backend::services::event::build_analysis;
    use shared::scoring;

    #[test]
    fn test_analysis_caps_forecast_at_five_entries() {
        let current = forecast_sample(day(0), 9, "22.0", "5.0");
        let forecast: Vec<WeatherSample> = (1..=8)
            .map(|offset| forecast_sample(day(offset), 12, "20.0", "10.0"))
            .collect();

        let analysis = build_analysis(
            current.clone(),
            forecast,
            EventCategory::Wedding,
            start_time(),
        );

        assert_eq!(analysis.forecast.len(), 5);
        assert_eq!(analysis.last_checked, start_time());
        assert_eq!(
            analysis.current.suitability_score,
            scoring::score(&current, EventCategory::Wedding)
        );

        // Only the current sample carries a recommendation string
        assert!(analysis.current.recommendation.is_some());
        assert!(analysis.forecast.iter().all(|f| f.recommendation.is_none()));
        for entry in &analysis.forecast {
            assert_eq!(
                entry.suitability_score,
                scoring::score(&entry.sample, EventCategory::Wedding)
            );
        }
    }

    #[test]
    fn test_analysis_preserves_forecast_order() {
        let forecast: Vec<WeatherSample> = (1..=5)
            .map(|offset| forecast_sample(day(offset), 12, "20.0", "10.0"))
            .collect();
        let expected: Vec<_> = forecast.iter().map(|s| s.observed_at).collect();

        let analysis = build_analysis(
            forecast_sample(day(0), 9, "22.0", "5.0"),
            forecast,
            EventCategory::Hiking,
            start_time(),
        );

        let kept: Vec<_> = analysis
            .forecast
            .iter()
            .map(|f| f.sample.observed_at)
            .collect();
        assert_eq!(kept, expected);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn forecast_strategy() -> impl Strategy<Value = Vec<WeatherSample>> {
        prop::collection::vec(
            (0i64..=5, 0u32..=23, -200i64..=450, 0i64..=1000),
            0..40,
        )
        .prop_map(|entries| {
            entries
                .into_iter()
                .map(|(offset, hour, temp_tenths, precip_tenths)| {
                    let mut sample = forecast_sample(day(offset), hour, "0.0", "0.0");
                    sample.temperature_celsius = Decimal::new(temp_tenths, 1);
                    sample.precipitation_probability_percent = Some(Decimal::new(precip_tenths, 1));
                    sample
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Alternatives are capped at three, all above the score cutoff,
        /// sorted descending, and one per calendar day
        #[test]
        fn prop_alternatives_invariants(forecast in forecast_strategy()) {
            let alternatives = suggest_alternatives(&forecast, EventCategory::Hiking);

            prop_assert!(alternatives.len() <= 3);
            for pair in alternatives.windows(2) {
                prop_assert!(pair[0].assessment.score >= pair[1].assessment.score);
            }
            for alt in &alternatives {
                prop_assert!(alt.assessment.score > 40);
                prop_assert_eq!(alt.sample.observed_at.date_naive(), alt.date);
            }
            let mut dates: Vec<_> = alternatives.iter().map(|a| a.date).collect();
            dates.sort();
            dates.dedup();
            prop_assert_eq!(dates.len(), alternatives.len());
        }

        /// Date matching never misclassifies the relation between target
        /// and today
        #[test]
        fn prop_date_matching_partitions(offset in -30i64..=30, forecast in forecast_strategy()) {
            let target = day(offset);
            let result = match_forecast_date(target, day(0), 14, &forecast);

            match result {
                Ok(DateMatch::Current) => prop_assert_eq!(offset, 0),
                Ok(DateMatch::Entry(sample)) => {
                    prop_assert!((1..=14).contains(&offset));
                    prop_assert_eq!(sample.observed_at.date_naive(), target);
                }
                Ok(DateMatch::Unavailable) => prop_assert!((1..=14).contains(&offset)),
                Err(AppError::PastDate) => prop_assert!(offset < 0),
                Err(AppError::HorizonExceeded(_)) => prop_assert!(offset > 14),
                Err(other) => return Err(TestCaseError::fail(format!("unexpected error: {other}"))),
            }
        }

        /// Cached snapshots read back deep-equal within the TTL
        #[test]
        fn prop_cache_round_trip(temp_tenths in -200i64..=450, precip_tenths in 0i64..=1000) {
            let clock = Arc::new(ManualClock::new(start_time()));
            let cache = TtlCache::new(Duration::hours(1), clock);

            let mut sample = forecast_sample(day(1), 12, "0.0", "0.0");
            sample.temperature_celsius = Decimal::new(temp_tenths, 1);
            sample.precipitation_probability_percent = Some(Decimal::new(precip_tenths, 1));

            cache.insert("current:1:2", serde_json::to_value(&sample).unwrap());
            let cached: WeatherSample =
                serde_json::from_value(cache.get("current:1:2").unwrap()).unwrap();
            prop_assert_eq!(cached, sample);
        }
    }
}
