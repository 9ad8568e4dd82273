//! Forecast aggregation - pure transforms from provider payloads to a display model
//!
//! Nothing in here performs I/O or keeps state between calls. Partial input
//! produces a partial model rather than an error.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{
    CurrentConditions, DaySummary, DisplayModel, ForecastPayload, ForecastSample, GaugeModel,
    IconKind,
};

/// Longest forecast list the dashboard shows
pub const MAX_FORECAST_DAYS: usize = 7;

/// Samples considered for the rain chance (8 x 3h, roughly a day)
pub const RAIN_WINDOW: usize = 8;

/// Half-width of the gauge window when no forecast is available
const SYNTHETIC_SPAN_C: f32 = 10.0;

/// Gauge window used when neither forecast nor current temperature is known
const DEFAULT_RANGE_C: (i32, i32) = (0, 40);

/// Whether the forecast list starts today or tomorrow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TodayPolicy {
    #[default]
    Exclude,
    Include,
}

impl TodayPolicy {
    fn keeps(self, day: NaiveDate, today: NaiveDate) -> bool {
        match self {
            TodayPolicy::Exclude => day > today,
            TodayPolicy::Include => day >= today,
        }
    }
}

/// Fixed UTC offset used to slice timestamps into calendar days
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DayBoundary {
    offset_secs: i32,
}

impl DayBoundary {
    pub const UTC: DayBoundary = DayBoundary { offset_secs: 0 };

    pub fn with_offset(offset_secs: i32) -> Self {
        Self { offset_secs }
    }

    /// Calendar day containing `epoch_seconds`, or `None` if out of range
    pub fn day_key(&self, epoch_seconds: i64) -> Option<NaiveDate> {
        let shifted = epoch_seconds.checked_add(i64::from(self.offset_secs))?;
        DateTime::from_timestamp(shifted, 0).map(|dt| dt.date_naive())
    }
}

/// Knobs for [`build_display_model`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AggregatorOptions {
    pub today_policy: TodayPolicy,
    /// Bucket days by the city's local time instead of UTC
    pub local_days: bool,
    pub rain_window: usize,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            today_policy: TodayPolicy::default(),
            local_days: false,
            rain_window: RAIN_WINDOW,
        }
    }
}

impl AggregatorOptions {
    pub fn day_boundary(&self, city_offset_secs: i32) -> DayBoundary {
        if self.local_days {
            DayBoundary::with_offset(city_offset_secs)
        } else {
            DayBoundary::UTC
        }
    }
}

struct DayAccumulator<'a> {
    min_c: f32,
    max_c: f32,
    earliest: i64,
    condition: &'a str,
}

impl<'a> DayAccumulator<'a> {
    fn new(sample: &'a ForecastSample) -> Self {
        Self {
            min_c: sample.temperature_c,
            max_c: sample.temperature_c,
            earliest: sample.epoch_seconds,
            condition: &sample.condition_main,
        }
    }

    fn absorb(&mut self, sample: &'a ForecastSample) {
        self.min_c = self.min_c.min(sample.temperature_c);
        self.max_c = self.max_c.max(sample.temperature_c);
        if sample.epoch_seconds < self.earliest {
            self.earliest = sample.epoch_seconds;
            self.condition = &sample.condition_main;
        }
    }

    fn finish(self, day_key: NaiveDate) -> DaySummary {
        DaySummary {
            day_key,
            high_c: round_half_up(self.max_c),
            low_c: round_half_up(self.min_c),
            representative_condition_main: self.condition.to_string(),
        }
    }
}

/// Nearest integer, halves towards positive infinity
fn round_half_up(value: f32) -> i32 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        (floor + 1.0) as i32
    } else {
        floor as i32
    }
}

/// Group samples into per-day high/low summaries.
///
/// The representative condition of a day is the one reported by its earliest
/// sample, whatever order the input arrives in. Output is ascending by day,
/// filtered against `today` per `policy` and capped at [`MAX_FORECAST_DAYS`].
pub fn summarize_days(
    samples: &[ForecastSample],
    today: NaiveDate,
    boundary: DayBoundary,
    policy: TodayPolicy,
) -> Vec<DaySummary> {
    let mut days: BTreeMap<NaiveDate, DayAccumulator<'_>> = BTreeMap::new();
    for sample in samples {
        let Some(key) = boundary.day_key(sample.epoch_seconds) else {
            continue;
        };
        days.entry(key)
            .and_modify(|acc| acc.absorb(sample))
            .or_insert_with(|| DayAccumulator::new(sample));
    }

    days.into_iter()
        .filter(|(key, _)| policy.keeps(*key, today))
        .take(MAX_FORECAST_DAYS)
        .map(|(key, acc)| acc.finish(key))
        .collect()
}

/// Classify a condition string into an icon family.
///
/// Priority matters: "light rain and clouds" is rain, not cloud.
pub fn pick_condition_icon(condition: &str) -> IconKind {
    let text = condition.to_lowercase();
    if ["rain", "drizzle", "thunder"]
        .iter()
        .any(|needle| text.contains(needle))
    {
        IconKind::Rain
    } else if text.contains("cloud") {
        IconKind::Cloud
    } else if text.contains("clear") {
        IconKind::Sun
    } else {
        IconKind::Cloud
    }
}

/// Place the current temperature on a gauge spanning the forecast range.
pub fn compute_gauge(current_c: Option<f32>, samples: &[ForecastSample]) -> GaugeModel {
    let current_c = current_c.filter(|c| c.is_finite());

    let observed = samples
        .iter()
        .map(|s| s.temperature_c)
        .filter(|t| t.is_finite())
        .fold(None, |acc: Option<(f32, f32)>, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        });

    let (min_c, max_c) = match (observed, current_c) {
        (Some((lo, hi)), _) => (lo.floor() as i32, hi.ceil() as i32),
        (None, Some(c)) => (
            (c - SYNTHETIC_SPAN_C).floor() as i32,
            (c + SYNTHETIC_SPAN_C).ceil() as i32,
        ),
        (None, None) => DEFAULT_RANGE_C,
    };

    // Saturated casts can put the bounds at i32::MIN and i32::MAX
    let range = (i64::from(max_c) - i64::from(min_c)).max(1) as f32;
    let progress = current_c.map_or(0.0, |c| (c - min_c as f32).clamp(0.0, range) / range);

    GaugeModel {
        min_c,
        max_c,
        current_c,
        progress,
    }
}

/// Highest precipitation probability in the first `window` samples, as a
/// percentage. `None` when no sample in the window carries a probability.
pub fn compute_rain_chance(samples: &[ForecastSample], window: usize) -> Option<u8> {
    samples
        .iter()
        .take(window)
        .filter_map(|s| s.precipitation_probability)
        .filter(|p| p.is_finite())
        .fold(None, |acc: Option<f32>, p| Some(acc.map_or(p, |max| max.max(p))))
        .map(|p| (p.clamp(0.0, 1.0) * 100.0).round() as u8)
}

/// Build the full dashboard model from one pair of provider responses.
pub fn build_display_model(
    current: CurrentConditions,
    forecast: &ForecastPayload,
    options: &AggregatorOptions,
    now: DateTime<Utc>,
) -> DisplayModel {
    let boundary = options.day_boundary(forecast.timezone_offset_secs);
    let today = boundary
        .day_key(now.timestamp())
        .unwrap_or_else(|| now.date_naive());

    let mut samples = forecast.samples.clone();
    samples.sort_by_key(|s| s.epoch_seconds);

    let days = summarize_days(&samples, today, boundary, options.today_policy);
    let gauge = compute_gauge(current.temperature_c, &samples);
    let rain_chance_pct = compute_rain_chance(&samples, options.rain_window);

    DisplayModel {
        current,
        days,
        gauge,
        rain_chance_pct,
        utc_offset_secs: forecast.timezone_offset_secs,
        generated_at: now.timestamp(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(epoch_seconds: i64, temperature_c: f32, condition: &str) -> ForecastSample {
        ForecastSample {
            epoch_seconds,
            temperature_c,
            condition_main: condition.into(),
            precipitation_probability: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2024-06-01T00:00:00Z
    const JUNE_1: i64 = 1_717_200_000;
    const HOUR: i64 = 3_600;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(14.49), 14);
        assert_eq!(round_half_up(-0.6), -1);
        // Just below a half must not be pushed up by the addition
        assert_eq!(round_half_up(0.49999997), 0);
        assert_eq!(round_half_up(-0.49999997), 0);
    }

    #[test]
    fn test_day_boundary_shifts_late_samples() {
        let late = JUNE_1 + 23 * HOUR;
        assert_eq!(DayBoundary::UTC.day_key(late), Some(date(2024, 6, 1)));
        assert_eq!(
            DayBoundary::with_offset(2 * 3_600).day_key(late),
            Some(date(2024, 6, 2))
        );
    }

    #[test]
    fn test_today_policy() {
        let samples = vec![
            sample(JUNE_1 + 12 * HOUR, 20.0, "Clear"),
            sample(JUNE_1 + 36 * HOUR, 18.0, "Rain"),
        ];
        let today = date(2024, 6, 1);

        let excluded = summarize_days(&samples, today, DayBoundary::UTC, TodayPolicy::Exclude);
        assert_eq!(excluded.len(), 1);
        assert_eq!(excluded[0].day_key, date(2024, 6, 2));

        let included = summarize_days(&samples, today, DayBoundary::UTC, TodayPolicy::Include);
        assert_eq!(included.len(), 2);
        assert_eq!(included[0].day_key, today);
    }

    #[test]
    fn test_summaries_capped_at_seven() {
        let samples: Vec<_> = (1..=10)
            .map(|day| sample(JUNE_1 + day * 24 * HOUR, day as f32, "Clouds"))
            .collect();
        let days = summarize_days(
            &samples,
            date(2024, 6, 1),
            DayBoundary::UTC,
            TodayPolicy::Exclude,
        );
        assert_eq!(days.len(), MAX_FORECAST_DAYS);
        assert_eq!(days[0].day_key, date(2024, 6, 2));
        assert_eq!(days[6].day_key, date(2024, 6, 8));
    }

    #[test]
    fn test_gauge_synthetic_window_from_current() {
        let gauge = compute_gauge(Some(5.5), &[]);
        assert_eq!(gauge.min_c, -5);
        assert_eq!(gauge.max_c, 16);
        assert!((gauge.progress - 10.5 / 21.0).abs() < 1e-6);
    }

    #[test]
    fn test_gauge_survives_extreme_temperatures() {
        let samples = vec![
            sample(JUNE_1, 3.0e9, "Clear"),
            sample(JUNE_1 + HOUR, -3.0e9, "Clear"),
        ];
        let gauge = compute_gauge(Some(20.0), &samples);
        assert_eq!(gauge.min_c, i32::MIN);
        assert_eq!(gauge.max_c, i32::MAX);
        assert!((gauge.progress - 0.5).abs() < 1e-3, "{gauge:?}");
    }

    #[test]
    fn test_gauge_clamps_outside_range() {
        let samples = vec![sample(JUNE_1, 10.0, "Clear"), sample(JUNE_1 + HOUR, 20.0, "Clear")];
        assert_eq!(compute_gauge(Some(35.0), &samples).progress, 1.0);
        assert_eq!(compute_gauge(Some(-3.0), &samples).progress, 0.0);
    }

    #[test]
    fn test_gauge_flat_range_does_not_divide_by_zero() {
        let samples = vec![sample(JUNE_1, 12.0, "Clear")];
        let gauge = compute_gauge(Some(12.0), &samples);
        assert_eq!(gauge.min_c, 12);
        assert_eq!(gauge.max_c, 12);
        assert_eq!(gauge.progress, 0.0);
    }

    #[test]
    fn test_gauge_ignores_nan_current() {
        let gauge = compute_gauge(Some(f32::NAN), &[]);
        assert_eq!(gauge.current_c, None);
        assert_eq!((gauge.min_c, gauge.max_c), DEFAULT_RANGE_C);
        assert_eq!(gauge.progress, 0.0);
    }

    #[test]
    fn test_rain_chance_none_without_probabilities() {
        assert_eq!(compute_rain_chance(&[], RAIN_WINDOW), None);
        let samples = vec![sample(JUNE_1, 10.0, "Clear")];
        assert_eq!(compute_rain_chance(&samples, RAIN_WINDOW), None);
    }

    #[test]
    fn test_rain_chance_ignores_samples_past_window() {
        let mut samples: Vec<_> = (0..10)
            .map(|i| sample(JUNE_1 + i * 3 * HOUR, 10.0, "Rain"))
            .collect();
        for s in samples.iter_mut() {
            s.precipitation_probability = Some(0.1);
        }
        samples[9].precipitation_probability = Some(0.9);
        assert_eq!(compute_rain_chance(&samples, RAIN_WINDOW), Some(10));
    }

    #[test]
    fn test_build_sorts_samples_before_rain_window() {
        let mut samples: Vec<_> = (0..9)
            .rev()
            .map(|i| sample(JUNE_1 + i * 3 * HOUR, 10.0, "Rain"))
            .collect();
        // Chronologically last sample, listed first in the payload
        samples[0].precipitation_probability = Some(1.0);
        samples[8].precipitation_probability = Some(0.2);

        let forecast = ForecastPayload {
            samples,
            timezone_offset_secs: 0,
        };
        let now = DateTime::from_timestamp(JUNE_1, 0).unwrap();
        let model = build_display_model(
            CurrentConditions::default(),
            &forecast,
            &AggregatorOptions::default(),
            now,
        );
        assert_eq!(model.rain_chance_pct, Some(20));
        assert_eq!(model.generated_at, JUNE_1);
    }

    #[test]
    fn test_build_uses_city_offset_for_today() {
        // 23:00 UTC on June 1 is already June 2 in UTC+2
        let now = DateTime::from_timestamp(JUNE_1 + 23 * HOUR, 0).unwrap();
        let forecast = ForecastPayload {
            samples: vec![
                sample(JUNE_1 + 23 * HOUR, 15.0, "Clear"),
                sample(JUNE_1 + 47 * HOUR, 17.0, "Clouds"),
            ],
            timezone_offset_secs: 7_200,
        };
        let options = AggregatorOptions {
            local_days: true,
            ..Default::default()
        };
        let model = build_display_model(CurrentConditions::default(), &forecast, &options, now);
        assert_eq!(model.days.len(), 1);
        assert_eq!(model.days[0].day_key, date(2024, 6, 3));
    }
}
