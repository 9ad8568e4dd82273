//! Display-ready data model produced by the forecast aggregator

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Current conditions for one city, as reported by the provider.
///
/// Only `city_name` is guaranteed; every other field degrades to `None`
/// when the provider omits it or sends the wrong type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CurrentConditions {
    pub city_name: String,
    pub country_code: Option<String>,
    pub observed_at: Option<i64>,
    pub temperature_c: Option<f32>,
    pub feels_like_c: Option<f32>,
    pub humidity_pct: Option<u8>,
    pub wind_speed_mps: Option<f32>,
    /// Meteorological wind direction in degrees
    pub wind_deg: Option<f32>,
    pub cloudiness_pct: Option<u8>,
    pub condition_text: Option<String>,
    pub condition_main: Option<String>,
}

impl CurrentConditions {
    /// "Berlin, DE" or just "Berlin" when the country is unknown
    pub fn display_name(&self) -> String {
        match &self.country_code {
            Some(country) => format!("{}, {}", self.city_name, country),
            None => self.city_name.clone(),
        }
    }
}

/// One 3-hour forecast point
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastSample {
    pub epoch_seconds: i64,
    pub temperature_c: f32,
    pub condition_main: String,
    /// Probability of precipitation in `[0, 1]`
    pub precipitation_probability: Option<f32>,
}

/// Parsed forecast response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastPayload {
    pub samples: Vec<ForecastSample>,
    /// Seconds east of UTC for the forecast city
    pub timezone_offset_secs: i32,
}

/// Aggregated forecast for one calendar day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DaySummary {
    pub day_key: NaiveDate,
    pub high_c: i32,
    pub low_c: i32,
    pub representative_condition_main: String,
}

/// Arc-fill position of the current temperature between min and max
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GaugeModel {
    pub min_c: i32,
    pub max_c: i32,
    pub current_c: Option<f32>,
    /// Always within `[0, 1]`
    pub progress: f32,
}

/// Condition icon family. Asset lookup belongs to the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum IconKind {
    Rain,
    Cloud,
    Sun,
}

/// Everything the dashboard renders after one successful fetch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DisplayModel {
    pub current: CurrentConditions,
    /// Up to seven days, ascending by day key
    pub days: Vec<DaySummary>,
    pub gauge: GaugeModel,
    pub rain_chance_pct: Option<u8>,
    /// City offset from UTC, for local date labels
    pub utc_offset_secs: i32,
    /// Epoch seconds at which the model was built
    pub generated_at: i64,
}
