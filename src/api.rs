//! OpenWeatherMap API client
//!
//! Responses are read field by field from `serde_json::Value` so a missing or
//! oddly typed field degrades to `None` instead of failing the whole fetch.

use std::time::Duration;

use log::{debug, info};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::config::WeatherConfig;
use crate::error::{ConfigError, FetchError};
use crate::model::{CurrentConditions, ForecastPayload, ForecastSample};

/// Both halves of one successful fetch
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherBundle {
    pub current: CurrentConditions,
    pub forecast: ForecastPayload,
}

/// HTTP client for the current-weather and 5-day/3-hour forecast endpoints
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenWeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn endpoint_url(&self, endpoint: &str, city: &str) -> String {
        format!(
            "{}/{}?q={}&appid={}&units={}",
            self.config.base_url,
            endpoint,
            urlencoding::encode(city),
            urlencoding::encode(&self.config.api_key),
            self.config.units
        )
    }

    async fn get_json(&self, endpoint: &str, city: &str) -> Result<Value, FetchError> {
        debug!("GET /{} for {:?}", endpoint, city);
        let response = self
            .client
            .get(self.endpoint_url(endpoint, city))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::CityNotFound(city.to_string()));
        }
        if !status.is_success() {
            let body: Option<Value> = response.json().await.ok();
            let message = body
                .as_ref()
                .and_then(|v| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Current conditions for `city`
    pub async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, FetchError> {
        let body = self.get_json("weather", city).await?;
        Ok(parse_current(&body, city))
    }

    /// 5-day / 3-hour forecast for `city`
    pub async fn fetch_forecast(&self, city: &str) -> Result<ForecastPayload, FetchError> {
        let body = self.get_json("forecast", city).await?;
        Ok(parse_forecast(&body))
    }

    /// Issue both requests concurrently; either failing fails the bundle.
    pub async fn fetch_bundle(&self, city: &str) -> Result<WeatherBundle, FetchError> {
        let (current, forecast) =
            tokio::try_join!(self.fetch_current(city), self.fetch_forecast(city))?;
        info!(
            "fetched {} with {} forecast samples",
            current.display_name(),
            forecast.samples.len()
        );
        Ok(WeatherBundle { current, forecast })
    }
}

// ============================================================================
// Response extraction
// ============================================================================

fn float_at(value: &Value, pointer: &str) -> Option<f32> {
    value
        .pointer(pointer)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .map(|v| v as f32)
}

fn string_at(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn percent_at(value: &Value, pointer: &str) -> Option<u8> {
    float_at(value, pointer).map(|v| v.round().clamp(0.0, 100.0) as u8)
}

/// Read a current-weather response. `fallback_city` names the result when the
/// provider leaves `name` out.
pub fn parse_current(body: &Value, fallback_city: &str) -> CurrentConditions {
    let current = CurrentConditions {
        city_name: string_at(body, "/name").unwrap_or_else(|| fallback_city.trim().to_string()),
        country_code: string_at(body, "/sys/country"),
        observed_at: body.pointer("/dt").and_then(Value::as_i64),
        temperature_c: float_at(body, "/main/temp"),
        feels_like_c: float_at(body, "/main/feels_like"),
        humidity_pct: percent_at(body, "/main/humidity"),
        wind_speed_mps: float_at(body, "/wind/speed"),
        wind_deg: float_at(body, "/wind/deg"),
        cloudiness_pct: percent_at(body, "/clouds/all"),
        condition_text: string_at(body, "/weather/0/description"),
        condition_main: string_at(body, "/weather/0/main"),
    };
    if current.temperature_c.is_none() {
        debug!("current conditions for {} carry no temperature", current.city_name);
    }
    current
}

fn parse_sample(entry: &Value) -> Option<ForecastSample> {
    Some(ForecastSample {
        epoch_seconds: entry.pointer("/dt").and_then(Value::as_i64)?,
        temperature_c: float_at(entry, "/main/temp")?,
        condition_main: string_at(entry, "/weather/0/main").unwrap_or_default(),
        precipitation_probability: float_at(entry, "/pop").map(|p| p.clamp(0.0, 1.0)),
    })
}

/// Read a forecast response, dropping entries without a timestamp or
/// temperature. Sample order follows the payload.
pub fn parse_forecast(body: &Value) -> ForecastPayload {
    let entries = body
        .get("list")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let samples: Vec<ForecastSample> = entries.iter().filter_map(parse_sample).collect();
    if samples.len() < entries.len() {
        debug!(
            "dropped {} unusable forecast entries",
            entries.len() - samples.len()
        );
    }

    ForecastPayload {
        samples,
        timezone_offset_secs: body
            .pointer("/city/timezone")
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(0),
    }
}
