//! Instrument-cluster readings: unit conversions and short descriptive labels

use chrono::{DateTime, NaiveDate};

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

pub fn mps_to_kmh(mps: f32) -> f32 {
    mps * 3.6
}

/// 16-point compass direction the wind blows from
pub fn compass_point(deg: f32) -> &'static str {
    let sector = (deg.rem_euclid(360.0) / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[sector]
}

pub fn humidity_comfort(pct: u8) -> &'static str {
    match pct {
        0..=29 => "Dry air",
        30..=60 => "Comfort zone",
        61..=80 => "Slightly humid",
        _ => "Very humid",
    }
}

pub fn wind_feel(kmh: f32) -> &'static str {
    match kmh {
        k if k < 2.0 => "Calm",
        k if k < 12.0 => "Light breeze",
        k if k < 29.0 => "Moderate breeze",
        k if k < 50.0 => "Strong wind",
        _ => "Gale",
    }
}

pub fn cloud_cover(pct: u8) -> &'static str {
    match pct {
        0..=10 => "Clear skies",
        11..=50 => "Partly cloudy",
        51..=84 => "Mostly cloudy",
        _ => "Overcast",
    }
}

pub fn rain_outlook(pct: u8) -> &'static str {
    match pct {
        0..=9 => "Dry for the next 24 hrs",
        10..=39 => "Light showers possible",
        40..=69 => "Rain likely",
        _ => "Rain expected, take an umbrella",
    }
}

/// Feels-like hint relative to the measured temperature
pub fn feels_like_hint(actual_c: f32, feels_c: f32) -> &'static str {
    let delta = feels_c - actual_c;
    if delta <= -2.0 {
        "Wind chill"
    } else if delta >= 2.0 {
        "Feels warmer"
    } else {
        "Close to actual"
    }
}

/// "MON", "TUE", ...
pub fn weekday_label(day: NaiveDate) -> String {
    day.format("%a").to_string().to_uppercase()
}

/// "Mon, Jun 3" for an epoch timestamp shifted by `offset_secs`
pub fn observation_date(epoch_seconds: i64, offset_secs: i32) -> Option<String> {
    let shifted = epoch_seconds.checked_add(i64::from(offset_secs))?;
    DateTime::from_timestamp(shifted, 0).map(|dt| dt.format("%a, %b %-d").to_string())
}
