//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::forecast::AggregatorOptions;
use crate::model::DisplayModel;

/// Temperature unit preference
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    pub fn toggle(&self) -> Self {
        match self {
            TempUnit::Celsius => TempUnit::Fahrenheit,
            TempUnit::Fahrenheit => TempUnit::Celsius,
        }
    }

    pub fn convert(&self, celsius: f32) -> f32 {
        match self {
            TempUnit::Celsius => celsius,
            TempUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TempUnit::Celsius => "°C",
            TempUnit::Fahrenheit => "°F",
        }
    }

    pub fn format(&self, celsius: f32) -> String {
        format!("{:.1}{}", self.convert(celsius), self.symbol())
    }

    /// Whole-degree rendering for the forecast list and gauge bounds
    pub fn format_whole(&self, celsius: i32) -> String {
        format!("{:.0}°", self.convert(celsius as f32))
    }
}

/// Fetch lifecycle as the dashboard sees it.
///
/// Transitions are the consuming methods below; the reducer never pokes at
/// the variants directly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum DisplayState {
    #[default]
    Loading,
    Ready(DisplayModel),
    Error {
        message: String,
        last_known: Option<DisplayModel>,
    },
}

impl DisplayState {
    /// A fetch started. Anything already on screen stays there.
    pub fn begin_fetch(self) -> Self {
        match self {
            DisplayState::Error {
                last_known: Some(model),
                message,
            } => DisplayState::Error {
                message,
                last_known: Some(model),
            },
            DisplayState::Ready(model) => DisplayState::Ready(model),
            DisplayState::Loading | DisplayState::Error { last_known: None, .. } => {
                DisplayState::Loading
            }
        }
    }

    pub fn loaded(self, model: DisplayModel) -> Self {
        DisplayState::Ready(model)
    }

    /// A fetch failed; keep the newest model we had
    pub fn failed(self, message: String) -> Self {
        let last_known = match self {
            DisplayState::Ready(model) => Some(model),
            DisplayState::Error { last_known, .. } => last_known,
            DisplayState::Loading => None,
        };
        DisplayState::Error {
            message,
            last_known,
        }
    }

    /// Model to render, fresh or stale
    pub fn model(&self) -> Option<&DisplayModel> {
        match self {
            DisplayState::Ready(model) => Some(model),
            DisplayState::Error { last_known, .. } => last_known.as_ref(),
            DisplayState::Loading => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DisplayState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DisplayState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, DisplayState::Ready(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DisplayState::Error { .. })
    }
}

/// Animation timing for the header gradient seam.
pub const LOADING_ANIM_TICK_MS: u64 = 15;
pub const LOADING_ANIM_CYCLE_TICKS: u32 = 60;

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Core data (visible in debug) ---
    /// City passed verbatim to the provider
    #[debug(section = "Location", label = "City")]
    pub city: String,

    #[debug(section = "Weather", label = "Display", debug_fmt)]
    pub display: DisplayState,

    /// A fetch is in flight while older data is still shown
    #[debug(section = "Weather", label = "Refreshing")]
    pub is_refreshing: bool,

    /// Incremented per fetch; completions from older fetches are dropped
    #[debug(section = "Weather", label = "Generation")]
    pub request_generation: u64,

    #[debug(section = "Weather", label = "Unit", debug_fmt)]
    pub unit: TempUnit,

    #[debug(section = "Forecast", label = "Options", debug_fmt)]
    pub options: AggregatorOptions,

    // --- Animation internals (skipped) ---
    /// Animation frame counter (for gradient seam)
    #[debug(skip)]
    pub tick_count: u32,

    /// Remaining ticks to finish the current animation cycle after loading
    #[debug(skip)]
    pub loading_anim_ticks_remaining: u32,

    // --- Search mode (skipped) ---
    #[debug(skip)]
    pub search_mode: bool,

    #[debug(skip)]
    pub search_query: String,
}

impl AppState {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            display: DisplayState::Loading,
            is_refreshing: false,
            request_generation: 0,
            unit: TempUnit::default(),
            options: AggregatorOptions::default(),
            tick_count: 0,
            loading_anim_ticks_remaining: 0,
            search_mode: false,
            search_query: String::new(),
        }
    }

    pub fn with_options(mut self, options: AggregatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn loading_anim_active(&self) -> bool {
        self.display.is_loading() || self.is_refreshing || self.loading_anim_ticks_remaining > 0
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new("Berlin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::compute_gauge;
    use crate::model::CurrentConditions;

    fn model(city: &str) -> DisplayModel {
        DisplayModel {
            current: CurrentConditions {
                city_name: city.into(),
                ..Default::default()
            },
            days: Vec::new(),
            gauge: compute_gauge(None, &[]),
            rain_chance_pct: None,
            utc_offset_secs: 0,
            generated_at: 0,
        }
    }

    #[test]
    fn test_failure_keeps_last_model() {
        let state = DisplayState::Loading.loaded(model("Berlin"));
        let state = state.failed("timeout".into());
        assert_eq!(state.error(), Some("timeout"));
        assert_eq!(state.model().unwrap().current.city_name, "Berlin");

        // A second failure still remembers it
        let state = state.begin_fetch().failed("again".into());
        assert_eq!(state.error(), Some("again"));
        assert_eq!(state.model().unwrap().current.city_name, "Berlin");
    }

    #[test]
    fn test_failure_before_first_load_has_no_model() {
        let state = DisplayState::Loading.failed("offline".into());
        assert!(state.is_error());
        assert!(state.model().is_none());
        assert!(state.begin_fetch().is_loading());
    }

    #[test]
    fn test_begin_fetch_keeps_ready_model() {
        let state = DisplayState::Ready(model("Oslo")).begin_fetch();
        assert!(state.is_ready());
    }

    #[test]
    fn test_unit_formatting() {
        assert_eq!(TempUnit::Celsius.format_whole(15), "15°");
        assert_eq!(TempUnit::Fahrenheit.format_whole(15), "59°");
        assert_eq!(TempUnit::Fahrenheit.symbol(), "°F");
    }
}
