//! Actions - intents from the user and results from async tasks

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::DisplayModel;

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Weather category =====
    /// Intent: fetch current conditions and forecast for the current city
    WeatherFetch,

    /// Result: both requests succeeded and the model was built
    WeatherDidLoad { generation: u64, model: DisplayModel },

    /// Result: one of the requests failed
    WeatherDidError { generation: u64, message: String },

    // ===== Search category =====
    /// Open city search overlay
    SearchOpen,

    /// Close search overlay (cancel)
    SearchClose,

    /// Search query text changed
    SearchQueryChange(String),

    /// Switch to the typed city and fetch it
    SearchSubmit(String),

    // ===== UI category =====
    /// Toggle between Celsius and Fahrenheit
    UiToggleUnits,

    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for loading animation
    Tick,

    /// Exit the application
    Quit,
}
