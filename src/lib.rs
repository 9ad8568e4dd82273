//! Weather gauge - gauge-cluster weather dashboard for the terminal
//!
//! The forecast aggregation in [`forecast`] is pure and UI-free; everything
//! else wires it to the OpenWeatherMap API and a tui-dispatch store.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod error;
pub mod forecast;
pub mod logging;
pub mod model;
pub mod readings;
pub mod reducer;
pub mod state;
