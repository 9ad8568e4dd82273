//! Reducer - pure function: (state, action) -> DispatchResult

use log::{error, info, warn};
use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, LOADING_ANIM_CYCLE_TICKS};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Weather actions =====
        Action::WeatherFetch => start_fetch(state),

        Action::WeatherDidLoad { generation, model } => {
            if generation != state.request_generation {
                warn!(
                    "dropping stale forecast (generation {}, current {})",
                    generation, state.request_generation
                );
                return DispatchResult::unchanged();
            }
            info!(
                "forecast ready for {}: {} days",
                model.current.display_name(),
                model.days.len()
            );
            state.display = std::mem::take(&mut state.display).loaded(model);
            state.is_refreshing = false;
            state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
            DispatchResult::changed()
        }

        Action::WeatherDidError {
            generation,
            message,
        } => {
            if generation != state.request_generation {
                warn!(
                    "dropping stale error (generation {}, current {}): {}",
                    generation, state.request_generation, message
                );
                return DispatchResult::unchanged();
            }
            error!("weather fetch for {:?} failed: {}", state.city, message);
            state.display = std::mem::take(&mut state.display).failed(message);
            state.is_refreshing = false;
            state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
            DispatchResult::changed()
        }

        // ===== Search actions =====
        Action::SearchOpen => {
            state.search_mode = true;
            state.search_query.clear();
            DispatchResult::changed()
        }

        Action::SearchClose => {
            state.search_mode = false;
            state.search_query.clear();
            DispatchResult::changed()
        }

        Action::SearchQueryChange(query) => {
            state.search_query = query;
            DispatchResult::changed()
        }

        Action::SearchSubmit(query) => {
            let city = query.trim();
            if city.is_empty() {
                return DispatchResult::unchanged();
            }
            state.city = city.to_string();
            state.search_mode = false;
            state.search_query.clear();
            start_fetch(state)
        }

        // ===== UI actions =====
        Action::UiToggleUnits => {
            state.unit = state.unit.toggle();
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            let animating = state.loading_anim_active();
            if animating {
                state.tick_count = state.tick_count.wrapping_add(1);
                if state.loading_anim_ticks_remaining > 0 {
                    state.loading_anim_ticks_remaining -= 1;
                }
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Bump the generation and ask for a fetch; any older in-flight fetch is
/// superseded.
fn start_fetch(state: &mut AppState) -> DispatchResult<Effect> {
    state.request_generation = state.request_generation.wrapping_add(1);
    state.display = std::mem::take(&mut state.display).begin_fetch();
    state.is_refreshing = state.display.model().is_some();
    state.tick_count = 0;
    state.loading_anim_ticks_remaining = 0;
    info!(
        "fetching weather for {:?} (generation {})",
        state.city, state.request_generation
    );
    DispatchResult::changed_with(Effect::FetchWeather {
        city: state.city.clone(),
        generation: state.request_generation,
        options: state.options.clone(),
    })
}

fn ticks_to_phase_zero(tick_count: u32) -> u32 {
    let cycle = LOADING_ANIM_CYCLE_TICKS.max(1);
    if tick_count == 0 {
        return cycle;
    }
    let remainder = tick_count % cycle;
    if remainder == 0 { 0 } else { cycle - remainder }
}
