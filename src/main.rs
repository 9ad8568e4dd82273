//! Weather gauge - gauge-cluster weather dashboard for the terminal

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_components::centered_rect;
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use weather_gauge::action::Action;
use weather_gauge::api::OpenWeatherClient;
use weather_gauge::components::{
    Component, Dashboard, DashboardProps, SearchOverlay, SearchOverlayProps,
};
use weather_gauge::config::{API_KEY_ENV, AppConfig, LogLevel, WeatherConfig, resolve_api_key};
use weather_gauge::effect::Effect;
use weather_gauge::forecast::{AggregatorOptions, TodayPolicy, build_display_model};
use weather_gauge::logging;
use weather_gauge::reducer::reducer;
use weather_gauge::state::{AppState, LOADING_ANIM_TICK_MS};

/// Current conditions and a week of highs and lows, drawn as a gauge cluster
#[derive(Parser, Debug)]
#[command(name = "weather-gauge")]
#[command(about = "A gauge-cluster weather dashboard for the terminal")]
struct Args {
    /// City passed to the provider as-is, e.g. "London" or "London,GB"
    #[arg(long, short, default_value = "Berlin")]
    city: String,

    /// OpenWeatherMap API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Refresh interval in seconds (minimum 1)
    #[arg(long, short, default_value = "600", value_parser = clap::value_parser!(u64).range(1..))]
    refresh_interval: u64,

    /// Count today's remaining samples in the daily forecast
    #[arg(long)]
    include_today: bool,

    /// Split days at the city's local midnight instead of UTC midnight
    #[arg(long)]
    local_days: bool,

    /// Number of upcoming samples used for the chance of rain
    #[arg(long, default_value = "8", value_parser = clap::value_parser!(u64).range(1..))]
    rain_window: u64,

    /// Provider base URL
    #[arg(long, default_value = weather_gauge::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Log file (defaults to weather-gauge.log in the temp directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(flatten)]
    debug: DebugCliArgs,
}

impl Args {
    fn into_config(self, api_key: String) -> (AppConfig, DebugCliArgs) {
        let aggregator = AggregatorOptions {
            today_policy: if self.include_today {
                TodayPolicy::Include
            } else {
                TodayPolicy::Exclude
            },
            local_days: self.local_days,
            rain_window: self.rain_window as usize,
        };
        let weather = WeatherConfig::new(api_key)
            .with_base_url(self.base_url)
            .with_timeout(self.timeout);
        let config = AppConfig {
            city: self.city,
            weather,
            aggregator,
            refresh_interval_secs: self.refresh_interval,
        };
        (config, self.debug)
    }
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum WeatherComponentId {
    Dashboard,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum WeatherContext {
    Main,
    Search,
}

impl EventRoutingState<WeatherComponentId, WeatherContext> for AppState {
    fn focused(&self) -> Option<WeatherComponentId> {
        if self.search_mode {
            Some(WeatherComponentId::Search)
        } else {
            Some(WeatherComponentId::Dashboard)
        }
    }

    fn modal(&self) -> Option<WeatherComponentId> {
        if self.search_mode {
            Some(WeatherComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: WeatherComponentId) -> WeatherContext {
        match id {
            WeatherComponentId::Dashboard => WeatherContext::Main,
            WeatherComponentId::Search => WeatherContext::Search,
        }
    }

    fn default_context(&self) -> WeatherContext {
        WeatherContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::init(&log_path, args.log_level.into()) {
        eprintln!("Warning: could not open log file {}: {}", log_path.display(), e);
    }

    let api_key = match resolve_api_key(args.api_key.as_deref()) {
        Ok(key) => key,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let (config, debug_args) = args.into_config(api_key);
    let client = match OpenWeatherClient::new(config.weather.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "starting for {:?} (refresh every {}s, {:?})",
        config.city, config.refresh_interval_secs, config.aggregator
    );

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let city = config.city.clone();
    let aggregator = config.aggregator.clone();
    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(city).with_options(aggregator))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &debug,
        store,
        client,
        config.refresh_interval_secs,
        replay_actions,
    )
    .await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    info!("shutting down");
    Ok(())
}

struct WeatherUi {
    dashboard: Dashboard,
    search: SearchOverlay,
}

impl WeatherUi {
    fn new() -> Self {
        Self {
            dashboard: Dashboard,
            search: SearchOverlay::new(),
        }
    }

    fn search_props(state: &AppState, is_focused: bool) -> SearchOverlayProps<'_> {
        SearchOverlayProps {
            query: &state.search_query,
            current_city: &state.city,
            is_focused,
            on_query_change: Action::SearchQueryChange,
            on_query_submit: Action::SearchSubmit,
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<WeatherComponentId>,
    ) {
        event_ctx.set_component_area(WeatherComponentId::Dashboard, area);

        let props = DashboardProps {
            state,
            is_focused: render_ctx.is_focused() && !state.search_mode,
        };
        self.dashboard.render(frame, area, props);

        self.search.set_open(state.search_mode);
        if state.search_mode {
            let modal_area = centered_rect(60, 8, area);
            event_ctx.set_component_area(WeatherComponentId::Search, modal_area);
            let props = Self::search_props(state, render_ctx.is_focused());
            self.search.render(frame, area, props);
        } else {
            event_ctx
                .component_areas
                .remove(&WeatherComponentId::Search);
        }
    }

    fn handle_dashboard_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = DashboardProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .dashboard
            .handle_event(event, props)
            .into_iter()
            .collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.search.set_open(state.search_mode);
        let props = Self::search_props(state, true);
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    client: OpenWeatherClient,
    refresh_interval: u64,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(WeatherUi::new()));
    let mut bus: EventBus<AppState, Action, WeatherComponentId, WeatherContext> = EventBus::new();
    let keybindings: Keybindings<WeatherContext> = Keybindings::new();

    let ui_dashboard = Rc::clone(&ui);
    bus.register(WeatherComponentId::Dashboard, move |event, state| {
        ui_dashboard
            .borrow_mut()
            .handle_dashboard_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(WeatherComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::WeatherFetch),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );

                runtime.subscriptions().interval(
                    "refresh",
                    Duration::from_secs(refresh_interval),
                    || Action::WeatherFetch,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &client),
        )
        .await
}

/// Handle effects by spawning tasks. Reusing the "weather" key cancels any
/// fetch still in flight.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, client: &OpenWeatherClient) {
    match effect {
        Effect::FetchWeather {
            city,
            generation,
            options,
        } => {
            let client = client.clone();
            ctx.tasks().spawn("weather", async move {
                match client.fetch_bundle(&city).await {
                    Ok(bundle) => Action::WeatherDidLoad {
                        generation,
                        model: build_display_model(
                            bundle.current,
                            &bundle.forecast,
                            &options,
                            Utc::now(),
                        ),
                    },
                    Err(e) => Action::WeatherDidError {
                        generation,
                        message: e.to_string(),
                    },
                }
            });
        }
    }
}
