use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Flex, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::location_header::HEADER_MAX_HEIGHT;
use super::{
    Component, ForecastList, ForecastListProps, InstrumentCluster, InstrumentClusterProps,
    LocationHeader, LocationHeaderProps, TemperatureGauge, TemperatureGaugeProps,
};
use crate::action::Action;
use crate::model::DisplayModel;
use crate::readings::observation_date;
use crate::state::{AppState, DisplayState};

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";

/// Props for Dashboard - read-only view of state
pub struct DashboardProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The main screen: header, forecast list, gauge and instrument cluster
#[derive(Default)]
pub struct Dashboard;

impl Component<Action> for Dashboard {
    type Props<'a> = DashboardProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('r') | KeyCode::F(5) => Some(Action::WeatherFetch),
                KeyCode::Char('/') => Some(Action::SearchOpen),
                KeyCode::Char('u') => Some(Action::UiToggleUnits),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: DashboardProps<'_>) {
        let chunks = Layout::vertical([
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let state = props.state;
        match DashboardView::from_state(&state.display) {
            DashboardView::Ready { model, error } => {
                render_ready(frame, chunks[0], state, model, error);
            }
            DashboardView::Loading => render_loading(frame, chunks[0], state),
            DashboardView::Failed(error) => render_error(frame, chunks[0], error),
        }

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[1],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("r", "refresh"),
                    StatusBarHint::new("/", "search"),
                    StatusBarHint::new("u", "units"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

// ============================================================================
// Views
// ============================================================================

enum DashboardView<'a> {
    /// Fresh model, or a stale one kept after a failed fetch
    Ready {
        model: &'a DisplayModel,
        error: Option<&'a str>,
    },
    Loading,
    Failed(&'a str),
}

impl<'a> DashboardView<'a> {
    fn from_state(display: &'a DisplayState) -> Self {
        match display {
            DisplayState::Ready(model) => DashboardView::Ready { model, error: None },
            DisplayState::Error {
                message,
                last_known: Some(model),
            } => DashboardView::Ready {
                model,
                error: Some(message),
            },
            DisplayState::Error {
                message,
                last_known: None,
            } => DashboardView::Failed(message),
            DisplayState::Loading => DashboardView::Loading,
        }
    }
}

fn header_subtitle(model: &DisplayModel) -> Option<String> {
    let date = model
        .current
        .observed_at
        .and_then(|ts| observation_date(ts, model.utc_offset_secs));
    match (model.current.country_code.as_deref(), date) {
        (Some(country), Some(date)) => Some(format!("{} \u{2022} {}", country, date)),
        (Some(country), None) => Some(country.to_string()),
        (None, date) => date,
    }
}

fn render_ready(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    model: &DisplayModel,
    error: Option<&str>,
) {
    let chunks = Layout::vertical([
        Constraint::Max(HEADER_MAX_HEIGHT),
        Constraint::Length(1), // Status line
        Constraint::Min(12),   // Columns
    ])
    .split(area);

    let mut header = LocationHeader;
    header.render(
        frame,
        chunks[0],
        LocationHeaderProps {
            title: &model.current.city_name,
            subtitle: header_subtitle(model),
            temperature: model.current.temperature_c,
            is_animating: state.loading_anim_active(),
            tick_count: state.tick_count,
        },
    );

    if let Some(line) = status_line(state, error) {
        frame.render_widget(Paragraph::new(line), chunks[1]);
    }

    let columns = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ])
    .spacing(1)
    .split(chunks[2]);

    let mut forecast = ForecastList;
    forecast.render(
        frame,
        columns[0],
        ForecastListProps {
            days: &model.days,
            unit: state.unit,
        },
    );

    let mut gauge = TemperatureGauge;
    gauge.render(
        frame,
        columns[1],
        TemperatureGaugeProps {
            gauge: &model.gauge,
            condition_main: model.current.condition_main.as_deref(),
            condition_text: model.current.condition_text.as_deref(),
            unit: state.unit,
        },
    );

    let mut cluster = InstrumentCluster;
    cluster.render(
        frame,
        columns[2],
        InstrumentClusterProps {
            current: &model.current,
            rain_chance_pct: model.rain_chance_pct,
            unit: state.unit,
        },
    );
}

fn status_line(state: &AppState, error: Option<&str>) -> Option<Line<'static>> {
    if let Some(error) = error {
        return Some(
            Line::from(vec![
                Span::styled(
                    format!("{} {}", ERROR_ICON, error),
                    Style::default().fg(Color::Rgb(200, 100, 100)),
                ),
                Span::styled(
                    "  \u{2022}  showing last data, press ",
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled("r", Style::default().fg(Color::Cyan).bold()),
                Span::styled(" to retry", Style::default().fg(Color::DarkGray)),
            ])
            .centered(),
        );
    }
    if state.is_refreshing {
        return Some(
            Line::from(Span::styled(
                format!("Refreshing {}...", state.city),
                Style::default().fg(Color::DarkGray),
            ))
            .centered(),
        );
    }
    None
}

fn render_loading(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::vertical([
        Constraint::Max(HEADER_MAX_HEIGHT),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .flex(Flex::Center)
    .split(area);

    let mut header = LocationHeader;
    header.render(
        frame,
        chunks[0],
        LocationHeaderProps {
            title: &state.city,
            subtitle: None,
            temperature: None,
            is_animating: state.loading_anim_active(),
            tick_count: state.tick_count,
        },
    );

    let msg = Line::from(vec![Span::styled(
        "Loading...",
        Style::default().fg(Color::DarkGray),
    )])
    .centered();
    frame.render_widget(Paragraph::new(msg), chunks[2]);
}

fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // blank
        Constraint::Length(1), // icon
        Constraint::Length(1), // "Error"
        Constraint::Length(1), // message
        Constraint::Length(1), // blank
        Constraint::Length(1), // hint
    ])
    .flex(Flex::Center)
    .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(ERROR_ICON).centered()),
        chunks[1],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![Span::styled(
                "Error",
                Style::default().fg(Color::Red).bold(),
            )])
            .centered(),
        ),
        chunks[2],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![Span::styled(
                error.to_string(),
                Style::default().fg(Color::Rgb(200, 100, 100)),
            )])
            .centered(),
        ),
        chunks[3],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::DarkGray)),
                Span::styled("r", Style::default().fg(Color::Cyan).bold()),
                Span::styled(" to retry or ", Style::default().fg(Color::DarkGray)),
                Span::styled("/", Style::default().fg(Color::Cyan).bold()),
                Span::styled(" to search", Style::default().fg(Color::DarkGray)),
            ])
            .centered(),
        ),
        chunks[5],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CurrentConditions;
    use tui_dispatch::testing::*;

    fn model() -> DisplayModel {
        DisplayModel {
            current: CurrentConditions {
                city_name: "Berlin".into(),
                country_code: Some("DE".into()),
                observed_at: Some(1_717_243_200),
                ..Default::default()
            },
            days: Vec::new(),
            gauge: crate::forecast::compute_gauge(None, &[]),
            rain_chance_pct: None,
            utc_offset_secs: 7_200,
            generated_at: 0,
        }
    }

    #[test]
    fn test_handle_event_refresh() {
        let mut component = Dashboard;
        let state = AppState::default();
        let props = DashboardProps {
            state: &state,
            is_focused: true,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("r")), props)
            .into_iter()
            .collect();
        actions.assert_count(1);
        actions.assert_first(Action::WeatherFetch);
    }

    #[test]
    fn test_handle_event_search() {
        let mut component = Dashboard;
        let state = AppState::default();
        let props = DashboardProps {
            state: &state,
            is_focused: true,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("/")), props)
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchOpen);
    }

    #[test]
    fn test_handle_event_unfocused_ignores() {
        let mut component = Dashboard;
        let state = AppState::default();
        let props = DashboardProps {
            state: &state,
            is_focused: false,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("r")), props)
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_header_subtitle() {
        // 2024-06-01T12:00Z, shown in UTC+2
        assert_eq!(
            header_subtitle(&model()).as_deref(),
            Some("DE \u{2022} Sat, Jun 1")
        );

        let mut bare = model();
        bare.current.country_code = None;
        bare.current.observed_at = None;
        assert_eq!(header_subtitle(&bare), None);
    }

    #[test]
    fn test_status_line_prefers_error() {
        let state = AppState {
            is_refreshing: true,
            ..Default::default()
        };
        let line = status_line(&state, Some("timeout")).unwrap();
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("timeout"));
        assert!(status_line(&AppState::default(), None).is_none());
    }

    #[test]
    fn test_render_loading() {
        let mut render = RenderHarness::new(80, 24);
        let mut component = Dashboard;
        let state = AppState::default();

        let output = render.render_to_string_plain(|frame| {
            let props = DashboardProps {
                state: &state,
                is_focused: true,
            };
            component.render(frame, frame.area(), props);
        });

        assert!(output.contains("Loading..."));
    }
}
