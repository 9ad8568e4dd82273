use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use super::Component;
use crate::action::Action;
use crate::model::CurrentConditions;
use crate::readings;
use crate::state::TempUnit;

/// Right column: humidity, wind, feels-like, cloudiness and rain panels
pub struct InstrumentCluster;

pub struct InstrumentClusterProps<'a> {
    pub current: &'a CurrentConditions,
    pub rain_chance_pct: Option<u8>,
    pub unit: TempUnit,
}

const PLACEHOLDER: &str = "--";

/// One stat tile: label in the border, value, short detail line
struct StatPanel {
    label: &'static str,
    value: String,
    unit: &'static str,
    detail: String,
}

impl StatPanel {
    fn render(self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title(format!(" {} ", self.label.to_uppercase()))
            .title_style(Style::default().fg(Color::Rgb(143, 143, 176)))
            .border_style(Style::default().fg(Color::Rgb(27, 27, 42)));

        let lines = vec![
            Line::from(vec![
                Span::styled(self.value, Style::default().fg(Color::White).bold()),
                Span::styled(
                    format!(" {}", self.unit),
                    Style::default().fg(Color::Rgb(184, 167, 255)),
                ),
            ]),
            Line::from(Span::styled(
                self.detail,
                Style::default().fg(Color::Rgb(143, 143, 176)),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn humidity_panel(current: &CurrentConditions) -> StatPanel {
    StatPanel {
        label: "Humidity",
        value: current
            .humidity_pct
            .map_or_else(|| PLACEHOLDER.into(), |h| h.to_string()),
        unit: "%",
        detail: current
            .humidity_pct
            .map(readings::humidity_comfort)
            .unwrap_or_default()
            .to_string(),
    }
}

fn wind_panel(current: &CurrentConditions) -> StatPanel {
    let kmh = current.wind_speed_mps.map(readings::mps_to_kmh);
    let detail = match (kmh, current.wind_deg) {
        (Some(kmh), Some(deg)) => {
            format!("{} \u{2022} {}", readings::wind_feel(kmh), readings::compass_point(deg))
        }
        (Some(kmh), None) => readings::wind_feel(kmh).to_string(),
        (None, _) => String::new(),
    };
    StatPanel {
        label: "Wind speed",
        value: kmh.map_or_else(|| PLACEHOLDER.into(), |k| format!("{:.0}", k)),
        unit: "km/h",
        detail,
    }
}

fn feels_like_panel(current: &CurrentConditions, unit: TempUnit) -> StatPanel {
    let detail = match (current.temperature_c, current.feels_like_c) {
        (Some(actual), Some(feels)) => readings::feels_like_hint(actual, feels).to_string(),
        _ => String::new(),
    };
    StatPanel {
        label: "Feels like",
        value: current
            .feels_like_c
            .map_or_else(|| PLACEHOLDER.into(), |c| format!("{:.0}", unit.convert(c))),
        unit: unit.symbol(),
        detail,
    }
}

fn cloudiness_panel(current: &CurrentConditions) -> StatPanel {
    StatPanel {
        label: "Cloudiness",
        value: current
            .cloudiness_pct
            .map_or_else(|| PLACEHOLDER.into(), |c| c.to_string()),
        unit: "%",
        detail: current
            .cloudiness_pct
            .map(readings::cloud_cover)
            .unwrap_or_default()
            .to_string(),
    }
}

fn rain_panel(rain_chance_pct: Option<u8>) -> StatPanel {
    StatPanel {
        label: "Chance of rain",
        value: rain_chance_pct.map_or_else(|| PLACEHOLDER.into(), |r| r.to_string()),
        unit: "%",
        detail: rain_chance_pct
            .map(readings::rain_outlook)
            .unwrap_or("No precipitation data")
            .to_string(),
    }
}

impl Component<Action> for InstrumentCluster {
    type Props<'a> = InstrumentClusterProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let rows = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
        ])
        .split(area);
        let top = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(rows[0]);
        let middle = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(rows[1]);

        humidity_panel(props.current).render(frame, top[0]);
        wind_panel(props.current).render(frame, top[1]);
        feels_like_panel(props.current, props.unit).render(frame, middle[0]);
        cloudiness_panel(props.current).render(frame, middle[1]);
        rain_panel(props.rain_chance_pct).render(frame, rows[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    #[test]
    fn test_wind_panel_converts_and_names_direction() {
        let current = CurrentConditions {
            wind_speed_mps: Some(3.9),
            wind_deg: Some(20.0),
            ..Default::default()
        };
        let panel = wind_panel(&current);
        assert_eq!(panel.value, "14");
        assert_eq!(panel.detail, "Moderate breeze \u{2022} NNE");
    }

    #[test]
    fn test_missing_fields_render_placeholders() {
        let current = CurrentConditions::default();
        assert_eq!(humidity_panel(&current).value, PLACEHOLDER);
        assert_eq!(feels_like_panel(&current, TempUnit::Celsius).value, PLACEHOLDER);
        assert_eq!(rain_panel(None).detail, "No precipitation data");
    }

    #[test]
    fn test_render_cluster() {
        let mut render = RenderHarness::new(48, 12);
        let mut cluster = InstrumentCluster;
        let current = CurrentConditions {
            humidity_pct: Some(65),
            cloudiness_pct: Some(40),
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            cluster.render(
                frame,
                frame.area(),
                InstrumentClusterProps {
                    current: &current,
                    rain_chance_pct: Some(20),
                    unit: TempUnit::Celsius,
                },
            );
        });

        assert!(output.contains("HUMIDITY"));
        assert!(output.contains("65 %"));
        assert!(output.contains("CHANCE OF RAIN"));
        assert!(output.contains("Light showers possible"));
    }
}
