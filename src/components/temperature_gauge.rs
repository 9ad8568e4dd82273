use artbox::{
    Alignment as ArtAlignment, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Gauge, Paragraph},
};

use super::Component;
use super::icons::{ICON_HEIGHT, icon_art};
use super::location_header::gradient_colors;
use crate::action::Action;
use crate::forecast::pick_condition_icon;
use crate::model::GaugeModel;
use crate::state::TempUnit;

/// Center column: condition art, big temperature, arc-fill bar
pub struct TemperatureGauge;

pub struct TemperatureGaugeProps<'a> {
    pub gauge: &'a GaugeModel,
    /// Short condition ("Clouds") used to pick the icon
    pub condition_main: Option<&'a str>,
    /// Long condition ("scattered clouds") shown under the bar
    pub condition_text: Option<&'a str>,
    pub unit: TempUnit,
}

fn temperature_gradient(celsius: f32) -> Fill {
    let (start, end) = gradient_colors(Some(celsius));
    Fill::Linear(LinearGradient::horizontal(start, end))
}

/// Gauge fill ratio, safe for ratatui's `Gauge::ratio`
fn fill_ratio(progress: f32) -> f64 {
    if progress.is_finite() {
        f64::from(progress.clamp(0.0, 1.0))
    } else {
        0.0
    }
}

impl Component<Action> for TemperatureGauge {
    type Props<'a> = TemperatureGaugeProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = Block::bordered()
            .title(" Temperature ")
            .border_style(Style::default().fg(Color::Rgb(0, 180, 252)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(ICON_HEIGHT), // Condition art
            Constraint::Length(1),
            Constraint::Max(6),    // Temperature
            Constraint::Length(1), // Gauge bar
            Constraint::Length(1), // Min / max
            Constraint::Length(1),
            Constraint::Length(1), // Condition text
        ])
        .flex(Flex::Center)
        .split(inner);

        let icon = pick_condition_icon(props.condition_main.unwrap_or_default());
        frame.render_widget(
            Paragraph::new(icon_art(icon)).alignment(Alignment::Center),
            chunks[0],
        );

        let gauge = props.gauge;
        match gauge.current_c {
            Some(celsius) => {
                let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
                    .with_plain_fallback()
                    .with_alignment(ArtAlignment::Center)
                    .with_fill(temperature_gradient(celsius));
                frame.render_widget(
                    ArtBox::new(&renderer, &props.unit.format(celsius)),
                    chunks[2],
                );
            }
            None => {
                frame.render_widget(
                    Paragraph::new(Line::from("--").centered()),
                    chunks[2],
                );
            }
        }

        let bar = Gauge::default()
            .gauge_style(
                Style::default()
                    .fg(Color::Rgb(0, 180, 252))
                    .bg(Color::Rgb(24, 24, 39)),
            )
            .ratio(fill_ratio(gauge.progress))
            .label(format!("{:.0}%", fill_ratio(gauge.progress) * 100.0));
        frame.render_widget(bar, chunks[3]);

        let range = Line::from(vec![Span::styled(
            format!(
                "Min {} / Max {}",
                props.unit.format_whole(gauge.min_c),
                props.unit.format_whole(gauge.max_c)
            ),
            Style::default().fg(Color::DarkGray),
        )])
        .centered();
        frame.render_widget(Paragraph::new(range), chunks[4]);

        let condition = props
            .condition_text
            .or(props.condition_main)
            .unwrap_or("Conditions unavailable");
        let desc = Line::from(vec![Span::styled(
            condition.to_uppercase(),
            Style::default().fg(Color::Gray),
        )])
        .centered();
        frame.render_widget(Paragraph::new(desc), chunks[6]);
    }
}
