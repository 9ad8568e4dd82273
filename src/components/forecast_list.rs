use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use super::Component;
use super::icons::{icon_color, icon_glyph};
use crate::action::Action;
use crate::forecast::{MAX_FORECAST_DAYS, pick_condition_icon};
use crate::model::DaySummary;
use crate::readings::weekday_label;
use crate::state::TempUnit;

/// "Next 7 days" column
pub struct ForecastList;

pub struct ForecastListProps<'a> {
    pub days: &'a [DaySummary],
    pub unit: TempUnit,
}

fn day_row(day: &DaySummary, unit: TempUnit) -> Line<'static> {
    let icon = pick_condition_icon(&day.representative_condition_main);
    Line::from(vec![
        Span::styled(
            format!("{:<5}", weekday_label(day.day_key)),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("{} ", icon_glyph(icon)),
            Style::default().fg(icon_color(icon)),
        ),
        Span::styled(
            format!("{:>5}", unit.format_whole(day.high_c)),
            Style::default().fg(Color::White).bold(),
        ),
        Span::raw(" "),
        Span::styled(
            format!("{:>5}", unit.format_whole(day.low_c)),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

impl Component<Action> for ForecastList {
    type Props<'a> = ForecastListProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = Block::bordered()
            .title(format!(" Next {} days ", MAX_FORECAST_DAYS))
            .border_style(Style::default().fg(Color::Rgb(42, 42, 61)));

        let lines: Vec<Line> = if props.days.is_empty() {
            vec![Line::from(Span::styled(
                "No forecast data",
                Style::default().fg(Color::DarkGray),
            ))
            .centered()]
        } else {
            props
                .days
                .iter()
                .map(|day| day_row(day, props.unit))
                .collect()
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
