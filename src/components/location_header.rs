use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::state::LOADING_ANIM_CYCLE_TICKS;

pub struct LocationHeader;

pub struct LocationHeaderProps<'a> {
    /// City as typed or as named by the provider
    pub title: &'a str,
    /// Country and observation date, when known
    pub subtitle: Option<String>,
    pub temperature: Option<f32>,
    pub is_animating: bool,
    pub tick_count: u32,
}

/// Rows below the FIGlet city name: 1 spacer + 1 subtitle line.
pub const HEADER_OVERHEAD: u16 = 2;

/// Tallest font in the stack (terminus)
pub const HEADER_MAX_HEIGHT: u16 = 6 + HEADER_OVERHEAD;

type Rgb = (u8, u8, u8);

/// Gradient endpoints by upper temperature bound, coldest first
const TEMPERATURE_BANDS: [(f32, Rgb, Rgb); 5] = [
    (0.0, (150, 200, 255), (200, 230, 255)),
    (15.0, (0, 180, 252), (150, 220, 200)),
    (25.0, (0, 180, 252), (155, 93, 229)),
    (35.0, (255, 180, 80), (255, 120, 80)),
    (f32::INFINITY, (255, 100, 80), (255, 60, 60)),
];

const NO_DATA: (Rgb, Rgb) = ((180, 180, 180), (220, 220, 220));

/// Number of evenly spaced stops in the header gradient
const GRADIENT_STOPS: usize = 9;

fn art(rgb: Rgb) -> ArtColor {
    ArtColor::rgb(rgb.0, rgb.1, rgb.2)
}

/// Gradient endpoints for the city name; gray when there is no reading
pub fn gradient_colors(temp: Option<f32>) -> (ArtColor, ArtColor) {
    let (from, to) = temp
        .filter(|t| t.is_finite())
        .and_then(|t| TEMPERATURE_BANDS.iter().find(|(upper, ..)| t < *upper))
        .map_or(NO_DATA, |(_, from, to)| (*from, *to));
    (art(from), art(to))
}

/// Triangle wave over `[0, 1)`: 0 at the ends, 1 in the middle
fn triangle(x: f32) -> f32 {
    1.0 - (2.0 * x.rem_euclid(1.0) - 1.0).abs()
}

/// A there-and-back gradient whose bright seam slides with `phase`
fn make_gradient(colors: (ArtColor, ArtColor), angle: f32, phase: f32) -> Fill {
    let last = (GRADIENT_STOPS - 1) as f32;
    let stops = (0..GRADIENT_STOPS)
        .map(|i| {
            let pos = i as f32 / last;
            let color = colors.0.interpolate(colors.1, triangle(pos - phase));
            artbox::ColorStop::new(pos, color)
        })
        .collect();

    Fill::Linear(LinearGradient::new(angle, stops))
}

fn animated_phase(tick_count: u32) -> f32 {
    let steps = LOADING_ANIM_CYCLE_TICKS.max(1);
    (tick_count % steps) as f32 / steps as f32
}

impl Component<Action> for LocationHeader {
    type Props<'a> = LocationHeaderProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // FIGlet city name
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Country and date
        ])
        .split(area);

        let colors = gradient_colors(props.temperature);
        let phase = if props.is_animating {
            animated_phase(props.tick_count)
        } else {
            0.0
        };
        let fill = make_gradient(colors, 5.0, phase);

        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(fill);

        frame.render_widget(ArtBox::new(&renderer, props.title), chunks[0]);

        if let Some(subtitle) = props.subtitle {
            let line = Line::from(vec![Span::styled(
                subtitle,
                Style::default().fg(Color::DarkGray),
            )])
            .centered();
            frame.render_widget(Paragraph::new(line), chunks[2]);
        }
    }
}
