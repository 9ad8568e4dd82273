//! Condition art for [`IconKind`], drawn from coloured layers
//!
//! Each icon is one or more layers of ASCII art. Spaces are transparent, so
//! a foreground layer (rain drops) can sit on top of a background (cloud).

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};

use crate::model::IconKind;

mod art {
    pub const SUN: &str = "   \\   /   \n    .-.    \n -- (   ) --\n    `-'    \n   /   \\   ";

    pub const CLOUD_BACK: &str = "           \n    .--.   \n .-(    ). \n           \n           ";
    pub const CLOUD_FRONT: &str = "           \n           \n           \n(___.__)__)\n           ";

    pub const RAIN_CLOUD: &str = "    .-.    \n   (   ).  \n  (___(__) \n           \n           ";
    pub const RAIN_DROPS: &str = "           \n           \n           \n   ' ' '   \n  ' ' '    ";
}

/// Height of every icon in rows
pub const ICON_HEIGHT: u16 = 5;

/// A single art layer with its colour
struct IconLayer {
    content: &'static str,
    color: Color,
}

/// Composite layers into Text, treating spaces as transparent
fn composite_layers(layers: &[IconLayer]) -> Text<'static> {
    if layers.is_empty() {
        return Text::default();
    }

    let layer_lines: Vec<Vec<&str>> = layers.iter().map(|l| l.content.lines().collect()).collect();

    let max_lines = layer_lines.iter().map(|l| l.len()).max().unwrap_or(0);
    let max_width = layer_lines
        .iter()
        .flat_map(|lines| lines.iter())
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    let mut result_lines = Vec::with_capacity(max_lines);

    for line_idx in 0..max_lines {
        let mut spans = Vec::with_capacity(max_width);

        for col_idx in 0..max_width {
            // Last layer is the foreground
            let mut found_char = ' ';
            let mut found_color = Color::Reset;

            for (layer_idx, layer) in layers.iter().enumerate().rev() {
                if let Some(ch) = layer_lines[layer_idx]
                    .get(line_idx)
                    .and_then(|line| line.chars().nth(col_idx))
                {
                    if ch != ' ' {
                        found_char = ch;
                        found_color = layer.color;
                        break;
                    }
                }
            }

            spans.push(Span::styled(
                found_char.to_string(),
                Style::default().fg(found_color),
            ));
        }

        result_lines.push(Line::from(spans));
    }

    Text::from(result_lines)
}

/// Multi-row art for the gauge panel
pub fn icon_art(kind: IconKind) -> Text<'static> {
    let layers = match kind {
        IconKind::Sun => vec![IconLayer {
            content: art::SUN,
            color: Color::Yellow,
        }],
        IconKind::Cloud => vec![
            IconLayer {
                content: art::CLOUD_BACK,
                color: Color::DarkGray,
            },
            IconLayer {
                content: art::CLOUD_FRONT,
                color: Color::Gray,
            },
        ],
        IconKind::Rain => vec![
            IconLayer {
                content: art::RAIN_CLOUD,
                color: Color::Gray,
            },
            IconLayer {
                content: art::RAIN_DROPS,
                color: Color::LightBlue,
            },
        ],
    };
    composite_layers(&layers)
}

/// Single-cell glyph for list rows
pub fn icon_glyph(kind: IconKind) -> &'static str {
    match kind {
        IconKind::Sun => "\u{2600}",
        IconKind::Cloud => "\u{2601}",
        IconKind::Rain => "\u{2614}",
    }
}

pub fn icon_color(kind: IconKind) -> Color {
    match kind {
        IconKind::Sun => Color::Yellow,
        IconKind::Cloud => Color::Gray,
        IconKind::Rain => Color::LightBlue,
    }
}
