//! Bottom help bar and its hover zones.

use std::ops::Range;

use ratatui::{
    style::{Color, Stylize},
    text::{Line, Span},
};

/// Key and description of each help bar entry, left to right.
pub const HELP_ITEMS: [(&str, &str); 5] = [
    ("q", "quit"),
    ("s", "shooting star"),
    ("click", "star burst"),
    ("wheel", "scroll"),
    ("r", "drop/restore context"),
];

const SEPARATOR: &str = "  ";

fn item_width(key: &str, label: &str) -> u16 {
    (key.chars().count() + 1 + label.chars().count()) as u16
}

fn total_width() -> u16 {
    let items: u16 = HELP_ITEMS.iter().map(|(k, l)| item_width(k, l)).sum();
    items + SEPARATOR.len() as u16 * (HELP_ITEMS.len() as u16 - 1)
}

/// The help bar, centered.
pub fn help_line(accent: Color) -> Line<'static> {
    let mut spans: Vec<Span> = Vec::new();
    for (i, (key, label)) in HELP_ITEMS.iter().enumerate() {
        if i > 0 {
            spans.push(SEPARATOR.dark_gray());
        }
        spans.push((*key).bold().fg(accent));
        spans.push(format!(" {label}").dark_gray());
    }
    Line::from(spans).centered()
}

/// Column ranges each help entry occupies on a bar `width` cells wide.
pub fn hover_zones(width: u16) -> Vec<Range<u16>> {
    let mut x = width.saturating_sub(total_width()) / 2;
    HELP_ITEMS
        .iter()
        .map(|(key, label)| {
            let w = item_width(key, label);
            let zone = x..x.saturating_add(w).min(width);
            x = x.saturating_add(w + SEPARATOR.len() as u16);
            zone
        })
        .collect()
}

/// Index of the entry under column `x`.
pub fn entry_at(width: u16, x: u16) -> Option<usize> {
    hover_zones(width).iter().position(|zone| zone.contains(&x))
}
