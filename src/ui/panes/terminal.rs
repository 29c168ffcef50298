//! Output pane: printed values, then the final result or the error

use super::utils::{clamp_scroll, pane_block, visible_height};
use crate::interpreter::errors::EvalError;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{List, ListItem, Padding},
    Frame,
};

pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    output: &[String],
    result: Option<&str>,
    error: Option<&EvalError>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Output ".to_string(), is_focused).padding(Padding::new(1, 0, 0, 0));

    let mut items: Vec<Line> = output
        .iter()
        .map(|value| Line::styled(value.clone(), Style::default().fg(DEFAULT_THEME.fg)))
        .collect();

    if let Some(result) = result {
        items.push(Line::styled(
            format!("⇒ {}", result),
            Style::default()
                .fg(DEFAULT_THEME.result)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(error) = error {
        items.push(Line::styled(
            format!("✗ {}", error),
            Style::default()
                .fg(DEFAULT_THEME.error)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if items.is_empty() {
        items.push(Line::styled("(no output)", Style::default().fg(DEFAULT_THEME.comment)));
    }

    let height = visible_height(area);
    clamp_scroll(scroll_offset, items.len(), height);

    let visible: Vec<ListItem> = items
        .into_iter()
        .skip(*scroll_offset)
        .take(height)
        .map(ListItem::new)
        .collect();

    frame.render_widget(List::new(visible).block(block), area);
}
