// Shared helpers for the list-style panes

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

pub(super) fn pane_block(title: String, is_focused: bool) -> Block<'static> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Rows available inside a bordered pane, at least one
pub(super) fn visible_height(area: Rect) -> usize {
    area.height.saturating_sub(2).max(1) as usize
}

/// Clamp a scroll offset so the last page stays full
pub(super) fn clamp_scroll(scroll_offset: &mut usize, total_items: usize, visible_height: usize) {
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }
}

/// Split `#12: Ap #3 #4` into styled address, node kind and operands
pub(super) fn highlight_entry(entry: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let rest = match entry.split_once(": ") {
        Some((addr, rest)) => {
            spans.push(Span::styled(
                format!("{}: ", addr),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            rest
        }
        None => entry,
    };

    for (i, word) in rest.split(' ').enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = match word {
            "Ap" | "Ind" => Style::default().fg(DEFAULT_THEME.keyword),
            "Sc" | "Global" | "Prim" => Style::default()
                .fg(DEFAULT_THEME.global)
                .add_modifier(Modifier::BOLD),
            "Num" => Style::default().fg(DEFAULT_THEME.number),
            "Data" => Style::default().fg(DEFAULT_THEME.constructor),
            w if w.starts_with('#') || w.starts_with("(#") => {
                Style::default().fg(DEFAULT_THEME.accent)
            }
            w if w.parse::<i64>().is_ok() => Style::default().fg(DEFAULT_THEME.number),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(word.to_string(), style));
    }
    Line::from(spans)
}

/// Render a scrollable list of lines, or `empty_text` when there are none.
/// `marker` prefixes the first line (the top of a stack).
pub(super) fn render_list(
    frame: &mut Frame,
    area: Rect,
    block: Block<'static>,
    lines: &[String],
    empty_text: &str,
    marker: Option<&str>,
    scroll_offset: &mut usize,
) {
    if lines.is_empty() {
        let paragraph = Paragraph::new(empty_text.to_string())
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let height = visible_height(area);
    clamp_scroll(scroll_offset, lines.len(), height);

    let items: Vec<ListItem> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(height)
        .map(|(idx, line)| {
            let mut styled = highlight_entry(line);
            if let Some(marker) = marker {
                let prefix = if idx == 0 {
                    Span::styled(
                        format!("{} ", marker),
                        Style::default()
                            .fg(DEFAULT_THEME.highlight)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw(" ".repeat(marker.chars().count() + 1))
                };
                styled.spans.insert(0, prefix);
            }
            ListItem::new(styled)
        })
        .collect();

    let list = List::new(items).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scroll() {
        let mut offset = 50;
        clamp_scroll(&mut offset, 30, 10);
        assert_eq!(offset, 20);

        clamp_scroll(&mut offset, 5, 10);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_highlight_entry_splits_address() {
        let line = highlight_entry("#12: Ap #3 #4");
        let text: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, vec!["#12: ", "Ap", " ", "#3", " ", "#4"]);
        assert_eq!(line.spans[1].style.fg, Some(DEFAULT_THEME.keyword));
    }
}
