//! Source code pane rendering with syntax highlighting
//!
//! Displays the Core program with basic syntax highlighting and marks the
//! definition of the supercombinator the machine is entering.

use super::utils::{pane_block, visible_height};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Simple syntax highlighting for Core code
fn highlight_source_code(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current_word = String::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // `||` comments run to the end of the line
        if c == '|' && chars.get(i + 1) == Some(&'|') {
            flush_word(&mut spans, &mut current_word);
            spans.push(Span::styled(
                chars[i..].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            return Line::from(spans);
        }

        if c.is_alphanumeric() || c == '_' {
            current_word.push(c);
        } else {
            flush_word(&mut spans, &mut current_word);
            let style = match c {
                '(' | ')' | '{' | '}' => Style::default().fg(DEFAULT_THEME.accent),
                '\\' | '.' => Style::default().fg(DEFAULT_THEME.keyword),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
        }
        i += 1;
    }

    flush_word(&mut spans, &mut current_word);
    Line::from(spans)
}

fn flush_word(spans: &mut Vec<Span<'static>>, word: &mut String) {
    if !word.is_empty() {
        let style = get_keyword_style(word);
        spans.push(Span::styled(std::mem::take(word), style));
    }
}

fn get_keyword_style(word: &str) -> Style {
    match word {
        "let" | "letrec" | "in" | "case" | "of" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "Pack" => Style::default().fg(DEFAULT_THEME.constructor),
        w if w.chars().all(|c| c.is_ascii_digit()) => Style::default().fg(DEFAULT_THEME.number),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// 1-based line on which `name` is defined, if it is a program definition
pub fn definition_line(source_code: &str, name: &str) -> Option<usize> {
    source_code.lines().position(|line| {
        let mut words = line.trim_start().split_whitespace();
        words.next() == Some(name) && line.contains('=')
    })
    .map(|idx| idx + 1)
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    /// Visual row the highlighted line is kept on
    pub target_line_row: Option<usize>,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: Option<usize>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let block = pane_block(" Source Code ".to_string(), is_focused);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let height = visible_height(area);

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(height / 2)
        .min(height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // keep the current line on the target row
    if let Some(current) = current_line.filter(|l| *l > 0 && *l <= total_lines) {
        scroll_state.offset = (current - 1).saturating_sub(target_row);
    }
    if total_lines > height {
        scroll_state.offset = scroll_state.offset.min(total_lines - height);
    } else {
        scroll_state.offset = 0;
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(height)
        .map(|(idx, line)| {
            let is_current = current_line == Some(idx + 1);
            let num_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content = highlight_source_code(line);
            if is_current {
                for span in &mut content.spans {
                    span.style = span.style.bg(DEFAULT_THEME.current_line_bg);
                }
            }

            let mut spans = vec![Span::styled(format!("{:4} ", idx + 1), num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(visible_lines).block(block), area);
}
