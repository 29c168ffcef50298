//! Status bar rendering with keybindings and state indicators

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Everything the status bar shows
pub struct StatusRenderData<'a> {
    pub engine: &'a str,
    pub message: &'a str,
    /// History cursor and number of recorded states
    pub current_step: usize,
    pub total_steps: usize,
    /// Machine steps behind the state under the cursor
    pub machine_steps: usize,
    pub has_error: bool,
    pub is_playing: bool,
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: &StatusRenderData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Left side: engine, position and message
    let step_text = format!(
        " {} {}/{} ",
        data.engine,
        data.current_step + 1,
        data.total_steps.max(1)
    );

    let bar_style = Style::default().bg(DEFAULT_THEME.current_line_bg);
    let left_spans = vec![
        Span::styled(
            step_text,
            Style::default()
                .bg(if data.has_error {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.accent
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", bar_style.fg(DEFAULT_THEME.comment)),
        Span::styled(
            format!("{} steps", data.machine_steps),
            bar_style.fg(DEFAULT_THEME.comment),
        ),
        Span::styled(" | ", bar_style.fg(DEFAULT_THEME.comment)),
        Span::styled(format!(" {} ", data.message), bar_style.fg(DEFAULT_THEME.fg)),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(bar_style)
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    // Right side: Keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar_style.fg(DEFAULT_THEME.fg);
    let sep_style = bar_style.fg(DEFAULT_THEME.comment);

    let mut right_spans = vec![
        Span::styled(" ←/→ ", key_style),
        Span::styled(" step ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ⎵ ", key_style),
        Span::styled(" play ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ↵ / ⌫ ", key_style),
        Span::styled(" end/start ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled("q", key_style),
        Span::styled(" quit ", desc_style),
    ];

    let is_at_start = data.current_step == 0;
    let is_at_end = data.current_step + 1 >= data.total_steps;

    let indicator = if data.is_playing {
        Some((" ▶ PLAYING ", DEFAULT_THEME.highlight))
    } else if is_at_end {
        Some((" END ", DEFAULT_THEME.error))
    } else if is_at_start {
        Some((" START ", DEFAULT_THEME.success))
    } else {
        None
    };
    if let Some((label, color)) = indicator {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            label,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(bar_style)
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}
