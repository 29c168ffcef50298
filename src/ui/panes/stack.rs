//! Stack pane: the reduction spine, top first

use super::utils::{pane_block, render_list};
use ratatui::{layout::Rect, Frame};

pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    stack: &[String],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(format!(" Stack ({}) ", stack.len()), is_focused);
    render_list(frame, area, block, stack, "(empty)", Some("▶"), scroll_offset);
}
