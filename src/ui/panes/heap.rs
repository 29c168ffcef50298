//! Heap pane: every live node in address order

use super::utils::{pane_block, render_list};
use ratatui::{layout::Rect, Frame};

pub fn render_heap_pane(
    frame: &mut Frame,
    area: Rect,
    heap: &[String],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(format!(" Heap ({} nodes) ", heap.len()), is_focused);
    render_list(frame, area, block, heap, "(no nodes)", None, scroll_offset);
}
