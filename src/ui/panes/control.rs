//! Control pane: pending G-machine code followed by the dump
//!
//! The template instantiation machine has no code queue, so for it the pane
//! only lists the suspended spines on the dump.

use super::utils::{pane_block, render_list};
use ratatui::{layout::Rect, Frame};

pub fn render_control_pane(
    frame: &mut Frame,
    area: Rect,
    code: &[String],
    dump: &[String],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = if code.is_empty() {
        format!(" Dump ({}) ", dump.len())
    } else {
        format!(" Code ({}) / Dump ({}) ", code.len(), dump.len())
    };

    let mut lines: Vec<String> = code.to_vec();
    if !code.is_empty() && !dump.is_empty() {
        lines.push(String::from("── dump ──"));
    }
    lines.extend(dump.iter().cloned());

    let marker = (!code.is_empty()).then_some("▶");
    render_list(
        frame,
        area,
        pane_block(title, is_focused),
        &lines,
        "(nothing suspended)",
        marker,
        scroll_offset,
    );
}
