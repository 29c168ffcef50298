//! Colour palette shared by every pane (Catppuccin Mocha)

use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    /// Addresses, brackets and the step counter
    pub accent: Color,
    /// Current line, playback indicator
    pub highlight: Color,
    /// Line numbers, separators and heap addresses
    pub comment: Color,
    pub success: Color,
    pub error: Color,
    /// Core keywords and the `Ap`/`Ind` node kinds
    pub keyword: Color,
    pub number: Color,
    /// Supercombinators, compiled globals and primitives
    pub global: Color,
    /// `Pack` and data nodes
    pub constructor: Color,
    /// The final value of a run
    pub result: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),            // text
    accent: Color::Rgb(137, 180, 250),        // blue
    highlight: Color::Rgb(250, 179, 135),     // peach
    comment: Color::Rgb(108, 112, 134),       // overlay0
    success: Color::Rgb(166, 227, 161),       // green
    error: Color::Rgb(243, 139, 168),         // red
    keyword: Color::Rgb(203, 166, 247),       // mauve
    number: Color::Rgb(250, 179, 135),        // peach
    global: Color::Rgb(249, 226, 175),        // yellow
    constructor: Color::Rgb(148, 226, 213),   // teal
    result: Color::Rgb(245, 194, 231),        // pink
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(108, 112, 134),
    current_line_bg: Color::Rgb(49, 50, 68),  // surface0
};
