//! Main TUI application state and logic

use super::panes::{self, SourceScrollState, StatusRenderData};
use crate::interpreter::engine::{Interpreter, Machine, StateView};
use crate::interpreter::errors::EvalError;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Output,
    Stack,
    Control,
    Heap,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> output -> stack -> control -> heap)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Stack,
            FocusedPane::Stack => FocusedPane::Control,
            FocusedPane::Control => FocusedPane::Heap,
            FocusedPane::Heap => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Heap,
            FocusedPane::Output => FocusedPane::Source,
            FocusedPane::Stack => FocusedPane::Output,
            FocusedPane::Control => FocusedPane::Stack,
            FocusedPane::Heap => FocusedPane::Control,
        }
    }
}

/// The main application state
pub struct App<M: Machine> {
    /// Finished run whose recorded history is being browsed
    pub interpreter: Interpreter<M>,

    /// The source code being executed
    pub source_code: String,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: SourceScrollState,
    pub stack_scroll: usize,
    pub control_scroll: usize,
    pub heap_scroll: usize,
    pub output_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl<M: Machine> App<M> {
    /// Create a new app with the given interpreter and source code
    pub fn new(interpreter: Interpreter<M>, source_code: String) -> Self {
        let status_message = match interpreter.error() {
            Some(e) => format!("Stopped with error: {}", e),
            None => String::from("Ready!"),
        };
        App {
            interpreter,
            source_code,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState::default(),
            stack_scroll: 0,
            control_scroll: 0,
            heap_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(500) {
                if self.interpreter.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn is_last_state(&self) -> bool {
        self.interpreter.history_position() + 1 >= self.interpreter.total_snapshots()
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let view: StateView = M::view(self.interpreter.current());
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[0]);

        // Right column: Stack | Control | Heap
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(30),
                Constraint::Percentage(40),
            ])
            .split(columns[1]);

        let active_line = view
            .active
            .as_deref()
            .and_then(|name| panes::source::definition_line(&self.source_code, name));

        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            active_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        // the error belongs to the last recorded state only
        let error = if self.is_last_state() {
            self.interpreter.error()
        } else {
            None
        };
        panes::render_terminal_pane(
            frame,
            left_rows[1],
            &view.output,
            view.result.as_deref(),
            error,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        panes::render_stack_pane(
            frame,
            right_rows[0],
            &view.stack,
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );

        panes::render_control_pane(
            frame,
            right_rows[1],
            &view.code,
            &view.dump,
            self.focused_pane == FocusedPane::Control,
            &mut self.control_scroll,
        );

        panes::render_heap_pane(
            frame,
            right_rows[2],
            &view.heap,
            self.focused_pane == FocusedPane::Heap,
            &mut self.heap_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &StatusRenderData {
                engine: M::NAME,
                message: &self.status_message,
                current_step: self.interpreter.history_position(),
                total_steps: self.interpreter.total_snapshots(),
                machine_steps: view.steps,
                has_error: error.is_some(),
                is_playing: self.is_playing,
            },
        );
    }

    fn scroll_offset(&mut self) -> Option<&mut usize> {
        match self.focused_pane {
            FocusedPane::Source => None,
            FocusedPane::Output => Some(&mut self.output_scroll),
            FocusedPane::Stack => Some(&mut self.stack_scroll),
            FocusedPane::Control => Some(&mut self.control_scroll),
            FocusedPane::Heap => Some(&mut self.heap_scroll),
        }
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c as usize - '0' as usize;
                let stepped = (0..n)
                    .take_while(|_| self.interpreter.step_forward().is_ok())
                    .count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                let result = self.interpreter.step_backward();
                self.report("Stepped backward", "Cannot step backward", result);
            }
            KeyCode::Right => {
                self.is_playing = false;
                let result = self.interpreter.step_forward();
                self.report("Stepped forward", "Cannot step forward", result);
            }
            KeyCode::Up => match self.scroll_offset() {
                Some(offset) => *offset = offset.saturating_sub(1),
                // Scrolling up makes the current line move down visually
                None => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
            },
            KeyCode::Down => match self.scroll_offset() {
                Some(offset) => *offset = offset.saturating_add(1),
                None => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
            },
            KeyCode::Char(' ') => {
                // 200ms debounce against key repeat
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or_else(Instant::now);
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.interpreter.jump_to_end();
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                let result = self.interpreter.rewind_to_start();
                self.report("Jumped to start", "Cannot rewind", result);
            }
            _ => {}
        }
    }

    fn report(&mut self, success: &str, failure: &str, result: Result<(), EvalError>) {
        self.status_message = match result {
            Ok(()) => success.to_string(),
            Err(EvalError::HistoryUnavailable { message }) => format!("{}: {}", failure, message),
            Err(e) => format!("Error: {}", e),
        };
    }
}
