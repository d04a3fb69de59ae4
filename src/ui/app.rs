//! Main TUI application state and logic

use crate::interpreter::errors::HistoryError;
use crate::interpreter::history::History;
use crate::memory::Word;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Delay between steps in auto-play mode
const PLAY_INTERVAL: Duration = Duration::from_millis(250);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Disassembly,
    Registers,
    Memory,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: disassembly -> output -> registers -> memory)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Disassembly => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Registers,
            FocusedPane::Registers => FocusedPane::Memory,
            FocusedPane::Memory => FocusedPane::Disassembly,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Disassembly => FocusedPane::Memory,
            FocusedPane::Output => FocusedPane::Disassembly,
            FocusedPane::Registers => FocusedPane::Output,
            FocusedPane::Memory => FocusedPane::Registers,
        }
    }
}

/// The main application state
pub struct App {
    /// The recorded execution being browsed
    pub history: History,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub disassembly_scroll: usize,
    pub registers_scroll: usize,
    pub memory_scroll: usize,
    pub output_scroll: usize,

    /// Target visual row for the current instruction (None = not initialized yet)
    /// This keeps the highlighted line at a fixed position when stepping
    pub target_line_row: Option<usize>,

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

    /// Digits typed while the machine waits for input
    pub input_buffer: String,
}

impl App {
    /// Create a new app over a recorded history
    pub fn new(history: History) -> Self {
        let status_message = match history.fault() {
            Some(fault) => format!("Execution stopped: {}", fault),
            None => String::from("Ready!"),
        };

        App {
            history,
            focused_pane: FocusedPane::Disassembly,
            disassembly_scroll: 0,
            registers_scroll: 0,
            memory_scroll: 0,
            output_scroll: 0,
            target_line_row: None, // Will be set to center on first render
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
            input_buffer: String::new(),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode
            if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                if self.history.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                    self.output_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = if self.history.awaiting_input() {
                        "Waiting for input".to_string()
                    } else {
                        "Playback complete".to_string()
                    };
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

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Disassembly (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Registers (top) | Memory (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(columns[1]);

        let snapshot = self.history.current();

        super::panes::render_disassembly_pane(
            frame,
            left_rows[0],
            snapshot,
            self.focused_pane == FocusedPane::Disassembly,
            &mut self.disassembly_scroll,
            &mut self.target_line_row,
        );

        super::panes::render_output_pane(
            frame,
            left_rows[1],
            &snapshot.output,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        super::panes::render_registers_pane(
            frame,
            right_rows[0],
            snapshot,
            self.history.fault(),
            self.focused_pane == FocusedPane::Registers,
            &mut self.registers_scroll,
        );

        super::panes::render_memory_pane(
            frame,
            right_rows[1],
            snapshot,
            self.history.previous(),
            self.focused_pane == FocusedPane::Memory,
            &mut self.memory_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &super::panes::StatusRenderData {
                message: &self.status_message,
                current_step: self.history.history_position(),
                total_steps: self.history.total_snapshots(),
                has_fault: self.history.fault().is_some(),
                is_playing: self.is_playing,
                awaiting_input: self.history.awaiting_input(),
                input_buffer: &self.input_buffer,
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        if self.history.awaiting_input() && self.handle_input_key(key.code) {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let mut stepped = 0;
                for _ in 0..n {
                    if self.history.step_forward().is_ok() {
                        stepped += 1;
                    } else {
                        break;
                    }
                }
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.output_scroll = usize::MAX;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Disassembly => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.target_line_row {
                        self.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Registers => {
                    self.registers_scroll = self.registers_scroll.saturating_sub(1);
                }
                FocusedPane::Memory => {
                    self.memory_scroll = self.memory_scroll.saturating_sub(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Disassembly => {
                    if let Some(row) = self.target_line_row {
                        self.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Registers => {
                    self.registers_scroll = self.registers_scroll.saturating_add(1);
                }
                FocusedPane::Memory => {
                    self.memory_scroll = self.memory_scroll.saturating_add(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(PLAY_INTERVAL)
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.history.jump_to_end();
                self.status_message = "Jumped to end".to_string();
                self.output_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.history.rewind_to_start();
                self.status_message = "Jumped to start".to_string();
                self.output_scroll = usize::MAX;
            }
            _ => {}
        }
    }

    /// Keys that edit or submit the pending input value
    ///
    /// Returns false for keys that should fall through to normal handling.
    fn handle_input_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char(c @ '0'..='9') => {
                self.input_buffer.push(c);
            }
            KeyCode::Char('-') if self.input_buffer.is_empty() => {
                self.input_buffer.push('-');
            }
            KeyCode::Backspace if !self.input_buffer.is_empty() => {
                self.input_buffer.pop();
            }
            KeyCode::Esc => {
                self.input_buffer.clear();
            }
            KeyCode::Enter if !self.input_buffer.is_empty() => {
                self.submit_input();
            }
            _ => return false,
        }
        true
    }

    fn submit_input(&mut self) {
        let value: Word = match self.input_buffer.parse() {
            Ok(value) => value,
            Err(_) => {
                self.status_message = format!("Not a valid integer: {}", self.input_buffer);
                self.input_buffer.clear();
                return;
            }
        };
        self.input_buffer.clear();

        match self.history.supply_input(value) {
            Ok(state) => {
                self.status_message = format!("Input {} accepted, machine {}", value, state);
            }
            Err(e) => {
                self.status_message = format!("Execution stopped: {}", e);
            }
        }
        self.output_scroll = usize::MAX;
    }

    /// Step forward in execution
    fn step_forward(&mut self) {
        match self.history.step_forward() {
            Ok(()) => {
                self.status_message = "Stepped forward".to_string();
                // Auto-scroll output to bottom
                self.output_scroll = usize::MAX;
            }
            Err(HistoryError::AtEnd) if self.history.awaiting_input() => {
                self.status_message = "Waiting for input: type a number and press Enter".to_string();
            }
            Err(e) => {
                self.status_message = format!("Cannot step forward: {}", e);
            }
        }
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        match self.history.step_backward() {
            Ok(()) => {
                self.status_message = "Stepped backward".to_string();
                self.output_scroll = usize::MAX;
            }
            Err(e) => {
                self.status_message = format!("Cannot step backward: {}", e);
            }
        }
    }
}
