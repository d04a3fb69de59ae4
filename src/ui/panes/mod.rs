//! TUI pane rendering modules
//!
//! This module provides the rendering logic for all visual panes in the TUI,
//! organized by responsibility.
//!
//! # Pane Modules
//!
//! - [`disassembly`]: Linear-sweep listing of the program with the current instruction highlighted
//! - [`registers`]: Program counter, relative base, run state and pending input
//! - [`memory`]: Word dump of dense and extended memory with changed cells marked
//! - [`terminal`]: Values the machine has output so far
//! - [`status`]: Status bar with keybindings and execution state
//!
//! Each pane module exports a primary `render_*` function that draws one
//! [`Snapshot`](crate::snapshot::Snapshot) and never mutates machine state.

pub mod disassembly;
pub mod memory;
pub mod registers;
pub mod status;
pub mod terminal;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

pub use disassembly::render_disassembly_pane;
pub use memory::render_memory_pane;
pub use registers::render_registers_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use terminal::render_output_pane;

/// Bordered block with the focus-dependent border style shared by every pane
fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
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

/// Clamp a scroll offset so the last page stays full
fn clamp_scroll(scroll_offset: &mut usize, total_items: usize, visible_height: usize) {
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }
}
