//! Disassembly pane rendering
//!
//! The listing is a linear sweep over the program image: each line decodes
//! the word at its address and skips past its parameters. Self-modifying
//! programs and data interleaved with code can make the sweep drift from the
//! real control flow, so the current instruction is located by address range
//! rather than by exact line start. When the program counter runs outside the
//! image, the instruction it points at is appended as an extra line.

use super::{clamp_scroll, pane_block};
use crate::interpreter::decoder::{disassemble, disassemble_range, Disassembly};
use crate::memory::Address;
use crate::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn listing(snapshot: &Snapshot) -> Vec<Disassembly> {
    let end = snapshot.memory.dense().len() as Address;
    let mut lines = disassemble_range(&snapshot.memory, 0, end);
    if snapshot.pc >= end {
        lines.push(disassemble(&snapshot.memory, snapshot.pc));
    }
    lines
}

fn render_line(line: &Disassembly, is_current: bool) -> Line<'static> {
    let marker = if is_current { "▶ " } else { "  " };
    let (mnemonic, operands) = match line.text.split_once(' ') {
        Some((m, rest)) => (m.to_string(), format!(" {}", rest)),
        None => (line.text.clone(), String::new()),
    };

    let mnemonic_style = if mnemonic == "DATA" {
        Style::default().fg(DEFAULT_THEME.comment)
    } else {
        Style::default()
            .fg(DEFAULT_THEME.mnemonic)
            .add_modifier(Modifier::BOLD)
    };

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(DEFAULT_THEME.success)),
        Span::styled(
            format!("{:>6}  ", line.address),
            Style::default().fg(DEFAULT_THEME.address),
        ),
        Span::styled(mnemonic, mnemonic_style),
        Span::styled(operands, Style::default().fg(DEFAULT_THEME.fg)),
    ];

    if is_current {
        for span in &mut spans {
            span.style = span.style.bg(DEFAULT_THEME.current_line_bg);
        }
    }
    Line::from(spans)
}

/// Render the disassembly pane
pub fn render_disassembly_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    is_focused: bool,
    scroll_offset: &mut usize,
    target_line_row: &mut Option<usize>,
) {
    let block = pane_block(" Disassembly ", is_focused);
    let lines = listing(snapshot);
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    let current = lines
        .iter()
        .position(|l| l.address <= snapshot.pc && snapshot.pc < l.address + l.len as Address);

    // Keep the current instruction on a fixed row, centered initially
    let row = *target_line_row.get_or_insert(visible_height / 2);
    let row = row.min(visible_height.saturating_sub(1));
    *target_line_row = Some(row);
    if let Some(index) = current {
        *scroll_offset = index.saturating_sub(row);
    }
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let text: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(i, line)| render_line(line, Some(i) == current))
        .collect();

    frame.render_widget(Paragraph::new(text).block(block), area);
}
