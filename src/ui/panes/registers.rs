//! Registers pane rendering

use super::{clamp_scroll, pane_block};
use crate::interpreter::engine::RunState;
use crate::interpreter::errors::HistoryError;
use crate::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

fn field(label: &'static str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<9}", label),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(value, Style::default().fg(color)),
    ])
}

/// Render the registers pane
pub fn render_registers_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    fault: Option<&HistoryError>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Registers ", is_focused);

    let state_color = match snapshot.state {
        RunState::Running => DEFAULT_THEME.success,
        RunState::WaitingForInput => DEFAULT_THEME.secondary,
        RunState::Halted => DEFAULT_THEME.comment,
    };

    let mut lines = vec![
        field("PC", snapshot.pc.to_string(), DEFAULT_THEME.number),
        field(
            "RB",
            snapshot.relative_base.to_string(),
            DEFAULT_THEME.number,
        ),
        Line::from(vec![
            Span::styled(format!("{:<9}", "State"), Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(
                snapshot.state.to_string(),
                Style::default().fg(state_color).add_modifier(Modifier::BOLD),
            ),
        ]),
        field("Cycle", snapshot.cycle.to_string(), DEFAULT_THEME.fg),
    ];

    match snapshot.instruction {
        Some(instruction) => {
            lines.push(field(
                "Last",
                format!("{} @{}", instruction, instruction.address),
                DEFAULT_THEME.mnemonic,
            ));
            lines.push(field(
                "",
                instruction.opcode.description().to_string(),
                DEFAULT_THEME.comment,
            ));
        }
        None => lines.push(field("Last", "-".to_string(), DEFAULT_THEME.comment)),
    }

    let pending = if snapshot.pending_input.is_empty() {
        "(empty)".to_string()
    } else {
        snapshot
            .pending_input
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    lines.push(field("Input", pending, DEFAULT_THEME.number));
    lines.push(field(
        "Extended",
        format!("{} cell(s)", snapshot.memory.extended_len()),
        DEFAULT_THEME.extended,
    ));

    if let Some(fault) = fault {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Fault: {}", fault),
            Style::default()
                .fg(DEFAULT_THEME.error)
                .add_modifier(Modifier::BOLD),
        )));
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((*scroll_offset as u16, 0));
    frame.render_widget(paragraph, area);
}
