//! Memory pane rendering
//!
//! Dense memory is dumped as rows of [`WORDS_PER_ROW`] words. Extended memory
//! follows as one `address: value` line per written cell. Cells that differ
//! from the previous snapshot are highlighted, and the word under the program
//! counter is underlined.

use super::{clamp_scroll, pane_block};
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

const WORDS_PER_ROW: usize = 8;

fn cell_style(snapshot: &Snapshot, previous: Option<&Snapshot>, addr: Address) -> Style {
    let value = snapshot.memory.read(addr);
    let mut style = Style::default().fg(DEFAULT_THEME.number);
    if previous.is_some_and(|prev| prev.memory.read(addr) != value) {
        style = style.fg(DEFAULT_THEME.changed).add_modifier(Modifier::BOLD);
    }
    if addr == snapshot.pc {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

/// Render the memory pane
pub fn render_memory_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    previous: Option<&Snapshot>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let memory = &snapshot.memory;
    let title = format!(
        " Memory ({} + {} extended) ",
        memory.dense().len(),
        memory.extended_len()
    );
    let block = pane_block(&title, is_focused);

    let mut rows: Vec<Line> = memory
        .dense()
        .chunks(WORDS_PER_ROW)
        .enumerate()
        .map(|(row, words)| {
            let base = row * WORDS_PER_ROW;
            let mut spans = vec![Span::styled(
                format!("{:>6}│", base),
                Style::default().fg(DEFAULT_THEME.address),
            )];
            for (i, word) in words.iter().enumerate() {
                let addr = (base + i) as Address;
                spans.push(Span::styled(
                    format!(" {:>8}", word),
                    cell_style(snapshot, previous, addr),
                ));
            }
            Line::from(spans)
        })
        .collect();

    let extended = memory.extended_cells();
    if !extended.is_empty() {
        rows.push(Line::from(Span::styled(
            "── extended ──",
            Style::default().fg(DEFAULT_THEME.extended),
        )));
        for (addr, value) in extended {
            rows.push(Line::from(vec![
                Span::styled(
                    format!("{:>6}│", addr),
                    Style::default().fg(DEFAULT_THEME.extended),
                ),
                Span::styled(format!(" {:>8}", value), cell_style(snapshot, previous, addr)),
            ]));
        }
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, rows.len(), visible_height);

    let visible: Vec<Line> = rows
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
}
