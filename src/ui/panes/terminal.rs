//! Output pane rendering

use super::{clamp_scroll, pane_block};
use crate::memory::Word;
use crate::snapshot::OutputLog;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Printable ASCII rendering of an output value, if it has one
fn ascii_hint(value: Word) -> Option<String> {
    match u8::try_from(value).ok().map(char::from) {
        Some('\n') => Some("'\\n'".to_string()),
        Some(c) if c.is_ascii_graphic() || c == ' ' => Some(format!("'{}'", c)),
        _ => None,
    }
}

/// Render the output pane
pub fn render_output_pane(
    frame: &mut Frame,
    area: Rect,
    output: &OutputLog,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Output ({}) ", output.len());
    let block = pane_block(&title, is_focused);

    if output.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let all_items: Vec<ListItem> = output
        .lines
        .iter()
        .map(|line| {
            let mut spans = vec![
                Span::styled(
                    format!("{:>8} ", format!("@{}", line.cycle)),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    line.value.to_string(),
                    Style::default().fg(DEFAULT_THEME.number),
                ),
            ];
            if let Some(hint) = ascii_hint(line.value) {
                spans.push(Span::styled(
                    format!("  {}", hint),
                    Style::default().fg(DEFAULT_THEME.secondary),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, all_items.len(), visible_height);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::ascii_hint;

    #[test]
    fn test_ascii_hint() {
        assert_eq!(ascii_hint(72), Some("'H'".to_string()));
        assert_eq!(ascii_hint(10), Some("'\\n'".to_string()));
        assert_eq!(ascii_hint(32), Some("' '".to_string()));
        assert_eq!(ascii_hint(7), None);
        assert_eq!(ascii_hint(-1), None);
        assert_eq!(ascii_hint(1219070632396864), None);
    }
}
