//! Derivation pane rendering

use super::utils::{node_spans, node_width, pane_block};
use crate::render::DerivationView;
use crate::session::SessionLabel;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the derivation pane.
///
/// The title carries the session label, so it always matches the rows shown.
pub fn render_derivation_pane(
    frame: &mut Frame,
    area: Rect,
    view: &DerivationView,
    label: SessionLabel,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = if view.is_empty() {
        format!(" {} ", label.title())
    } else {
        format!(" {} ({} steps) ", label.title(), view.len())
    };
    let block = pane_block(title, is_focused);

    if view.is_empty() {
        let placeholder = match label {
            SessionLabel::Pending => "(waiting for the prover)",
            SessionLabel::Failed => "(no derivation)",
            _ => "(nothing to show)",
        };
        let paragraph = Paragraph::new(placeholder)
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let rows = view.rows();

    // Align the relation glyph across rows
    let name_width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    let left_width = rows.iter().map(|r| node_width(&r.left)).max().unwrap_or(0);

    let expression = Style::default().fg(DEFAULT_THEME.expression);
    let all_items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let mut spans = vec![Span::styled(
                format!("{:<width$}  ", row.name, width = name_width),
                Style::default()
                    .fg(DEFAULT_THEME.rule_name)
                    .add_modifier(Modifier::BOLD),
            )];

            let left = node_spans(&row.left, expression);
            let pad = left_width.saturating_sub(node_width(&row.left));
            spans.push(Span::raw(" ".repeat(pad)));
            spans.extend(left);

            spans.push(Span::styled(
                format!(" {} ", row.relation),
                Style::default().fg(DEFAULT_THEME.relation),
            ));
            spans.extend(node_spans(&row.right, expression));

            spans.push(Span::styled(
                format!("   {}", row.just),
                Style::default().fg(DEFAULT_THEME.comment),
            ));

            ListItem::new(Line::from(spans))
        })
        .collect();

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Clamp scroll offset only if content exceeds visible area
    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}
