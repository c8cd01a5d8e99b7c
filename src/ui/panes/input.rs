//! Formula input panes: the prover line and the sequent list

use super::utils::{node_spans, pane_block, tail};
use crate::input::{EntryId, FormulaInputManager, Side};
use crate::render::RELATION_GLYPH;
use crate::typeset::Node;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Padding, Paragraph},
    Frame,
};

const CURSOR: &str = "▏";

fn field_style(is_active: bool) -> Style {
    if is_active {
        Style::default()
            .fg(DEFAULT_THEME.fg)
            .bg(DEFAULT_THEME.current_line_bg)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

fn preview_line(prefix: &str, nodes: &[&Node]) -> Line<'static> {
    let expression = Style::default().fg(DEFAULT_THEME.expression);
    let mut spans = vec![Span::raw(prefix.to_string())];

    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                format!(" {} ", RELATION_GLYPH),
                Style::default().fg(DEFAULT_THEME.relation),
            ));
        }
        if node.is_empty() {
            spans.push(Span::styled("∅", Style::default().fg(DEFAULT_THEME.comment)));
        } else {
            spans.extend(node_spans(node, expression));
        }
    }
    Line::from(spans)
}

/// Render the single-formula prover input with its preview
pub fn render_prover_pane(
    frame: &mut Frame,
    area: Rect,
    input: &str,
    preview: &Node,
    is_focused: bool,
) {
    let block = pane_block(" Formula ".to_string(), is_focused).padding(Padding::new(1, 0, 0, 0));
    let width = area.width.saturating_sub(6) as usize;

    let mut input_spans = vec![
        Span::styled("> ", Style::default().fg(DEFAULT_THEME.primary)),
        Span::styled(tail(input, width), field_style(is_focused)),
    ];
    if is_focused {
        input_spans.push(Span::styled(CURSOR, Style::default().fg(DEFAULT_THEME.border_focused)));
    }

    let preview = if input.trim().is_empty() {
        Line::from(Span::styled(
            "  (type a formula, Enter proves it)",
            Style::default().fg(DEFAULT_THEME.comment),
        ))
    } else {
        preview_line("  ", &[preview])
    };

    let paragraph = Paragraph::new(vec![Line::from(input_spans), preview]).block(block);
    frame.render_widget(paragraph, area);
}

/// Render the sequent entries, two lines each: sources, then preview
pub fn render_entries_pane(
    frame: &mut Frame,
    area: Rect,
    entries: &FormulaInputManager,
    focus: Option<(EntryId, Side)>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Sequents ({}) ", entries.len());
    let block = pane_block(title, is_focused);

    if entries.is_empty() {
        let paragraph = Paragraph::new("(no sequents, Ctrl-N adds one)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let field_width = (area.width.saturating_sub(14) / 2) as usize;

    let mut lines: Vec<Line> = Vec::new();
    let mut focused_line = 0;
    for (ordinal, id) in entries.ids().iter().enumerate() {
        let widget = match entries.entry(*id) {
            Some(widget) => widget,
            None => continue,
        };

        let mut spans = vec![Span::styled(
            format!("{:>2}. ", ordinal),
            Style::default().fg(DEFAULT_THEME.secondary),
        )];
        for side in [Side::Left, Side::Right] {
            let is_active = focus == Some((*id, side));
            if is_active {
                focused_line = lines.len();
            }
            if side == Side::Right {
                spans.push(Span::styled(
                    format!(" {} ", RELATION_GLYPH),
                    Style::default()
                        .fg(DEFAULT_THEME.relation)
                        .add_modifier(Modifier::BOLD),
                ));
            }
            spans.push(Span::styled(
                format!("[{}]", tail(widget.text(side), field_width)),
                field_style(is_active),
            ));
            if is_active {
                spans.push(Span::styled(CURSOR, Style::default().fg(DEFAULT_THEME.border_focused)));
            }
        }
        lines.push(Line::from(spans));
        lines.push(preview_line(
            "    ",
            &[widget.preview(Side::Left), widget.preview(Side::Right)],
        ));
    }

    // Keep the focused entry in view
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if focused_line < *scroll_offset {
        *scroll_offset = focused_line;
    } else if focused_line + 2 > *scroll_offset + visible_height {
        *scroll_offset = (focused_line + 2).saturating_sub(visible_height);
    }

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    let paragraph = Paragraph::new(visible).block(block);
    frame.render_widget(paragraph, area);
}
