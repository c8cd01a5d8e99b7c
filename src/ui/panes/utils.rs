//! Helpers shared by the panes

use crate::typeset::{Node, Script};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders},
};

/// Bordered block, highlighted when focused
pub(crate) fn pane_block(title: String, is_focused: bool) -> Block<'static> {
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

/// Convert a typeset node into styled spans on top of `base`
pub(crate) fn node_spans(node: &Node, base: Style) -> Vec<Span<'static>> {
    node.glyphs()
        .iter()
        .map(|glyph| {
            let mut style = base;
            if glyph.style.bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            if glyph.style.italic {
                style = style.add_modifier(Modifier::ITALIC);
            }
            // Scripts without a Unicode form keep their letter; dim them so
            // they still read as indices
            if glyph.style.script != Script::Normal && glyph.text.is_ascii() {
                style = style.add_modifier(Modifier::DIM);
            }
            Span::styled(glyph.text.clone(), style)
        })
        .collect()
}

/// Display width of a node, counted in chars
pub(crate) fn node_width(node: &Node) -> usize {
    node.glyphs().iter().map(|g| g.text.chars().count()).sum()
}

/// Keep the last `width` chars of an input line so the cursor end stays visible
pub(crate) fn tail(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        text.to_string()
    } else {
        text.chars().skip(count - width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_keeps_end() {
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("ab", 3), "ab");
    }
}
