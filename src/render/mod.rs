//! Derivation rendering
//!
//! Turns an ordered list of [`ProofStep`]s into [`DerivationRow`]s. Each row
//! holds, left to right: the step name, the typeset left expression, the
//! relation glyph, the typeset right expression, and the justification.
//!
//! Typesetting failures are soft: a cell that cannot be typeset is left
//! empty and the remaining rows are still built.

use crate::protocol::ProofStep;
use crate::typeset::{Node, Typesetter};
use std::fmt;
use tracing::warn;

/// Relation shown between the two sides of every step
pub const RELATION_GLYPH: &str = "←";

/// One rendered step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationRow {
    pub name: String,
    pub left: Node,
    pub relation: &'static str,
    pub right: Node,
    pub just: String,
}

impl fmt::Display for DerivationRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} {}   [{}]",
            self.name,
            self.left.text(),
            self.relation,
            self.right.text(),
            self.just
        )
    }
}

/// The rendered derivation, one row per step in derivation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivationView {
    rows: Vec<DerivationRow>,
}

impl DerivationView {
    pub fn rows(&self) -> &[DerivationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What a call to [`DerivationRenderer::render`] produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
    pub rows: usize,
    /// Expression cells left empty because typesetting produced nothing
    pub empty_cells: usize,
}

pub struct DerivationRenderer<T: Typesetter> {
    typesetter: T,
    view: DerivationView,
}

impl<T: Typesetter> DerivationRenderer<T> {
    pub fn new(typesetter: T) -> Self {
        Self {
            typesetter,
            view: DerivationView::default(),
        }
    }

    pub fn typesetter(&self) -> &T {
        &self.typesetter
    }

    pub fn view(&self) -> &DerivationView {
        &self.view
    }

    /// Remove every rendered row
    pub fn clear(&mut self) {
        self.view.rows.clear();
    }

    /// Replace the view with one row per step, in the given order.
    pub fn render(&mut self, steps: &[ProofStep]) -> RenderSummary {
        self.clear();

        let mut summary = RenderSummary::default();
        for (index, step) in steps.iter().enumerate() {
            let left = self.cell(index, "left", &step.left, &mut summary);
            let right = self.cell(index, "right", &step.right, &mut summary);

            self.view.rows.push(DerivationRow {
                name: step.name.clone(),
                left,
                relation: RELATION_GLYPH,
                right,
                just: step.just.clone(),
            });
            summary.rows += 1;
        }
        summary
    }

    fn cell(&self, index: usize, side: &str, source: &str, summary: &mut RenderSummary) -> Node {
        let mut node = Node::new();
        match self.typesetter.typeset(source, &mut node) {
            Ok(()) if node.child_count() > 0 => {}
            Ok(()) => {
                warn!(step = index, side, "expression rendered no output");
                summary.empty_cells += 1;
            }
            Err(e) => {
                warn!(step = index, side, error = %e, "expression could not be typeset");
                node.clear();
                summary.empty_cells += 1;
            }
        }
        node
    }
}
