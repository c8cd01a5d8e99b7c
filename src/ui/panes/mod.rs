//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`input`]: Prover input line and the sequent entry list, with previews
//! - [`derivation`]: The rendered derivation, one aligned row per step
//! - [`status`]: Status bar with session state, the latest notice and keybindings
//! - `utils`: Shared helpers for borders and typeset nodes
//!
//! Each pane module exports a `render_*` function taking the frame, its area
//! and the state it draws. Panes never mutate session state; the only state
//! they write back is their own scroll offset.

mod utils;

pub mod derivation;
pub mod input;
pub mod status;

pub use derivation::render_derivation_pane;
pub use input::{render_entries_pane, render_prover_pane};
pub use status::render_status_bar;
