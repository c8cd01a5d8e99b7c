//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: page state, keyboard event loop, focus, draining session resolutions
//! - **[`panes`]**: stateless render functions for each visible pane (formula,
//!   sequents, derivation, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a
//! [`ProofSessionController`] and call [`App::run`] to start the event loop.
//!
//! [`ProofSessionController`]: crate::session::ProofSessionController
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
