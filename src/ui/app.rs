//! Main TUI application state and logic

use crate::input::{preview_into, EntryId, FormulaInputManager, Preview, Side, PREVIEW_REJECTED};
use crate::protocol::SessionOutcome;
use crate::session::{Dispatch, ProofSessionController, Severity};
use crate::typeset::{Node, TexTypesetter};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tracing::debug;

/// What keyboard input goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Prover,
    Entry(EntryId, Side),
    Derivation,
}

/// The main application state
pub struct App<D: Dispatch> {
    /// The proof session driving the derivation pane
    pub session: ProofSessionController<D, TexTypesetter>,

    /// Sequent entries for `/solve`
    pub entries: FormulaInputManager,

    /// Single formula for `/prover`, and its live preview
    pub prover_input: String,
    pub prover_preview: Node,

    /// Current keyboard focus
    pub focus: Focus,

    /// Per-pane scroll offsets
    pub derivation_scroll: usize,
    pub entries_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display, and how to color it
    pub status_message: String,
    pub status_severity: Severity,
}

impl<D: Dispatch> App<D> {
    /// Create a new app around a session, with `formula` prefilled
    pub fn new(session: ProofSessionController<D, TexTypesetter>, formula: &str) -> Self {
        let mut app = App {
            session,
            entries: FormulaInputManager::new(),
            prover_input: formula.to_string(),
            prover_preview: Node::new(),
            focus: Focus::Prover,
            derivation_scroll: 0,
            entries_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            status_severity: Severity::Info,
        };
        app.refresh_prover_preview();
        app
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.drain_session();

            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Poll with a timeout so replies are picked up without a key press
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Apply finished requests and report the result in the status bar
    pub fn drain_session(&mut self) {
        if self.session.poll() == 0 {
            return;
        }
        self.derivation_scroll = 0;

        let prefix = self
            .session
            .last_outcome()
            .map_or("", SessionOutcome::notice_prefix);

        let notices = self.session.take_notices();
        match notices.last() {
            Some(notice) => {
                let text = format!("{}{}", prefix, notice.text);
                self.set_status(text, notice.severity);
            }
            None => {
                let text = format!(
                    "{} with {} step(s)",
                    self.session.label().title(),
                    self.session.view().len()
                );
                self.set_status(text, Severity::Info);
            }
        }
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes above, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(main_chunks[0]);

        // Left column: Formula (top) | Sequents (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(columns[0]);

        super::panes::render_prover_pane(
            frame,
            left_rows[0],
            &self.prover_input,
            &self.prover_preview,
            self.focus == Focus::Prover,
        );

        let entry_focus = match self.focus {
            Focus::Entry(id, side) => Some((id, side)),
            _ => None,
        };
        super::panes::render_entries_pane(
            frame,
            left_rows[1],
            &self.entries,
            entry_focus,
            entry_focus.is_some(),
            &mut self.entries_scroll,
        );

        super::panes::render_derivation_pane(
            frame,
            columns[1],
            self.session.view(),
            self.session.label(),
            self.focus == Focus::Derivation,
            &mut self.derivation_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.status_severity,
            self.session.state(),
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
            }
            KeyCode::Char('n') if ctrl => self.add_entry(),
            KeyCode::Char('d') if ctrl => self.remove_focused_entry(),
            KeyCode::Char('p') if ctrl => self.preview_focused(),
            KeyCode::Char('s') if ctrl => self.solve(),
            KeyCode::Char('l') if ctrl => {
                self.session.clear();
                self.set_status("Derivation cleared".to_string(), Severity::Info);
            }
            KeyCode::Char('r') if ctrl => {
                self.entries.reset();
                self.entries_scroll = 0;
                if matches!(self.focus, Focus::Entry(..)) {
                    self.focus = Focus::Prover;
                }
                self.set_status("Sequents reset".to_string(), Severity::Info);
            }
            KeyCode::Tab => self.focus = self.cycle_focus(true),
            KeyCode::BackTab => self.focus = self.cycle_focus(false),
            KeyCode::Enter => match self.focus {
                Focus::Prover => self.prove(),
                Focus::Entry(..) => self.solve(),
                Focus::Derivation => {}
            },
            KeyCode::Up => self.vertical(true, ctrl),
            KeyCode::Down => self.vertical(false, ctrl),
            KeyCode::Backspace => {
                if let Some(text) = self.focused_text_mut() {
                    text.pop();
                    self.refresh_focused_preview();
                }
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(text) = self.focused_text_mut() {
                    text.push(c);
                    self.refresh_focused_preview();
                }
            }
            _ => {}
        }
    }

    fn prove(&mut self) {
        if self.prover_input.trim().is_empty() {
            self.set_status("Nothing to prove".to_string(), Severity::Warning);
            return;
        }
        let generation = self.session.prove(&self.prover_input);
        self.set_status(format!("Proving... (request #{})", generation), Severity::Info);
    }

    fn solve(&mut self) {
        let collected = self.entries.collect();
        if collected.is_empty() {
            self.set_status("No sequents to solve".to_string(), Severity::Warning);
            return;
        }
        let generation = self.session.solve(&collected);
        self.set_status(
            format!("Solving {} sequent(s)... (request #{})", collected.len(), generation),
            Severity::Info,
        );
    }

    fn add_entry(&mut self) {
        let id = self.entries.add_entry();
        self.focus = Focus::Entry(id, Side::Left);
        self.set_status(format!("Added sequent {}", id), Severity::Info);
    }

    fn remove_focused_entry(&mut self) {
        let (id, side) = match self.focus {
            Focus::Entry(id, side) => (id, side),
            _ => return,
        };
        let index = self.entries.position(id).unwrap_or(0);
        self.entries.remove_entry(id);

        let ids = self.entries.ids();
        self.focus = match ids.get(index).or_else(|| ids.last()) {
            Some(next) => Focus::Entry(*next, side),
            None => Focus::Prover,
        };
        self.set_status(format!("Removed sequent {}", id), Severity::Info);
    }

    fn preview_focused(&mut self) {
        match self.focus {
            Focus::Prover => {
                if self.refresh_prover_preview() {
                    self.set_status("Formula renders".to_string(), Severity::Info);
                } else {
                    self.set_status(PREVIEW_REJECTED.to_string(), Severity::Warning);
                }
            }
            Focus::Entry(id, _) => {
                match self.entries.preview_entry(id, self.session.renderer().typesetter()) {
                    Preview::Rendered => {
                        self.set_status(format!("Sequent {} renders", id), Severity::Info)
                    }
                    Preview::Rejected(message) => self.set_status(message, Severity::Warning),
                    Preview::Missing => {}
                }
            }
            Focus::Derivation => {}
        }
    }

    /// Up/Down: scroll the derivation, step through entries, or with Ctrl
    /// held, move the focused entry
    fn vertical(&mut self, up: bool, ctrl: bool) {
        match self.focus {
            Focus::Derivation => {
                self.derivation_scroll = if up {
                    self.derivation_scroll.saturating_sub(1)
                } else {
                    self.derivation_scroll.saturating_add(1)
                };
            }
            Focus::Entry(id, _) if ctrl => {
                let moved = if up {
                    self.entries.move_up(id)
                } else {
                    self.entries.move_down(id)
                };
                if moved {
                    debug!(%id, up, "entry moved");
                }
            }
            Focus::Entry(id, side) => {
                let ids = self.entries.ids();
                if let Some(index) = ids.iter().position(|other| *other == id) {
                    let target = if up {
                        index.checked_sub(1)
                    } else {
                        Some(index + 1).filter(|i| *i < ids.len())
                    };
                    if let Some(target) = target {
                        self.focus = Focus::Entry(ids[target], side);
                    }
                }
            }
            Focus::Prover => {}
        }
    }

    /// Next or previous focus target in page order
    fn cycle_focus(&self, forward: bool) -> Focus {
        let mut order = vec![Focus::Prover];
        for id in self.entries.ids() {
            order.push(Focus::Entry(*id, Side::Left));
            order.push(Focus::Entry(*id, Side::Right));
        }
        order.push(Focus::Derivation);

        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        order[next]
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Prover => Some(&mut self.prover_input),
            Focus::Entry(id, side) => self.entries.text_mut(id, side),
            Focus::Derivation => None,
        }
    }

    /// Live preview while typing; warnings wait for an explicit preview
    fn refresh_focused_preview(&mut self) {
        match self.focus {
            Focus::Prover => {
                self.refresh_prover_preview();
            }
            Focus::Entry(id, _) => {
                self.entries
                    .preview_entry(id, self.session.renderer().typesetter());
            }
            Focus::Derivation => {}
        }
    }

    fn refresh_prover_preview(&mut self) -> bool {
        preview_into(
            self.session.renderer().typesetter(),
            &self.prover_input,
            &mut self.prover_preview,
        )
    }

    fn set_status(&mut self, message: String, severity: Severity) {
        self.status_message = message;
        self.status_severity = severity;
    }
}
