// Integration tests for the terminal page: key handling and pane output

use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};

use provetty::input::Side;
use provetty::protocol::{classify, Endpoint, ProofRequest, ProofStep};
use provetty::render::DerivationRenderer;
use provetty::session::{
    Dispatch, Generation, ProofSessionController, Resolution, SessionLabel, SessionState,
    Severity,
};
use provetty::typeset::TexTypesetter;
use provetty::ui::app::{App, Focus};
use provetty::ui::panes::{render_derivation_pane, render_status_bar};

#[derive(Default)]
struct ManualDispatcher {
    sent: Vec<(Generation, ProofRequest)>,
    ready: VecDeque<Resolution>,
}

impl Dispatch for ManualDispatcher {
    fn dispatch(&mut self, generation: Generation, request: ProofRequest) {
        self.sent.push((generation, request));
    }

    fn next_resolution(&mut self, _wait: Option<Duration>) -> Option<Resolution> {
        self.ready.pop_front()
    }
}

fn app(formula: &str) -> App<ManualDispatcher> {
    let session = ProofSessionController::new(ManualDispatcher::default(), TexTypesetter);
    App::new(session, formula)
}

fn press(app: &mut App<ManualDispatcher>, code: KeyCode) {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
}

fn ctrl(app: &mut App<ManualDispatcher>, c: char) {
    app.handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
}

fn type_text(app: &mut App<ManualDispatcher>, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

/// Everything on screen, row by row
fn screen(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_typing_updates_preview() {
    let mut app = app("");
    type_text(&mut app, r"\Box p");

    assert_eq!(app.prover_input, r"\Box p");
    assert_eq!(app.prover_preview.text(), "□p");

    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.prover_input, r"\Box ");
    assert_eq!(app.prover_preview.text(), "□");
}

#[test]
fn test_enter_proves_formula() {
    let mut app = app(r"\Box a \to a");
    press(&mut app, KeyCode::Enter);

    let sent = &app.session.dispatcher().sent;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, ProofRequest::prove(r"\Box a \to a"));
    assert_eq!(app.session.state(), SessionState::Requesting { generation: 1 });
    assert!(app.status_message.contains("request #1"));
}

#[test]
fn test_deeply_nested_input_fails_preview() {
    let mut app = app(&"{".repeat(50_000));
    assert!(app.prover_preview.is_empty());

    type_text(&mut app, "{");
    ctrl(&mut app, 'p');
    assert_eq!(app.status_severity, Severity::Warning);
    assert!(app.status_message.contains("will not be submitted"));
}

#[test]
fn test_blank_formula_is_not_sent() {
    let mut app = app("   ");
    press(&mut app, KeyCode::Enter);

    assert!(app.session.dispatcher().sent.is_empty());
    assert_eq!(app.status_severity, Severity::Warning);
}

#[test]
fn test_entries_edit_and_solve() {
    let mut app = app("");
    ctrl(&mut app, 'n');
    let id = app.entries.ids()[0];
    assert_eq!(app.focus, Focus::Entry(id, Side::Left));

    type_text(&mut app, "a");
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.focus, Focus::Entry(id, Side::Right));
    type_text(&mut app, r"\Box a");

    let widget = app.entries.entry(id).unwrap();
    assert_eq!(widget.text(Side::Left), "a");
    assert_eq!(widget.preview(Side::Right).text(), "□a");

    press(&mut app, KeyCode::Enter);
    let (_, request) = &app.session.dispatcher().sent[0];
    assert_eq!(request.endpoint(), Endpoint::Solve);
    assert_eq!(request.to_json().unwrap(), br#"[{"oid":0,"left":"a","right":"\\Box a"}]"#);
}

#[test]
fn test_remove_entry_moves_focus() {
    let mut app = app("");
    ctrl(&mut app, 'n');
    ctrl(&mut app, 'n');
    let ids = app.entries.ids().to_vec();

    // Focus is on the second entry; removing it falls back to the first
    ctrl(&mut app, 'd');
    assert_eq!(app.entries.ids(), &ids[..1]);
    assert_eq!(app.focus, Focus::Entry(ids[0], Side::Left));

    ctrl(&mut app, 'd');
    assert!(app.entries.is_empty());
    assert_eq!(app.focus, Focus::Prover);

    // Solving with no entries sends nothing
    ctrl(&mut app, 's');
    assert!(app.session.dispatcher().sent.is_empty());
}

#[test]
fn test_ctrl_arrows_reorder_entries() {
    let mut app = app("");
    ctrl(&mut app, 'n');
    ctrl(&mut app, 'n');
    let ids = app.entries.ids().to_vec();

    app.handle_key_event(KeyEvent::new(KeyCode::Up, KeyModifiers::CONTROL));
    assert_eq!(app.entries.ids(), &[ids[1], ids[0]]);
    assert_eq!(app.focus, Focus::Entry(ids[1], Side::Left));

    press(&mut app, KeyCode::Down);
    assert_eq!(app.focus, Focus::Entry(ids[0], Side::Left));
}

#[test]
fn test_reply_updates_status() {
    let mut app = app("a");
    press(&mut app, KeyCode::Enter);
    app.session.dispatcher_mut().ready.push_back(Resolution {
        generation: 1,
        outcome: classify(200, b"null"),
    });
    app.drain_session();

    assert_eq!(app.status_message, "Info: Empty response");
    assert_eq!(app.status_severity, Severity::Error);
    assert_eq!(app.session.label(), SessionLabel::Failed);
}

#[test]
fn test_focus_cycles_and_esc_quits() {
    let mut app = app("");
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.focus, Focus::Derivation);
    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.focus, Focus::Prover);

    assert!(!app.should_quit);
    press(&mut app, KeyCode::Esc);
    assert!(app.should_quit);
}

#[test]
fn test_page_renders_solution() {
    let mut app = app("");
    press(&mut app, KeyCode::Enter);
    type_text(&mut app, "p");
    press(&mut app, KeyCode::Enter);
    app.session.dispatcher_mut().ready.push_back(Resolution {
        generation: 1,
        outcome: classify(200, br#"[{"name":"r1","left":"p","right":"q","just":"cut"}]"#),
    });
    app.drain_session();

    let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();
    let text = screen(&terminal);

    assert!(text.contains("Solution (1 steps)"));
    assert!(text.contains("r1"));
    assert!(text.contains("cut"));
    assert!(text.contains("IDLE"));
}

#[test]
fn test_derivation_pane_placeholder_and_rows() {
    let mut renderer = DerivationRenderer::new(TexTypesetter);
    let mut scroll = 0;
    let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();

    terminal
        .draw(|f| {
            render_derivation_pane(f, f.area(), renderer.view(), SessionLabel::Pending, false, &mut scroll)
        })
        .unwrap();
    assert!(screen(&terminal).contains("waiting for the prover"));

    renderer.render(&[
        ProofStep::new("1", "a", "b", "ax"),
        ProofStep::new("2", "c", "d", "mp"),
    ]);
    terminal
        .draw(|f| {
            render_derivation_pane(f, f.area(), renderer.view(), SessionLabel::Solution, true, &mut scroll)
        })
        .unwrap();
    let text = screen(&terminal);
    assert!(text.contains("Solution (2 steps)"));
    assert!(text.contains("ax"));
    assert!(text.contains("mp"));
}

#[test]
fn test_status_bar_shows_request() {
    let mut terminal = Terminal::new(TestBackend::new(120, 1)).unwrap();
    terminal
        .draw(|f| {
            render_status_bar(
                f,
                f.area(),
                "Proving...",
                Severity::Info,
                SessionState::Requesting { generation: 7 },
            )
        })
        .unwrap();

    let text = screen(&terminal);
    assert!(text.contains("REQUEST #7"));
    assert!(text.contains("Proving..."));
}
