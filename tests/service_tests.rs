// Integration tests for the HTTP service and the threaded dispatcher

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use provetty::batch::{self, Job};
use provetty::protocol::{ProofRequest, SessionOutcome, CONTENT_TYPE};
use provetty::service::{
    HttpProofService, ProofService, ServiceReply, TransportError, MAX_BODY_BYTES,
};
use provetty::session::{
    exchange, Dispatch, ProofSessionController, Resolved, SessionLabel, ThreadDispatcher,
};
use provetty::typeset::TexTypesetter;

/// What the fake server saw
struct Captured {
    request_line: String,
    content_type: Option<String>,
    body: String,
}

/// Serve exactly one request with `status` and `body`
fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut content_type = None;
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                match name.to_ascii_lowercase().as_str() {
                    "content-type" => content_type = Some(value.trim().to_string()),
                    "content-length" => content_length = value.trim().parse().unwrap(),
                    _ => {}
                }
            }
        }

        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        // The client may hang up early, e.g. on an oversized body
        let mut stream = reader.into_inner();
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();

        Captured {
            request_line: request_line.trim_end().to_string(),
            content_type,
            body: String::from_utf8(request_body).unwrap(),
        }
    });

    (url, handle)
}

fn service(url: &str) -> HttpProofService {
    HttpProofService::new(url, Duration::from_secs(5)).unwrap()
}

#[test]
fn test_prove_posts_formula() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"name":"1","left":"a","right":"b","just":"ax"}]"#.to_string(),
    );

    let outcome = exchange(&service(&url), &ProofRequest::prove(r"\Box a"));
    let captured = server.join().unwrap();

    assert_eq!(captured.request_line, "POST /prover HTTP/1.1");
    assert_eq!(captured.content_type.as_deref(), Some(CONTENT_TYPE));
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent, serde_json::json!({"oid": 0, "formula": "\\Box a"}));

    match outcome {
        SessionOutcome::Success(steps) => {
            assert_eq!(steps.len(), 1);
            assert_eq!(steps[0].just, "ax");
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[test]
fn test_trailing_slash_in_base_url() {
    let (url, server) = serve_once("200 OK", "null".to_string());
    let service = service(&format!("{}/", url));
    assert!(!service.base_url().ends_with('/'));

    let outcome = exchange(&service, &ProofRequest::solve(&[]));
    let captured = server.join().unwrap();

    assert_eq!(captured.request_line, "POST /solve HTTP/1.1");
    assert_eq!(captured.body, "[]");
    assert_eq!(outcome, SessionOutcome::Failure("Empty response".to_string()));
}

#[test]
fn test_error_status_is_passed_through() {
    let (url, server) = serve_once(
        "500 Internal Server Error",
        r#"{"info":"search exhausted","result":[]}"#.to_string(),
    );

    let reply = service(&url).submit(&ProofRequest::prove("a")).unwrap();
    server.join().unwrap();

    assert_eq!(reply.status, 500);
    let outcome = provetty::protocol::classify(reply.status, &reply.body);
    assert_eq!(
        outcome,
        SessionOutcome::Partial {
            steps: Vec::new(),
            info: "search exhausted".to_string()
        }
    );
}

#[test]
fn test_oversized_body_is_rejected() {
    let body = format!("[{}]", " ".repeat(MAX_BODY_BYTES as usize));
    let (url, server) = serve_once("200 OK", body);

    let result = service(&url).submit(&ProofRequest::prove("a"));
    server.join().unwrap();

    assert!(matches!(result, Err(TransportError::BodyTooLarge { .. })));
}

#[test]
fn test_unreachable_server_is_network_error() {
    // Bind and drop to get a port nobody listens on
    let url = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let outcome = exchange(&service(&url), &ProofRequest::prove("a"));
    assert!(matches!(outcome, SessionOutcome::NetworkError(_)));
}

/// Holds back the reply to `first` until the test releases it
struct Gated {
    gate: Mutex<Receiver<()>>,
}

impl ProofService for Gated {
    fn submit(&self, request: &ProofRequest) -> Result<ServiceReply, TransportError> {
        let formula = match request {
            ProofRequest::Prove(raw) => raw.formula.clone(),
            ProofRequest::Solve(_) => String::new(),
        };
        if formula == "first" {
            self.gate.lock().unwrap().recv().unwrap();
        }

        let body = serde_json::json!([{"name": formula, "left": "a", "right": "b", "just": ""}]);
        Ok(ServiceReply {
            status: 200,
            body: body.to_string().into_bytes(),
        })
    }
}

#[test]
fn test_thread_dispatcher_keeps_newest_request() {
    let (release, gate) = mpsc::channel();
    let dispatcher = ThreadDispatcher::new(Gated {
        gate: Mutex::new(gate),
    });
    let mut session = ProofSessionController::new(dispatcher, TexTypesetter);

    let first = session.prove("first");
    session.prove("second");

    let outcome = session.wait(Duration::from_secs(5)).cloned();
    match outcome {
        Some(SessionOutcome::Success(steps)) => assert_eq!(steps[0].name, "second"),
        other => panic!("expected success, got {:?}", other),
    }

    // The first request only finishes now, after the second was applied
    release.send(()).unwrap();
    let late = session
        .dispatcher_mut()
        .next_resolution(Some(Duration::from_secs(5)))
        .unwrap();
    assert_eq!(late.generation, first);
    assert_eq!(session.resolve(late), Resolved::Discarded);
    assert_eq!(session.view().rows()[0].name, "second");
    assert_eq!(session.label(), SessionLabel::Solution);
}

#[test]
fn test_batch_prints_derivation() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"name":"1","left":"\\Box a","right":"a","just":"ax"}]"#.to_string(),
    );

    let mut out = Vec::new();
    let complete = batch::run(
        service(&url),
        &Job::Prove(r"\Box a".to_string()),
        Duration::from_secs(5),
        &mut out,
    )
    .unwrap();
    server.join().unwrap();

    assert!(complete);
    assert_eq!(String::from_utf8(out).unwrap(), "Solution\n1: □a ← a   [ax]\n");
}

#[test]
fn test_batch_reports_failure_info() {
    let (url, server) = serve_once("400 Bad Request", r#"{"info":"parse error"}"#.to_string());

    let mut out = Vec::new();
    let job = Job::solve_from_flat(&["a".to_string(), "b".to_string()]);
    let complete = batch::run(service(&url), &job, Duration::from_secs(5), &mut out).unwrap();
    let captured = server.join().unwrap();

    assert!(!complete);
    assert_eq!(captured.request_line, "POST /solve HTTP/1.1");
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "No solution\nInfo: parse error\n"
    );
}

#[test]
fn test_batch_labels_network_errors() {
    let url = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let mut out = Vec::new();
    let job = Job::Prove("a".to_string());
    let complete = batch::run(service(&url), &job, Duration::from_secs(5), &mut out).unwrap();

    assert!(!complete);
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.starts_with("No solution\nFetch error: "), "{}", printed);
}
