//! Integration tests for remote references against a local HTTP server

use serde_json::json;
use specref_core::loader::{FetchError, LookupError, ReferenceResolver, ResolutionError};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Minimal HTTP/1.1 server serving fixed JSON bodies by path
struct TestServer {
    base: String,
    requests: Arc<AtomicUsize>,
}

impl TestServer {
    fn start(routes: &[(&str, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let routes: HashMap<String, String> = routes
            .iter()
            .map(|(path, body)| (path.to_string(), body.to_string()))
            .collect();
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                counter.fetch_add(1, Ordering::SeqCst);
                serve(stream, &routes);
            }
        });

        Self { base, requests }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

fn serve(mut stream: TcpStream, routes: &HashMap<String, String>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();

    // drain headers
    let mut line = String::new();
    while reader.read_line(&mut line).unwrap_or(0) > 2 {
        line.clear();
    }

    let response = match routes.get(&path) {
        Some(body) => format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        ),
        None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
    };
    let _ = stream.write_all(response.as_bytes());
}

#[test]
fn test_remote_document_and_fragment() {
    let server = TestServer::start(&[(
        "/common.json",
        r#"{"Id": {"type": "integer"}, "Tag": {"type": "string"}}"#,
    )]);
    let mut resolver = ReferenceResolver::new(".");

    let root = json!({
        "whole": {"$ref": server.url("/common.json")},
        "id": {"$ref": server.url("/common.json#/Id")},
        "tag": {"$ref": server.url("/common.json#/Tag")}
    });
    let resolved = resolver.resolve_refs(&root).unwrap();

    assert_eq!(resolved["id"], json!({"type": "integer"}));
    assert_eq!(resolved["tag"], json!({"type": "string"}));
    assert_eq!(resolved["whole"]["Id"], json!({"type": "integer"}));
    // one fetch per document, not per fragment
    assert_eq!(server.requests(), 1);
}

#[test]
fn test_remote_fragment_is_percent_decoded() {
    let server = TestServer::start(&[(
        "/petstore.json",
        r#"{"paths": {"/pets/{petId}": {"get": true}}}"#,
    )]);
    let mut resolver = ReferenceResolver::new(".");

    let resolved = resolver
        .resolve_refs(&json!({"$ref": server.url("/petstore.json#/paths/~1pets~1%7BpetId%7D")}))
        .unwrap();
    assert_eq!(resolved, json!({"get": true}));
}

#[test]
fn test_relative_ref_inside_remote_document() {
    let server = TestServer::start(&[
        ("/api/root.json", r##"{"User": {"$ref": "user.json#/User"}, "Local": {"$ref": "#/User"}}"##),
        ("/api/user.json", r#"{"User": {"type": "object"}}"#),
    ]);
    let mut resolver = ReferenceResolver::new(".");

    let resolved = resolver
        .resolve_refs(&json!({"$ref": server.url("/api/root.json")}))
        .unwrap();
    assert_eq!(
        resolved,
        json!({"User": {"type": "object"}, "Local": {"type": "object"}})
    );
}

#[test]
fn test_remote_not_found_status() {
    let server = TestServer::start(&[]);
    let mut resolver = ReferenceResolver::new(".");

    let reference = server.url("/missing.json");
    let err = resolver
        .resolve_refs(&json!({"$ref": reference}))
        .unwrap_err();

    match err {
        ResolutionError::ReferenceNotFound {
            source: LookupError::Fetch { source: FetchError::Status(404), .. },
            ..
        } => {}
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_remote_body_must_be_json() {
    let server = TestServer::start(&[("/spec.yaml", "type: object\n")]);
    let mut resolver = ReferenceResolver::new(".");

    let err = resolver
        .resolve_refs(&json!({"$ref": server.url("/spec.yaml")}))
        .unwrap_err();
    assert!(matches!(err, ResolutionError::Parse { .. }));
}
