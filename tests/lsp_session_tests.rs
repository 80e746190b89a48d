//! Drives the `pkgreq-ls` binary over stdio
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdout, Command, Stdio};

use serde_json::{json, Value};

const DOCUMENT_URI: &str = "file:///tmp/demo.el";

fn spawn_server() -> Child {
    let bin_path = std::env::var("CARGO_BIN_EXE_pkgreq-ls")
        .unwrap_or_else(|_| "target/debug/pkgreq-ls".to_string());

    Command::new(bin_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .env("PKGREQ_LS_TEST_EXIT", "1")
        .spawn()
        .expect("Failed to spawn language server")
}

fn send(child: &mut Child, message: Value) {
    let body = message.to_string();
    let stdin = child.stdin.as_mut().expect("stdin");
    write!(stdin, "Content-Length: {}\r\n\r\n{}", body.len(), body).expect("write message");
    stdin.flush().expect("flush");
}

fn receive(reader: &mut BufReader<ChildStdout>) -> Value {
    let mut content_length = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).expect("read header") == 0 {
            panic!("Server closed stdout before the expected message");
        }
        if line.trim().is_empty() {
            break;
        }
        if let Some(length) = line.strip_prefix("Content-Length:") {
            content_length = Some(length.trim().parse::<usize>().expect("length"));
        }
    }

    let mut body = vec![0u8; content_length.expect("Missing Content-Length header")];
    reader.read_exact(&mut body).expect("read body");
    serde_json::from_slice(&body).expect("valid JSON")
}

fn initialize_request() -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "processId": null,
            "rootUri": null,
            "capabilities": {
                "textDocument": {
                    "hover": { "dynamicRegistration": false },
                    "completion": { "dynamicRegistration": false }
                }
            }
        }
    })
}

fn shutdown(mut server: Child) {
    drop(server.stdin.take());
    let _ = server.kill();
    let _ = server.wait();
}

#[test]
fn test_initialize_reports_capabilities() {
    let mut server = spawn_server();
    let mut reader = BufReader::new(server.stdout.take().expect("stdout"));

    send(&mut server, initialize_request());
    let response = receive(&mut reader);

    assert_eq!(response["jsonrpc"].as_str(), Some("2.0"));
    assert_eq!(response["id"].as_i64(), Some(1));

    let result = &response["result"];
    let capabilities = &result["capabilities"];
    assert!(capabilities["hoverProvider"].as_bool().unwrap_or(false));
    assert_eq!(
        capabilities["completionProvider"]["triggerCharacters"],
        json!(["("])
    );
    assert_eq!(capabilities["textDocumentSync"].as_i64(), Some(1));
    assert_eq!(result["serverInfo"]["name"].as_str(), Some("pkgreq-ls"));

    shutdown(server);
}

#[test]
fn test_did_open_publishes_diagnostics() {
    let mut server = spawn_server();
    let mut reader = BufReader::new(server.stdout.take().expect("stdout"));

    send(&mut server, initialize_request());
    let response = receive(&mut reader);
    assert_eq!(response.get("id").and_then(|v| v.as_i64()), Some(1));

    send(
        &mut server,
        json!({ "jsonrpc": "2.0", "method": "initialized", "params": {} }),
    );

    let text = ";;; demo.el --- Demo  -*- lexical-binding: t -*-\n\
                ;; Version: 0.1\n\
                ;; Package-Requires: ((emacs \"25.1\") (nope-not-a-package \"1.0\"))\n\
                ;;; Code:\n\
                ;;; demo.el ends here\n";
    send(
        &mut server,
        json!({
            "jsonrpc": "2.0",
            "method": "textDocument/didOpen",
            "params": {
                "textDocument": {
                    "uri": DOCUMENT_URI,
                    "languageId": "emacs-lisp",
                    "version": 1,
                    "text": text
                }
            }
        }),
    );

    let params = loop {
        let message = receive(&mut reader);
        if message.get("method").and_then(|m| m.as_str()) == Some("textDocument/publishDiagnostics")
        {
            break message["params"].clone();
        }
    };

    assert_eq!(params["uri"].as_str(), Some(DOCUMENT_URI));
    let diagnostics = params["diagnostics"].as_array().expect("diagnostics array");
    assert_eq!(diagnostics.len(), 1, "unexpected: {:?}", diagnostics);
    assert_eq!(
        diagnostics[0]["message"].as_str(),
        Some("Package nope-not-a-package is unknown in the current package list.")
    );
    assert_eq!(diagnostics[0]["range"]["start"]["line"].as_i64(), Some(2));
    assert_eq!(diagnostics[0]["severity"].as_i64(), Some(1));

    shutdown(server);
}
