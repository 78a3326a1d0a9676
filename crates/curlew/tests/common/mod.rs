//! Shared fixtures: a fake HTTP/1.1 server over TCP and UNIX sockets.
//!
//! Routes:
//!
//! ```text
//! GET    /               "Hello World!"
//! POST   /               echo body      (also PUT, PATCH)
//! GET    /redirect       302 → /
//! *      /check-headers  request header lines, one per line
//! GET    /binary         bytes c3 28 ff (not UTF-8)
//! GET    /sleep/<ms>     sleep, then "Hello World!"
//! DELETE /<id>           "<id>"
//! *                      404
//! ```
//!
//! Every response carries `Connection: close`, so each request opens a fresh
//! connection.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::os::unix::net::UnixListener;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use curlew::PostRequestParameters;

pub const HELLO: &str = "Hello World!";

// ── Tracing setup ───────────────────────────────────────────────────

static TRACING_INIT: Once = Once::new();

/// Controlled by `RUST_LOG` (e.g. `RUST_LOG=curlew=debug`).
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

// ── Request parsing ─────────────────────────────────────────────────

struct ParsedRequest {
    method: String,
    path: String,
    header_lines: Vec<String>,
    body: Vec<u8>,
}

fn read_request(stream: &mut impl Read) -> std::io::Result<ParsedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();
    let header_lines: Vec<String> = lines.map(str::to_string).collect();

    let content_length = header_lines
        .iter()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(content_length);

    Ok(ParsedRequest {
        method,
        path,
        header_lines,
        body,
    })
}

// ── Routing ─────────────────────────────────────────────────────────

/// Status, reason phrase, extra header lines, body.
type Reply = (u16, &'static str, Vec<String>, Vec<u8>);

fn respond(request: &ParsedRequest) -> Reply {
    let ok = |body: Vec<u8>| -> Reply { (200, "OK", Vec::new(), body) };
    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/") => ok(HELLO.as_bytes().to_vec()),
        ("POST" | "PUT" | "PATCH", "/") => ok(request.body.clone()),
        ("GET", "/redirect") => (302, "Found", vec!["Location: /".to_string()], Vec::new()),
        (_, "/check-headers") => ok(request.header_lines.join("\n").into_bytes()),
        ("GET", "/binary") => ok(vec![0xc3, 0x28, 0xff]),
        ("GET", path) if path.starts_with("/sleep/") => {
            let ms = path["/sleep/".len()..].parse::<u64>().unwrap_or(0);
            std::thread::sleep(Duration::from_millis(ms));
            ok(HELLO.as_bytes().to_vec())
        }
        ("DELETE", path) if path.len() > 1 => ok(path[1..].as_bytes().to_vec()),
        _ => (404, "Not Found", Vec::new(), b"Not Found".to_vec()),
    }
}

fn serve(mut stream: impl Read + Write) {
    let Ok(request) = read_request(&mut stream) else {
        return;
    };
    let (status, reason, extra, body) = respond(&request);

    let mut response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n",
        body.len()
    );
    for line in extra {
        response.push_str(&line);
        response.push_str("\r\n");
    }
    response.push_str("\r\n");

    let mut bytes = response.into_bytes();
    bytes.extend_from_slice(&body);
    let _ = stream.write_all(&bytes);
    let _ = stream.flush();
}

// ── FakeServer (TCP) ────────────────────────────────────────────────

pub struct FakeServer {
    addr: std::net::SocketAddr,
}

impl FakeServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind to random port");
        let addr = listener.local_addr().expect("local addr");

        std::thread::spawn(move || {
            while let Ok((stream, _)) = listener.accept() {
                std::thread::spawn(move || serve(stream));
            }
        });

        Self { addr }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

/// A TCP server that drops its first `failures` connections without
/// answering, then serves normally.
pub struct FlakyServer {
    addr: std::net::SocketAddr,
    connections: Arc<AtomicUsize>,
}

impl FlakyServer {
    pub fn start(failures: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind to random port");
        let addr = listener.local_addr().expect("local addr");
        let connections = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&connections);
        std::thread::spawn(move || {
            while let Ok((mut stream, _)) = listener.accept() {
                if seen.fetch_add(1, Ordering::SeqCst) < failures {
                    // Consume the request so the close is a clean EOF.
                    let _ = read_request(&mut stream);
                    drop(stream);
                    continue;
                }
                std::thread::spawn(move || serve(stream));
            }
        });

        Self { addr, connections }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

// ── FakeUnixServer ──────────────────────────────────────────────────

pub struct FakeUnixServer {
    path: PathBuf,
    _dir: tempfile::TempDir,
}

impl FakeUnixServer {
    pub fn start() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("curlew.sock");
        let listener = UnixListener::bind(&path).expect("bind unix socket");

        std::thread::spawn(move || {
            while let Ok((stream, _)) = listener.accept() {
                std::thread::spawn(move || serve(stream));
            }
        });

        Self { path, _dir: dir }
    }

    pub fn socket_path(&self) -> &str {
        self.path.to_str().expect("utf-8 socket path")
    }
}

// ── Callback capture ────────────────────────────────────────────────

/// Records every handler invocation of one call.
#[derive(Default, Debug)]
pub struct Calls {
    pub successes: Vec<String>,
    pub errors: Vec<(String, i64)>,
}

/// Handlers appending to `calls`.
pub fn capture(calls: &RefCell<Calls>) -> PostRequestParameters<'_> {
    PostRequestParameters::new()
        .with_on_success(move |body| calls.borrow_mut().successes.push(body.to_string()))
        .with_on_error(move |message, code| {
            calls.borrow_mut().errors.push((message.to_string(), code))
        })
}
