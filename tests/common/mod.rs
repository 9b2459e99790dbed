//! Shared utilities for integration tests.
//!
//! Everything talks over Unix sockets inside a per-test temporary directory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use docker_proxy_acl::config::{ListenerConfig, UpstreamConfig};
use docker_proxy_acl::net::bind_unix_listener;
use docker_proxy_acl::{AllowedSet, HttpServer, Shutdown};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

/// A canned upstream that records every request target it receives.
#[derive(Clone)]
pub struct MockUpstream {
    pub socket: PathBuf,
    hits: Arc<AtomicUsize>,
    targets: Arc<Mutex<Vec<String>>>,
}

impl MockUpstream {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

/// Canned upstream reply.
#[derive(Clone, Copy)]
pub struct Reply {
    pub status: &'static str,
    pub content_type: Option<&'static str>,
    pub body: &'static str,
}

impl Reply {
    pub const fn ok(body: &'static str) -> Self {
        Self {
            status: "200 OK",
            content_type: None,
            body,
        }
    }

    pub const fn json(body: &'static str) -> Self {
        Self {
            status: "200 OK",
            content_type: Some("application/json"),
            body,
        }
    }
}

/// Start an upstream that answers every request with `reply`.
pub async fn start_mock_upstream(socket: PathBuf, reply: Reply) -> MockUpstream {
    let listener = UnixListener::bind(&socket).unwrap();
    let mock = MockUpstream {
        socket,
        hits: Arc::new(AtomicUsize::new(0)),
        targets: Arc::new(Mutex::new(Vec::new())),
    };

    let state = mock.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let state = state.clone();
                    tokio::spawn(async move {
                        let (read, mut write) = stream.into_split();
                        let mut reader = BufReader::new(read);

                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
                            return;
                        }
                        loop {
                            let mut line = String::new();
                            match reader.read_line(&mut line).await {
                                Ok(0) => break,
                                Ok(_) if line == "\r\n" => break,
                                Ok(_) => continue,
                                Err(_) => return,
                            }
                        }

                        let target = request_line
                            .split_whitespace()
                            .nth(1)
                            .unwrap_or_default()
                            .to_string();
                        state.targets.lock().unwrap().push(target);
                        state.hits.fetch_add(1, Ordering::SeqCst);

                        let content_type = reply
                            .content_type
                            .map(|ct| format!("Content-Type: {ct}\r\n"))
                            .unwrap_or_default();
                        let response = format!(
                            "HTTP/1.1 {}\r\n{}Api-Version: 1.43\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            reply.status,
                            content_type,
                            reply.body.len(),
                            reply.body
                        );
                        let _ = write.write_all(response.as_bytes()).await;
                        let _ = write.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    mock
}

/// Start an upstream that accepts connections and never answers.
pub async fn start_silent_upstream(socket: PathBuf) {
    let listener = UnixListener::bind(&socket).unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
}

/// A running gateway bound inside a temporary directory.
pub struct Gateway {
    pub socket: PathBuf,
    pub shutdown: Shutdown,
}

/// Start the gateway with the given categories in front of `upstream`.
pub async fn start_gateway(dir: &Path, allow: &[&str], upstream: UpstreamConfig) -> Gateway {
    let allowed = AllowedSet::parse(allow).unwrap();
    let listener_config = ListenerConfig {
        socket_path: dir.join("gateway.sock"),
        socket_mode: 0o666,
    };

    let server = HttpServer::new(&allowed, &upstream);
    let listener = bind_unix_listener(&listener_config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Gateway {
        socket: listener_config.socket_path,
        shutdown,
    }
}

/// Upstream settings pointing at `socket` with a short timeout.
pub fn upstream_config(socket: &Path) -> UpstreamConfig {
    UpstreamConfig {
        socket_path: socket.to_path_buf(),
        timeout_secs: 2,
        ..UpstreamConfig::default()
    }
}

/// A response as seen by a gateway client.
#[derive(Debug)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Send one request to the gateway over its Unix socket.
pub async fn send(socket: &Path, method: Method, target: &str) -> GatewayResponse {
    let stream = UnixStream::connect(socket).await.unwrap();
    let (mut sender, conn) = http1::handshake::<_, Body>(TokioIo::new(stream))
        .await
        .unwrap();
    tokio::spawn(async move {
        let _ = conn.await;
    });

    let request = Request::builder()
        .method(method)
        .uri(target)
        .header("Host", "localhost")
        .body(Body::empty())
        .unwrap();

    let response = tokio::time::timeout(Duration::from_secs(10), sender.send_request(request))
        .await
        .expect("gateway did not answer")
        .unwrap();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(Body::new(body), usize::MAX).await.unwrap();

    GatewayResponse {
        status: parts.status,
        headers: parts.headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub async fn get(socket: &Path, target: &str) -> GatewayResponse {
    send(socket, Method::GET, target).await
}
