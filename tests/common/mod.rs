#![allow(dead_code)]

use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A canned response keyed by method and request target.
pub struct Route {
    pub method: &'static str,
    pub target: &'static str,
    pub status: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl Route {
    pub fn get_json(target: &'static str, body: &str) -> Self {
        Self {
            method: "GET",
            target,
            status: "200 OK",
            headers: vec![("Content-Type", "application/json".to_string())],
            body: body.to_string(),
        }
    }

    pub fn head_sized(target: &'static str, bytes: u64) -> Self {
        Self {
            method: "HEAD",
            target,
            status: "200 OK",
            headers: vec![("Content-Length", bytes.to_string())],
            body: String::new(),
        }
    }

    fn render(&self) -> String {
        let mut out = format!("HTTP/1.1 {}\r\nConnection: close\r\n", self.status);
        let has_length = self
            .headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("content-length"));
        for (name, value) in &self.headers {
            out.push_str(&format!("{name}: {value}\r\n"));
        }
        if !has_length {
            out.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        }
        out.push_str("\r\n");
        if self.method != "HEAD" {
            out.push_str(&self.body);
        }
        out
    }
}

const NOT_FOUND: &str = "HTTP/1.1 404 Not Found\r\nConnection: close\r\nContent-Length: 0\r\n\r\n";

/// Serves `routes` on a loopback port until the test runtime shuts down and returns
/// the base URL.
pub async fn serve(routes: Vec<Route>) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&chunk[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&request);
                let mut request_line = head.split_whitespace();
                let method = request_line.next().unwrap_or_default();
                let target = request_line.next().unwrap_or_default();
                let response = routes
                    .iter()
                    .find(|r| r.method == method && r.target == target)
                    .map(Route::render)
                    .unwrap_or_else(|| NOT_FOUND.to_string());

                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    Ok(format!("http://{addr}"))
}

/// Client that never routes loopback traffic through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build reqwest client")
}
