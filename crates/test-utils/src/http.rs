//! One-shot HTTP responder for exercising the real reqwest client.

use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Serves exactly one request with a canned response, then closes.
pub struct Responder {
    pub base_url: String,
    handle: JoinHandle<Result<String>>,
}

impl Responder {
    /// Wait for the request to be served and return it verbatim
    /// (request line, headers and body).
    pub async fn request(self) -> Result<String> {
        self.handle.await?
    }
}

/// Bind to an ephemeral localhost port and answer the first request with
/// `status` (e.g. `"200 OK"`) and `body` as `application/json`.
pub async fn spawn_responder(status: &'static str, body: &'static str) -> Result<Responder> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await?;
        let request = read_request(&mut socket).await?;

        let response = format!(
            "HTTP/1.1 {status}\r\n\
             content-type: application/json\r\n\
             content-length: {}\r\n\
             connection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await?;
        socket.shutdown().await?;
        Ok::<_, anyhow::Error>(request)
    });

    Ok(Responder {
        base_url: format!("http://{addr}"),
        handle,
    })
}

async fn read_request(socket: &mut TcpStream) -> Result<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}
