//! Shared helpers for integration tests.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves one HTTP response whose body is written in timed pieces.
///
/// Each `(wait, bytes)` step sleeps for `wait` and then writes `bytes`.
/// `Content-Length` covers all steps, so the client keeps reading until the
/// last piece. Returns the URL of `path` on the server.
pub async fn serve_in_pieces(
    path: &str,
    content_type: &'static str,
    steps: Vec<(Duration, Vec<u8>)>,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let content_length: usize = steps.iter().map(|(_, bytes)| bytes.len()).sum();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.set_nodelay(true).unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;

        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\n\
             Content-Length: {content_length}\r\nConnection: close\r\n\r\n"
        );
        if socket.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        for (wait, bytes) in steps {
            tokio::time::sleep(wait).await;
            // The client may hang up after a timeout.
            if socket.write_all(&bytes).await.is_err() {
                return;
            }
        }
        let _ = socket.flush().await;
    });

    format!("http://{addr}{path}")
}

/// One byte of `body` every `gap`.
pub fn trickle(body: &[u8], gap: Duration) -> Vec<(Duration, Vec<u8>)> {
    body.iter().map(|byte| (gap, vec![*byte])).collect()
}
