#![cfg(feature = "reqwest")]

use courier_fetch::{Method, ReqwestTransport, send};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one connection with `response` and return the URL to request.
async fn serve_once(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}/media/cat.png")
}

fn transport() -> ReqwestTransport {
    ReqwestTransport::with_client(reqwest::Client::builder().no_proxy().build().unwrap())
}

#[tokio::test]
async fn test_head_reports_content_length_header() {
    let url = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 12345\r\nConnection: close\r\n\r\n",
    )
    .await;

    let mut exchange = send(&transport(), Method::Head, &url).await.unwrap();
    let head = exchange.response.head().clone();

    assert_eq!(head.status, 200);
    assert_eq!(head.content_type.as_deref(), Some("image/png"));
    assert_eq!(head.content_length, Some(12345));
    assert!(exchange.response.chunk().await.unwrap().is_none());
    exchange.close().await;
}

#[tokio::test]
async fn test_get_reads_body_and_length() {
    let url = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello",
    )
    .await;

    let mut exchange = send(&transport(), Method::Get, &url).await.unwrap();

    assert_eq!(exchange.response.head().content_length, Some(5));
    assert_eq!(exchange.response.head().charset.as_deref(), Some("utf-8"));
    assert_eq!(&exchange.response.body().await.unwrap()[..], b"hello");
    exchange.close().await;
}

#[tokio::test]
async fn test_error_status_through_reqwest() {
    let url = serve_once(
        "HTTP/1.1 404 Not Found\r\nContent-Type: application/json\r\nContent-Length: 37\r\nConnection: close\r\n\r\n{\"message\": \"Unknown\", \"code\": 10001}",
    )
    .await;

    let err = send(&transport(), Method::Get, &url).await.unwrap_err();
    let http = err.as_http().expect("http error");

    assert_eq!(http.status, 404);
    assert_eq!(http.message, "Unknown");
    assert_eq!(http.code, 10001);
}
