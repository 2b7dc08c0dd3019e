use courier_fetch::mock::MockTransport;
use courier_fetch::{Error, HttpErrorKind, Method, send};

#[tokio::test]
async fn test_send_success_keeps_exchange_open() {
    let transport = MockTransport::new(200)
        .content_type("image/png")
        .chunks(["ab", "cd"]);

    let mut exchange = send(&transport, Method::Get, "https://example.com/a.png")
        .await
        .unwrap();

    assert_eq!(exchange.response.head().content_type.as_deref(), Some("image/png"));
    assert_eq!(exchange.response.head().content_length, Some(4));
    assert_eq!(transport.sessions_closed(), 0);

    assert_eq!(&exchange.response.body().await.unwrap()[..], b"abcd");
    exchange.close().await;

    assert_eq!(transport.responses_closed(), 1);
    assert_eq!(transport.sessions_closed(), 1);
}

#[tokio::test]
async fn test_send_maps_status_and_cleans_up() {
    let transport = MockTransport::new(404).body(r#"{"message": "Unknown Attachment", "code": 10001}"#);

    let err = send(&transport, Method::Get, "https://example.com/gone.png")
        .await
        .unwrap_err();

    let http = err.as_http().expect("http error");
    assert_eq!(http.kind, HttpErrorKind::NotFound);
    assert_eq!(http.status, 404);
    assert_eq!(http.message, "Unknown Attachment");
    assert_eq!(http.code, 10001);

    assert_eq!(transport.responses_closed(), 1);
    assert_eq!(transport.sessions_closed(), 1);
    assert_eq!(transport.responses_dropped(), 1);
    assert_eq!(transport.sessions_dropped(), 1);
}

#[tokio::test]
async fn test_send_too_many_requests_is_generic_client_error() {
    let transport = MockTransport::new(429).body("slow down");

    let err = send(&transport, Method::Get, "https://example.com/x").await.unwrap_err();

    assert!(matches!(err, Error::Http(ref e) if e.kind == HttpErrorKind::Client && e.kind.is_client()));
    assert_eq!(&err.as_http().unwrap().body[..], b"slow down");
}

#[tokio::test]
async fn test_send_head_has_no_body() {
    let transport = MockTransport::new(200).body("ignored");

    let mut exchange = send(&transport, Method::Head, "https://example.com/x").await.unwrap();

    assert!(exchange.response.chunk().await.unwrap().is_none());
    exchange.close().await;
    assert_eq!(transport.requests(), vec![(Method::Head, "https://example.com/x".to_owned())]);
}
