//! `HttpTransport` against a scripted local HTTP server.

use graphql_dsl::{GraphQLRequest, Transport, TransportError};
use graphql_dsl_introspect::HttpTransport;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

type Seen = Arc<Mutex<Vec<String>>>;

/// Serve one scripted `(status, body)` per connection, recording each raw request.
async fn serve(script: Vec<(u16, &'static str)>) -> (String, Seen) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/graphql", listener.local_addr().unwrap());
    let seen = Seen::default();

    let log = Arc::clone(&seen);
    tokio::spawn(async move {
        for (status, body) in script {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            log.lock().unwrap().push(request);

            let response = format!(
                "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
    });

    (url, seen)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn transport(url: &str, retries: u32) -> HttpTransport {
    HttpTransport::builder(url)
        .with_header("Authorization", "Bearer secret")
        .with_retries(retries)
        .with_backoff(Duration::from_millis(10))
        .with_timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_posts_json_with_headers() {
    let (url, seen) = serve(vec![(200, r#"{"data":{"hero":{"name":"R2-D2"}}}"#)]).await;

    let response = transport(&url, 0)
        .execute(&GraphQLRequest::new("{ hero { name } }"))
        .await
        .unwrap();
    assert_eq!(response.data, Some(json!({"hero": {"name": "R2-D2"}})));
    assert!(response.errors.is_empty());

    let seen = seen.lock().unwrap();
    let request = seen[0].to_ascii_lowercase();
    assert!(request.starts_with("post /graphql http/1.1"), "{request}");
    assert!(request.contains("authorization: bearer secret"), "{request}");
    assert!(request.contains("content-type: application/json"), "{request}");
    assert!(seen[0].ends_with(r#"{"query":"{ hero { name } }"}"#), "{}", seen[0]);
}

#[tokio::test]
async fn test_retries_server_errors() {
    let (url, seen) = serve(vec![(503, "busy"), (200, r#"{"data":{"ok":true}}"#)]).await;

    let response = transport(&url, 1)
        .execute(&GraphQLRequest::new("{ ok }"))
        .await
        .unwrap();
    assert_eq!(response.data, Some(json!({"ok": true})));
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_gives_up_after_retries() {
    let (url, seen) = serve(vec![(500, "down"), (502, "still down")]).await;

    let err = transport(&url, 1)
        .execute(&GraphQLRequest::new("{ ok }"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Http(502, ref body) if body == "still down"), "{err}");
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let (url, seen) = serve(vec![(400, "bad request")]).await;

    let err = transport(&url, 3)
        .execute(&GraphQLRequest::new("{ ok }"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Http(400, _)), "{err}");
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unparseable_body() {
    let (url, _) = serve(vec![(200, "<html>")]).await;

    let err = transport(&url, 2)
        .execute(&GraphQLRequest::new("{ ok }"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Parse(_)), "{err}");
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/graphql", listener.local_addr().unwrap());
    drop(listener);

    let err = transport(&url, 0)
        .execute(&GraphQLRequest::new("{ ok }"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Network(_)), "{err}");
}
