use contract_intel::config::OracleConfig;
use contract_intel::network::{
    ClassificationRequest, GenerationRequest, HuggingFaceOracle, MockOracle, Oracle, OracleError,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// * One-shot HTTP server: reads a full request, replies with the given status and body
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(header_end) = find_header_end(&buf) {
                let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}/models/")
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

#[tokio::test]
async fn test_client_initialization() {
    let oracle = HuggingFaceOracle::new(&OracleConfig::new("hf_test"));
    assert!(oracle.is_ok());
}

#[tokio::test]
async fn test_classification_success() {
    let base = serve_once("HTTP/1.1 200 OK", r#"{"labels":["x"],"scores":[0.91]}"#).await;
    let oracle = HuggingFaceOracle::new(&OracleConfig::new("hf_test").with_base_url(base)).unwrap();

    let response = oracle
        .classify(ClassificationRequest::new("text", "This text contains contact information"))
        .await
        .unwrap();
    assert_eq!(response.top_score(), Ok(0.91));
}

#[tokio::test]
async fn test_non_2xx_is_unavailable() {
    let base = serve_once("HTTP/1.1 500 Internal Server Error", "{}").await;
    let oracle = HuggingFaceOracle::new(&OracleConfig::new("hf_test").with_base_url(base)).unwrap();

    let err = oracle
        .classify(ClassificationRequest::new("text", "label"))
        .await
        .unwrap_err();
    assert_eq!(err, OracleError::Unavailable("HTTP 500".to_string()));
}

#[tokio::test]
async fn test_malformed_generation_body() {
    let base = serve_once("HTTP/1.1 200 OK", r#"{"error":"model loading"}"#).await;
    let oracle = HuggingFaceOracle::new(&OracleConfig::new("hf_test").with_base_url(base)).unwrap();

    let err = oracle
        .generate(GenerationRequest::new("Extract:"))
        .await
        .unwrap_err();
    assert!(matches!(err, OracleError::MalformedBody(_)));
}

#[tokio::test]
async fn test_mock_behind_trait_object() {
    let oracle: Arc<dyn Oracle> = Arc::new(
        MockOracle::new()
            .with_default_score(0.4)
            .with_generated_text("Globex LLC"),
    );

    let response = oracle
        .classify(ClassificationRequest::new("text", "anything"))
        .await
        .unwrap();
    assert_eq!(response.scores, vec![0.4]);

    let generated = oracle.generate(GenerationRequest::new("p")).await.unwrap();
    assert_eq!(generated[0].generated_text, "Globex LLC");
}

#[tokio::test]
async fn test_mock_delay() {
    let oracle = MockOracle::new()
        .with_default_score(0.4)
        .with_delay(Duration::from_millis(50));

    let result = tokio::time::timeout(
        Duration::from_millis(5),
        oracle.classify(ClassificationRequest::new("text", "label")),
    )
    .await;
    assert!(result.is_err());
}
