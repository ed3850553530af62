use httpmock::Method::POST;
use httpmock::MockServer;
use llm::{collect_reply, OllamaClient};
use std::time::Duration;

fn chunk(response: &str, done: bool) -> String {
    format!(
        "{{\"model\":\"gemma:2b\",\"created_at\":\"now\",\"response\":{response:?},\"done\":{done}}}\n"
    )
}

#[tokio::test]
async fn collects_streamed_generation() {
    let server = MockServer::start_async().await;
    let body = [
        chunk("sad|", false),
        chunk("It is so dark ", false),
        chunk("in here.", true),
    ]
    .concat();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(200)
            .header("content-type", "application/x-ndjson")
            .body(body);
    });

    let client = OllamaClient::new(server.base_url()).unwrap();
    let reply = collect_reply(&client, "gemma:2b", "how do you feel?", Duration::from_secs(5))
        .await
        .unwrap();
    mock.assert();
    assert_eq!(reply, "sad|It is so dark in here.");
}

#[tokio::test]
async fn server_error_is_reported() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(500).body("boom");
    });

    let client = OllamaClient::new(server.base_url()).unwrap();
    let res = collect_reply(&client, "gemma:2b", "hello", Duration::from_secs(5)).await;
    assert!(res.is_err());
}
