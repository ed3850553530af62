use broker::{router, BrokerState};
use futures_util::{SinkExt, StreamExt};
use net::{Bus, ChatRequest, Envelope, Reading, Topic, WsBus};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

async fn spawn_broker() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(BrokerState::default()))
            .await
            .unwrap();
    });
    addr
}

fn ws_url(addr: SocketAddr) -> Url {
    Url::parse(&format!("ws://{addr}/ws")).unwrap()
}

#[tokio::test]
async fn routes_only_subscribed_topics() {
    let addr = spawn_broker().await;
    let listener = WsBus::with_retry(ws_url(addr), Duration::from_millis(50));
    let talker = WsBus::with_retry(ws_url(addr), Duration::from_millis(50));
    let mut sub = listener.subscribe(&[Topic::ChatRequest]).await.unwrap();

    // Both clients connect in the background; keep publishing until the
    // subscription is live on the broker.
    let mut received = None;
    for _ in 0..40 {
        let _ = talker.publish(Envelope::new(Topic::SensorRaw, &Reading::default()).unwrap());
        let _ = talker.publish(
            Envelope::new(Topic::ChatRequest, &ChatRequest { text: "hi".into() }).unwrap(),
        );
        if let Ok(Some(env)) = timeout(Duration::from_millis(50), sub.recv()).await {
            received = Some(env);
            break;
        }
    }
    let env = received.expect("no message relayed");
    assert_eq!(env.topic, Topic::ChatRequest);
    let req: ChatRequest = env.decode().unwrap();
    assert_eq!(req.text, "hi");

    listener.close().await;
    talker.close().await;
}

#[tokio::test]
async fn malformed_frames_do_not_kill_the_connection() {
    let addr = spawn_broker().await;
    let (mut ws, _) = connect_async(ws_url(addr)).await.unwrap();
    ws.send(Message::Text("not json".into())).await.unwrap();
    ws.send(Message::Text(r#"{"op":"subscribe","topic":"plant/ui/update"}"#.into()))
        .await
        .unwrap();
    ws.send(Message::Text(r#"{"op":"subscribe","topic":"chat.update"}"#.into()))
        .await
        .unwrap();
    ws.send(Message::Text(
        r#"{"op":"publish","topic":"chat.update","payload":{"speech":"still here"}}"#.into(),
    ))
    .await
    .unwrap();

    let msg = timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("timed out")
        .unwrap()
        .unwrap();
    let text = msg.into_text().unwrap();
    let frame: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(frame["op"], "message");
    assert_eq!(frame["topic"], "chat.update");
    assert_eq!(frame["payload"]["speech"], "still here");
}
