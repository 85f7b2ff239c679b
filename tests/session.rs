//! End-to-end request flows with a scripted gateway.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use trendcast::gateway::{Gateway, GatewayError, ParsedReply};
use trendcast::model::{Song, TrendSet};
use trendcast::queue::TaskQueue;
use trendcast::session::{Controls, Notice, SessionError, TrendSession, ERROR_TITLE};

#[derive(Debug, Clone)]
struct Call {
    instruction: String,
    structured: bool,
}

#[derive(Clone, Default)]
struct ScriptedGateway {
    replies: Arc<Mutex<VecDeque<Result<ParsedReply, GatewayError>>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedGateway {
    fn reply(self, r: Result<ParsedReply, GatewayError>) -> Self {
        self.replies.lock().unwrap().push_back(r);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn invoke(
        &self,
        instruction: &str,
        schema: Option<&Value>,
    ) -> Result<ParsedReply, GatewayError> {
        self.calls.lock().unwrap().push(Call {
            instruction: instruction.to_string(),
            structured: schema.is_some(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GatewayError::EmptyResult))
    }
}

fn session(gateway: &ScriptedGateway) -> TrendSession<ScriptedGateway> {
    TrendSession::new(gateway.clone(), TaskQueue::new(|| {}).unwrap())
}

fn gaming_trends() -> Value {
    json!({
        "hashtags": ["#gamingtok"],
        "songs": [{ "name": "Song", "artist": "Artist" }],
        "searchTerms": ["best games 2024"]
    })
}

#[test]
fn trend_generation_populates_current_trends() {
    let gateway = ScriptedGateway::default().reply(Ok(ParsedReply::Structured(gaming_trends())));
    let mut s = session(&gateway);

    let topic = s.generate_trends("gaming", "United States").unwrap();
    assert_eq!(topic.region_code, "US");
    assert_eq!(s.controls(), Controls { generate: false, video: false, copy: false });

    assert_eq!(s.wait_idle(), None);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].structured);
    for needle in ["gaming", "United States", "US"] {
        assert!(calls[0].instruction.contains(needle), "missing {needle}");
    }

    let current = s.current().unwrap();
    assert_eq!(
        current.trends,
        TrendSet {
            hashtags: vec!["#gamingtok".into()],
            songs: vec![Song { name: "Song".into(), artist: "Artist".into() }],
            search_terms: vec!["best games 2024".into()],
        }
    );
    assert_eq!(s.controls(), Controls { generate: true, video: true, copy: false });
    assert!(s.status().starts_with("Trends generated successfully"));
}

#[test]
fn blank_topic_defaults_to_general() {
    let gateway = ScriptedGateway::default().reply(Ok(ParsedReply::Structured(gaming_trends())));
    let mut s = session(&gateway);

    let topic = s.generate_trends("   ", "Global").unwrap();
    assert_eq!(topic.topic, "general");
    s.wait_idle();
    assert!(gateway.calls()[0].instruction.contains("'general'"));
    assert_eq!(s.current().unwrap().topic.topic, "general");
}

#[test]
fn failed_trends_keep_video_disabled() {
    let gateway = ScriptedGateway::default()
        .reply(Err(GatewayError::Transport("connection refused".into())));
    let mut s = session(&gateway);

    s.generate_trends("gaming", "Canada").unwrap();
    let notice = s.wait_idle();
    match notice {
        Some(Notice::Error { title, message }) => {
            assert_eq!(title, ERROR_TITLE);
            assert!(message.starts_with("Error during LLM trend data generation"));
            assert!(message.contains("connection refused"));
        }
        other => panic!("expected error notice, got {other:?}"),
    }
    assert_eq!(s.controls(), Controls { generate: true, video: false, copy: false });
    assert!(s.current().is_none());

    assert_eq!(s.create_video_prompt(), Err(SessionError::NoTrendData));
    assert_eq!(gateway.calls().len(), 1, "no gateway call for a local failure");
}

#[test]
fn malformed_trend_shape_is_reported() {
    let gateway = ScriptedGateway::default()
        .reply(Ok(ParsedReply::Structured(json!({ "hashtags": ["#x"] }))));
    let mut s = session(&gateway);

    s.generate_trends("news", "India").unwrap();
    assert!(matches!(s.wait_idle(), Some(Notice::Error { .. })));
    assert!(s.current().is_none());
}

#[test]
fn video_prompt_uses_captured_trends() {
    let gateway = ScriptedGateway::default()
        .reply(Ok(ParsedReply::Structured(gaming_trends())))
        .reply(Ok(ParsedReply::Text("A retro arcade glowing at night.".into())));
    let mut s = session(&gateway);

    s.generate_trends("gaming", "United States").unwrap();
    s.wait_idle();
    s.create_video_prompt().unwrap();
    assert_eq!(s.controls(), Controls { generate: false, video: false, copy: false });

    let notice = s.wait_idle();
    assert!(matches!(notice, Some(Notice::Info { ref title, .. }) if title == "Prompt Generated"));
    assert_eq!(s.video_prompt().unwrap().text, "A retro arcade glowing at night.");
    assert_eq!(s.controls(), Controls { generate: true, video: true, copy: true });

    let calls = gateway.calls();
    assert!(!calls[1].structured);
    assert!(calls[1].instruction.contains("#gamingtok"));
    assert!(calls[1].instruction.contains("\"Song\" by Artist"));
    assert!(calls[1].instruction.contains("'gaming' in 'United States'"));
}

#[test]
fn failed_refresh_keeps_previous_trends() {
    let gateway = ScriptedGateway::default()
        .reply(Ok(ParsedReply::Structured(gaming_trends())))
        .reply(Err(GatewayError::Status { status: 500, body: "oops".into() }))
        .reply(Err(GatewayError::EmptyResult));
    let mut s = session(&gateway);

    s.generate_trends("gaming", "United States").unwrap();
    s.wait_idle();
    s.generate_trends("cooking", "France").unwrap();
    assert!(s.wait_idle().is_some());

    let current = s.current().unwrap();
    assert_eq!(current.topic.topic, "gaming");
    assert_eq!(current.trends.hashtags, vec!["#gamingtok"]);
    assert_eq!(s.controls(), Controls { generate: true, video: true, copy: false });

    // Video failure leaves the prompt empty and copy disabled.
    s.create_video_prompt().unwrap();
    assert!(matches!(s.wait_idle(), Some(Notice::Error { .. })));
    assert!(s.video_prompt().is_none());
    assert_eq!(s.controls(), Controls { generate: true, video: true, copy: false });
}

#[test]
fn second_request_while_busy_is_rejected() {
    let gateway = ScriptedGateway::default().reply(Ok(ParsedReply::Structured(gaming_trends())));
    let mut s = session(&gateway);

    s.generate_trends("gaming", "Brazil").unwrap();
    assert_eq!(s.generate_trends("music", "Brazil"), Err(SessionError::Busy));
    s.wait_idle();
    assert_eq!(gateway.calls().len(), 1);
}

#[test]
fn poll_is_idle_without_requests() {
    let gateway = ScriptedGateway::default();
    let mut s = session(&gateway);
    assert_eq!(s.poll(), None);
    assert_eq!(s.controls(), Controls { generate: true, video: false, copy: false });
}

#[test]
fn empty_trend_reply_gets_a_dedicated_message() {
    let gateway = ScriptedGateway::default().reply(Err(GatewayError::EmptyResult));
    let mut s = session(&gateway);

    s.generate_trends("gaming", "Germany").unwrap();
    assert_eq!(
        s.wait_idle(),
        Some(Notice::error(
            "LLM could not generate valid trend data. Please try again with a different topic or check API key."
        ))
    );
}

#[test]
fn empty_video_reply_gets_a_dedicated_message() {
    let gateway = ScriptedGateway::default()
        .reply(Ok(ParsedReply::Structured(gaming_trends())))
        .reply(Err(GatewayError::EmptyResult));
    let mut s = session(&gateway);

    s.generate_trends("gaming", "Germany").unwrap();
    s.wait_idle();
    s.create_video_prompt().unwrap();
    assert_eq!(
        s.wait_idle(),
        Some(Notice::error("LLM could not generate a valid video prompt. Please try again."))
    );
}
