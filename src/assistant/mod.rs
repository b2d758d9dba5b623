pub mod rules;

use crate::event::AppEvent;
use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::{mpsc, Arc};
use tokio::runtime::Handle;
use tokio::time::{self, Duration};

pub const MIN_THINKING_MS: u64 = 1000;
pub const MAX_THINKING_MS: u64 = 2000;

/// Answers one question. The chat surface depends on nothing but this
/// seam, so the canned rule set can be swapped out wholesale.
pub trait Responder: Send + Sync {
    fn respond(&self, input: &str) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// One configured assistant. The chat page lists these and keeps a
/// persisted transcript per id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantProfile {
    pub id: u64,
    pub name: String,
    pub instructions: String,
    pub created: NaiveDate,
}

fn thinking_delay_ms() -> u64 {
    rand::thread_rng().gen_range(MIN_THINKING_MS..MAX_THINKING_MS)
}

/// Hands prompts to background tasks and returns replies over the app
/// event channel. One `AssistantReply` lands per `send`, after an
/// artificial thinking delay; concurrent sends complete in no defined
/// order.
#[derive(Clone)]
pub struct AssistantClient {
    tx: mpsc::Sender<AppEvent>,
    responder: Arc<dyn Responder>,
    runtime_handle: Handle,
}

impl AssistantClient {
    pub fn new(
        runtime_handle: Handle,
        tx: mpsc::Sender<AppEvent>,
        responder: Arc<dyn Responder>,
    ) -> Self {
        Self {
            tx,
            responder,
            runtime_handle,
        }
    }

    pub fn send(&self, assistant_id: u64, prompt: String) {
        let tx = self.tx.clone();
        let responder = Arc::clone(&self.responder);
        self.runtime_handle.spawn(async move {
            let delay = thinking_delay_ms();
            time::sleep(Duration::from_millis(delay)).await;
            let text = responder.respond(&prompt);
            let _ = tx.send(AppEvent::AssistantReply { assistant_id, text });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    struct EchoResponder;

    impl Responder for EchoResponder {
        fn respond(&self, input: &str) -> String {
            format!("echo: {input}")
        }
    }

    #[test]
    fn thinking_delay_stays_inside_the_advertised_window() {
        for _ in 0..64 {
            let delay = thinking_delay_ms();
            assert!(
                (MIN_THINKING_MS..MAX_THINKING_MS).contains(&delay),
                "delay {delay} out of range"
            );
        }
    }

    #[test]
    fn send_delivers_exactly_one_reply_after_the_delay() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("runtime should build");
        let (tx, rx) = mpsc::channel();
        let client = AssistantClient::new(runtime.handle().clone(), tx, Arc::new(EchoResponder));

        let started = Instant::now();
        client.send(7, "hello".to_string());

        let event = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("reply should arrive");
        let elapsed = started.elapsed();
        assert!(
            elapsed >= std::time::Duration::from_millis(900),
            "reply came back before the thinking delay: {elapsed:?}"
        );

        let AppEvent::AssistantReply { assistant_id, text } = event;
        assert_eq!(assistant_id, 7);
        assert_eq!(text, "echo: hello");

        assert!(
            rx.recv_timeout(std::time::Duration::from_millis(2500)).is_err(),
            "a single send must produce a single reply"
        );
    }

    #[test]
    fn concurrent_sends_each_get_a_reply() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("runtime should build");
        let (tx, rx) = mpsc::channel();
        let client = AssistantClient::new(runtime.handle().clone(), tx, Arc::new(EchoResponder));

        client.send(1, "first".to_string());
        client.send(2, "second".to_string());

        let mut seen = Vec::new();
        for _ in 0..2 {
            let event = rx
                .recv_timeout(std::time::Duration::from_secs(5))
                .expect("both replies should arrive");
            let AppEvent::AssistantReply { assistant_id, .. } = event;
            seen.push(assistant_id);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2]);
    }
}
