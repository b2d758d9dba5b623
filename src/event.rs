/// Events flowing from background tasks to the UI thread. Drained
/// non-blocking once per frame.
#[derive(Debug, Clone)]
pub enum AppEvent {
    AssistantReply { assistant_id: u64, text: String },
}
