use super::entity::{date, multiline_field, text_field};
use super::logs::ActivityLog;
use crate::assistant::{AssistantClient, AssistantProfile, ChatMessage, ChatRole};
use crate::notify::NotificationHub;
use crate::store::{keys, LocalStore};
use crate::table::view::{danger_button, primary_button, subtle_button};
use crate::theme::Theme;
use chrono::Local;
use eframe::egui::{self, RichText, ScrollArea};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
struct AssistantDraft {
    name: String,
    instructions: String,
}

/// Chat surface for the configured assistants. Each assistant keeps its
/// own persisted transcript; replies arrive through the app event
/// channel and are routed back here by id.
pub struct ChatPage {
    store: LocalStore,
    client: AssistantClient,
    assistants: Vec<AssistantProfile>,
    /// Next id to hand out; freed ids are never reissued within a run.
    next_id: u64,
    selected: Option<u64>,
    transcript: Vec<ChatMessage>,
    input_buffer: String,
    /// Assistant ids with a prompt in flight. The composer locks only
    /// for the assistant that is actually waiting.
    pending: BTreeSet<u64>,
    scroll_to_bottom: bool,
    creator: Option<AssistantDraft>,
    pending_delete: Option<u64>,
}

fn default_assistants() -> Vec<AssistantProfile> {
    vec![
        AssistantProfile {
            id: 1,
            name: "Support Assistant".to_string(),
            instructions: "Answers platform, billing and campaign questions.".to_string(),
            created: date(2024, 5, 1),
        },
        AssistantProfile {
            id: 2,
            name: "Onboarding Guide".to_string(),
            instructions: "Walks new tenants through setup and their first campaign.".to_string(),
            created: date(2024, 5, 20),
        },
    ]
}

impl ChatPage {
    pub fn new(store: LocalStore, client: AssistantClient) -> Self {
        let assistants: Vec<AssistantProfile> = store.get(keys::ASSISTANTS, default_assistants());
        let next_id = assistants
            .iter()
            .map(|assistant| assistant.id)
            .max()
            .unwrap_or(0)
            + 1;
        let selected = assistants.first().map(|assistant| assistant.id);
        let transcript = match selected {
            Some(id) => store.get(&keys::assistant_chat(id), Vec::new()),
            None => Vec::new(),
        };
        Self {
            store,
            client,
            assistants,
            next_id,
            selected,
            transcript,
            input_buffer: String::new(),
            pending: BTreeSet::new(),
            scroll_to_bottom: false,
            creator: None,
            pending_delete: None,
        }
    }

    pub fn awaiting_reply(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn assistant_names(&self) -> Vec<String> {
        self.assistants
            .iter()
            .map(|assistant| assistant.name.clone())
            .collect()
    }

    pub fn select(&mut self, id: u64) {
        self.selected = Some(id);
        self.transcript = self.store.get(&keys::assistant_chat(id), Vec::new());
        self.scroll_to_bottom = true;
    }

    pub fn submit(&mut self, hub: &NotificationHub) {
        let Some(id) = self.selected else {
            return;
        };
        let prompt = self.input_buffer.trim().to_string();
        if prompt.is_empty() || self.pending.contains(&id) {
            return;
        }

        self.transcript.push(ChatMessage::user(prompt.clone()));
        self.persist_history(id, hub);
        self.client.send(id, prompt);
        self.pending.insert(id);
        self.input_buffer.clear();
        self.scroll_to_bottom = true;
    }

    /// Routes one reply to the transcript it belongs to, selected or not.
    /// A reply with no outstanding request is dropped; deleting an
    /// assistant cancels its request mid-flight.
    pub fn on_reply(
        &mut self,
        assistant_id: u64,
        text: String,
        hub: &NotificationHub,
        log: &mut ActivityLog,
    ) {
        if !self.pending.remove(&assistant_id) {
            log.push(format!("stale reply for assistant {assistant_id} dropped"));
            return;
        }

        if self.selected == Some(assistant_id) {
            self.transcript.push(ChatMessage::assistant(text));
            self.persist_history(assistant_id, hub);
            self.scroll_to_bottom = true;
        } else {
            let mut history: Vec<ChatMessage> =
                self.store.get(&keys::assistant_chat(assistant_id), Vec::new());
            history.push(ChatMessage::assistant(text));
            if let Err(err) = self.store.set(&keys::assistant_chat(assistant_id), &history) {
                hub.error(format!("Failed to save chat history: {err}"));
            }
        }
        log.push(format!("assistant {assistant_id} replied"));
    }

    pub fn create_assistant(
        &mut self,
        name: &str,
        instructions: &str,
        hub: &NotificationHub,
        log: &mut ActivityLog,
    ) -> bool {
        let name = name.trim();
        if name.is_empty() {
            hub.warning("Assistant name is required");
            return false;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.assistants.push(AssistantProfile {
            id,
            name: name.to_string(),
            instructions: instructions.trim().to_string(),
            created: Local::now().date_naive(),
        });
        self.persist_assistants(hub);
        hub.success("Assistant created successfully");
        log.push(format!("assistant {id} created"));
        self.select(id);
        true
    }

    pub fn delete_assistant(&mut self, id: u64, hub: &NotificationHub, log: &mut ActivityLog) {
        self.assistants.retain(|assistant| assistant.id != id);
        self.pending.remove(&id);
        self.persist_assistants(hub);
        if let Err(err) = self.store.remove(&keys::assistant_chat(id)) {
            hub.error(format!("Failed to remove chat history: {err}"));
        }

        if self.selected == Some(id) {
            match self.assistants.first().map(|assistant| assistant.id) {
                Some(next) => self.select(next),
                None => {
                    self.selected = None;
                    self.transcript.clear();
                }
            }
        }
        hub.success("Assistant deleted successfully");
        log.push(format!("assistant {id} deleted"));
    }

    pub fn clear_chat(&mut self, hub: &NotificationHub) {
        let Some(id) = self.selected else {
            return;
        };
        self.transcript.clear();
        self.persist_history(id, hub);
        hub.info("Chat cleared");
    }

    fn persist_history(&self, id: u64, hub: &NotificationHub) {
        if let Err(err) = self.store.set(&keys::assistant_chat(id), &self.transcript) {
            hub.error(format!("Failed to save chat history: {err}"));
        }
    }

    fn persist_assistants(&self, hub: &NotificationHub) {
        if let Err(err) = self.store.set(keys::ASSISTANTS, &self.assistants) {
            hub.error(format!("Failed to save assistants: {err}"));
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        hub: &NotificationHub,
        log: &mut ActivityLog,
    ) {
        egui::SidePanel::left("assistant-list")
            .resizable(false)
            .exact_width(230.0)
            .show_inside(ui, |ui| self.assistant_list(ui, theme));

        egui::CentralPanel::default().show_inside(ui, |ui| match self.selected {
            Some(id) => self.conversation(ui, theme, hub, id),
            None => {
                ui.vertical_centered(|ui| {
                    ui.add_space(theme.spacing_24);
                    ui.label(
                        RichText::new("No assistants yet. Create one to start chatting.")
                            .color(theme.text_muted),
                    );
                });
            }
        });

        self.creator_window(ui, theme, hub, log);
        self.delete_window(ui, theme, hub, log);
    }

    fn assistant_list(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Assistants").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if subtle_button(ui, theme, "+ New") {
                    self.creator = Some(AssistantDraft::default());
                }
            });
        });
        ui.add_space(theme.spacing_8);

        let mut clicked: Option<u64> = None;
        let mut delete_clicked: Option<u64> = None;
        for assistant in &self.assistants {
            ui.horizontal(|ui| {
                let active = self.selected == Some(assistant.id);
                if ui.selectable_label(active, &assistant.name).clicked() {
                    clicked = Some(assistant.id);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let close = egui::Button::new(
                        RichText::new("\u{2715}").color(theme.text_muted).size(11.0),
                    )
                    .fill(egui::Color32::TRANSPARENT);
                    if ui.add(close).clicked() {
                        delete_clicked = Some(assistant.id);
                    }
                });
            });
        }

        if let Some(id) = clicked {
            self.select(id);
        }
        if let Some(id) = delete_clicked {
            self.pending_delete = Some(id);
        }
    }

    fn conversation(&mut self, ui: &mut egui::Ui, theme: &Theme, hub: &NotificationHub, id: u64) {
        let Some(assistant) = self.assistants.iter().find(|a| a.id == id).cloned() else {
            return;
        };

        let mut clear_clicked = false;
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(&assistant.name).strong());
                ui.label(
                    RichText::new(&assistant.instructions)
                        .color(theme.text_muted)
                        .size(12.0),
                );
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                clear_clicked = subtle_button(ui, theme, "Clear Chat");
            });
        });
        if clear_clicked {
            self.clear_chat(hub);
        }
        ui.separator();

        let waiting = self.pending.contains(&id);
        let transcript_height = (ui.available_height() - 70.0).max(120.0);
        ScrollArea::vertical()
            .id_salt("assistant-transcript")
            .max_height(transcript_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                if self.transcript.is_empty() && !waiting {
                    ui.add_space(theme.spacing_16);
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new("No messages yet. Say hello.").color(theme.text_muted),
                        );
                    });
                }
                for message in &self.transcript {
                    message_bubble(ui, theme, message);
                }
                if waiting {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("Thinking...").color(theme.text_muted));
                    });
                }
                if self.scroll_to_bottom {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });
        self.scroll_to_bottom = false;

        ui.add_space(theme.spacing_8);
        let hint = if waiting {
            "Waiting for a reply..."
        } else {
            "Type a message..."
        };
        let mut send_now = false;
        theme.composer_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                let response = ui.add_enabled(
                    !waiting,
                    egui::TextEdit::singleline(&mut self.input_buffer)
                        .desired_width(ui.available_width() - 70.0)
                        .hint_text(hint)
                        .frame(false),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    send_now = true;
                }

                let send = egui::Button::new(
                    RichText::new("Send").color(theme.text_on_accent).size(13.0),
                )
                .fill(theme.accent_primary)
                .corner_radius(egui::CornerRadius::same(theme.radius_8));
                let clicked = ui
                    .add_enabled(!waiting && !self.input_buffer.trim().is_empty(), send)
                    .clicked();
                send_now |= clicked;
            });
        });

        if send_now && !waiting {
            self.submit(hub);
            ui.ctx().request_repaint();
        }
    }

    fn creator_window(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        hub: &NotificationHub,
        log: &mut ActivityLog,
    ) {
        let Some(draft) = self.creator.as_mut() else {
            return;
        };

        let mut open = true;
        let mut submitted = false;
        let mut cancelled = false;
        egui::Window::new("Add Assistant")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ui.ctx(), |ui| {
                text_field(ui, theme, "Name", &mut draft.name);
                multiline_field(ui, theme, "Instructions", &mut draft.instructions);
                ui.add_space(theme.spacing_8);
                ui.horizontal(|ui| {
                    if subtle_button(ui, theme, "Cancel") {
                        cancelled = true;
                    }
                    if primary_button(ui, theme, "Create") {
                        submitted = true;
                    }
                });
            });

        if !open || cancelled {
            self.creator = None;
            return;
        }
        if !submitted {
            return;
        }
        if let Some(draft) = self.creator.clone() {
            if self.create_assistant(&draft.name, &draft.instructions, hub, log) {
                self.creator = None;
            }
        }
    }

    fn delete_window(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        hub: &NotificationHub,
        log: &mut ActivityLog,
    ) {
        let Some(id) = self.pending_delete else {
            return;
        };
        let name = self
            .assistants
            .iter()
            .find(|assistant| assistant.id == id)
            .map(|assistant| assistant.name.clone())
            .unwrap_or_default();

        let mut open = true;
        let mut cancelled = false;
        let mut confirmed = false;
        egui::Window::new("Delete Assistant")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ui.ctx(), |ui| {
                ui.label(format!(
                    "Delete {name} and its chat history? This cannot be undone."
                ));
                ui.add_space(theme.spacing_8);
                ui.horizontal(|ui| {
                    if subtle_button(ui, theme, "Cancel") {
                        cancelled = true;
                    }
                    if danger_button(ui, theme, "Delete") {
                        confirmed = true;
                    }
                });
            });

        if !open || cancelled {
            self.pending_delete = None;
            return;
        }
        if confirmed {
            self.delete_assistant(id, hub, log);
            self.pending_delete = None;
        }
    }
}

fn message_bubble(ui: &mut egui::Ui, theme: &Theme, message: &ChatMessage) {
    let from_user = message.role == ChatRole::User;
    let align = if from_user {
        egui::Align::Max
    } else {
        egui::Align::Min
    };
    ui.with_layout(egui::Layout::top_down(align), |ui| {
        let fill = if from_user {
            theme.accent_primary
        } else {
            theme.surface_2
        };
        let color = if from_user {
            theme.text_on_accent
        } else {
            theme.text_primary
        };
        theme.pill_frame(fill).show(ui, |ui| {
            ui.set_max_width(420.0);
            ui.label(RichText::new(&message.text).color(color));
        });
        ui.label(
            RichText::new(message.at.format("%H:%M").to_string())
                .color(theme.text_muted)
                .size(10.0),
        );
        ui.add_space(theme.spacing_4);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::rules::ScriptedResponder;
    use crate::event::AppEvent;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{mpsc, Arc};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_root(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "relaydeck_chat_{prefix}_{}_{}_{}",
            std::process::id(),
            nanos,
            rand::random::<u32>()
        ))
    }

    fn harness(prefix: &str) -> (tokio::runtime::Runtime, mpsc::Receiver<AppEvent>, ChatPage, PathBuf) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("runtime should build");
        let (tx, rx) = mpsc::channel();
        let client = AssistantClient::new(runtime.handle().clone(), tx, Arc::new(ScriptedResponder));
        let root = temp_root(prefix);
        let page = ChatPage::new(LocalStore::at(&root), client);
        (runtime, rx, page, root)
    }

    #[test]
    fn submit_appends_persists_and_locks_the_composer() {
        let (_runtime, _rx, mut page, root) = harness("submit");
        let hub = NotificationHub::new();
        let mut log = ActivityLog::new();
        let id = page.selected.expect("seeds select an assistant");

        page.input_buffer = "hello there".to_string();
        page.submit(&hub);

        assert_eq!(page.transcript.len(), 1);
        assert_eq!(page.transcript[0].role, ChatRole::User);
        assert!(page.input_buffer.is_empty());
        assert!(page.pending.contains(&id));

        let history: Vec<ChatMessage> = page.store.get(&keys::assistant_chat(id), Vec::new());
        assert_eq!(history.len(), 1);

        page.on_reply(id, "hi back".to_string(), &hub, &mut log);
        assert_eq!(page.transcript.len(), 2);
        assert_eq!(page.transcript[1].role, ChatRole::Assistant);
        assert!(page.pending.is_empty());
        let history: Vec<ChatMessage> = page.store.get(&keys::assistant_chat(id), Vec::new());
        assert_eq!(history.len(), 2);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn replies_for_background_assistants_reach_their_own_history() {
        let (_runtime, _rx, mut page, root) = harness("background");
        let hub = NotificationHub::new();
        let mut log = ActivityLog::new();
        page.select(2);
        page.input_buffer = "are you there".to_string();
        page.submit(&hub);
        page.select(1);

        page.on_reply(2, "queued answer".to_string(), &hub, &mut log);

        assert!(page.transcript.is_empty());
        let other: Vec<ChatMessage> = page.store.get(&keys::assistant_chat(2), Vec::new());
        assert_eq!(other.len(), 2);

        page.select(2);
        assert_eq!(page.transcript.len(), 2);
        assert_eq!(page.transcript[1].text, "queued answer");

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn a_late_reply_for_a_deleted_assistant_is_dropped() {
        let (_runtime, _rx, mut page, root) = harness("late");
        let hub = NotificationHub::new();
        let mut log = ActivityLog::new();
        page.select(2);
        page.input_buffer = "slow question".to_string();
        page.submit(&hub);

        page.delete_assistant(2, &hub, &mut log);
        page.on_reply(2, "nobody is waiting".to_string(), &hub, &mut log);

        assert!(page.transcript.is_empty());
        assert!(page.pending.is_empty());
        let orphaned: Vec<ChatMessage> = page.store.get(&keys::assistant_chat(2), Vec::new());
        assert!(orphaned.is_empty());
        assert!(log
            .lines()
            .iter()
            .any(|line| line.message.contains("stale reply for assistant 2 dropped")));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn a_late_reply_never_reaches_an_assistant_created_after_the_delete() {
        let (_runtime, _rx, mut page, root) = harness("recreate");
        let hub = NotificationHub::new();
        let mut log = ActivityLog::new();
        page.select(2);
        page.input_buffer = "slow question".to_string();
        page.submit(&hub);

        page.delete_assistant(2, &hub, &mut log);
        assert!(page.create_assistant("New Bot", "fresh start", &hub, &mut log));
        let new_id = page.selected.expect("creation selects the new assistant");
        assert_eq!(new_id, 3, "freed ids must stay retired");

        page.on_reply(2, "late answer".to_string(), &hub, &mut log);

        assert!(page.transcript.is_empty());
        let fresh: Vec<ChatMessage> = page.store.get(&keys::assistant_chat(new_id), Vec::new());
        assert!(fresh.is_empty());
        let orphaned: Vec<ChatMessage> = page.store.get(&keys::assistant_chat(2), Vec::new());
        assert!(orphaned.is_empty());

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn creating_an_assistant_requires_a_name() {
        let (_runtime, _rx, mut page, root) = harness("create");
        let hub = NotificationHub::new();
        let listener = hub.subscribe();
        let mut log = ActivityLog::new();
        let before = page.assistants.len();

        assert!(!page.create_assistant("   ", "help out", &hub, &mut log));
        assert_eq!(page.assistants.len(), before);
        let toast = listener.try_recv().expect("rejection should toast");
        assert_eq!(toast.kind, crate::notify::ToastKind::Warning);

        assert!(page.create_assistant("Billing Bot", "explain invoices", &hub, &mut log));
        assert_eq!(page.assistants.len(), before + 1);
        assert_eq!(page.selected, Some(3));
        let persisted: Vec<AssistantProfile> = page.store.get(keys::ASSISTANTS, Vec::new());
        assert_eq!(persisted.len(), before + 1);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn deleting_an_assistant_discards_its_history() {
        let (_runtime, _rx, mut page, root) = harness("delete");
        let hub = NotificationHub::new();
        let mut log = ActivityLog::new();
        page.select(1);
        page.input_buffer = "remember this".to_string();
        page.submit(&hub);

        page.delete_assistant(1, &hub, &mut log);

        assert_eq!(page.assistants.len(), 1);
        assert_eq!(page.selected, Some(2));
        let orphaned: Vec<ChatMessage> = page.store.get(&keys::assistant_chat(1), Vec::new());
        assert!(orphaned.is_empty());

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn clear_chat_persists_an_empty_transcript() {
        let (_runtime, _rx, mut page, root) = harness("clear");
        let hub = NotificationHub::new();
        let mut log = ActivityLog::new();
        let id = page.selected.expect("seeds select an assistant");
        page.input_buffer = "first".to_string();
        page.submit(&hub);
        page.on_reply(id, "noted".to_string(), &hub, &mut log);
        assert_eq!(page.transcript.len(), 2);

        page.clear_chat(&hub);

        assert!(page.transcript.is_empty());
        let history: Vec<ChatMessage> = page.store.get(&keys::assistant_chat(id), Vec::new());
        assert!(history.is_empty());

        let _ = fs::remove_dir_all(root);
    }
}
