use super::entity::{combo_field, multiline_field, string_combo, text_field};
use super::logs::ActivityLog;
use crate::notify::NotificationHub;
use crate::store::{keys, LocalStore};
use crate::table::view::{primary_button, subtle_button};
use crate::theme::Theme;
use eframe::egui::{self, Color32, CornerRadius, RichText};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Any,
    All,
}

impl MatchMode {
    pub const ALL: [Self; 2] = [Self::Any, Self::All];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "Match Any",
            Self::All => "Match All",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Trigger {
        contact_type: String,
        match_mode: MatchMode,
        keywords: Vec<String>,
    },
    Message {
        text: String,
    },
    Assistant {
        assistant_name: String,
    },
}

impl NodeKind {
    pub fn is_trigger(&self) -> bool {
        matches!(self, Self::Trigger { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Trigger { .. } => "Trigger",
            Self::Message { .. } => "Message",
            Self::Assistant { .. } => "Assistant",
        }
    }
}

/// One card on the canvas. Position is canvas-relative and persisted
/// with the flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotFlow {
    pub nodes: Vec<FlowNode>,
}

impl BotFlow {
    /// The flow new installs start from: one trigger, one canned reply,
    /// one assistant handoff.
    pub fn starter() -> Self {
        Self {
            nodes: vec![
                FlowNode {
                    id: 1,
                    x: 30.0,
                    y: 30.0,
                    kind: NodeKind::Trigger {
                        contact_type: "All Contacts".to_string(),
                        match_mode: MatchMode::Any,
                        keywords: vec!["hello".to_string(), "start".to_string()],
                    },
                },
                FlowNode {
                    id: 2,
                    x: 330.0,
                    y: 60.0,
                    kind: NodeKind::Message {
                        text: "Welcome! How can we help you today?".to_string(),
                    },
                },
                FlowNode {
                    id: 3,
                    x: 630.0,
                    y: 100.0,
                    kind: NodeKind::Assistant {
                        assistant_name: "Support Assistant".to_string(),
                    },
                },
            ],
        }
    }

    fn next_node_id(&self) -> u64 {
        self.nodes.iter().map(|node| node.id).max().unwrap_or(0) + 1
    }
}

pub struct FlowPage {
    store: LocalStore,
    flow: BotFlow,
    keyword_input: String,
}

impl FlowPage {
    pub fn new(store: LocalStore) -> Self {
        let flow = store.get(keys::BOT_FLOW, BotFlow::starter());
        Self {
            store,
            flow,
            keyword_input: String::new(),
        }
    }

    pub fn save(&self, hub: &NotificationHub, log: &mut ActivityLog) {
        match self.store.set(keys::BOT_FLOW, &self.flow) {
            Ok(()) => {
                hub.success("Bot flow saved");
                log.push(format!("bot flow saved with {} nodes", self.flow.nodes.len()));
            }
            Err(err) => {
                hub.error(format!("Failed to save bot flow: {err}"));
                log.push(format!("bot flow save failed: {err}"));
            }
        }
    }

    pub fn add_message_node(&mut self) {
        let id = self.flow.next_node_id();
        let offset = self.flow.nodes.len() as f32;
        self.flow.nodes.push(FlowNode {
            id,
            x: 120.0 + 40.0 * offset,
            y: 120.0 + 30.0 * offset,
            kind: NodeKind::Message {
                text: String::new(),
            },
        });
    }

    pub fn add_assistant_node(&mut self) {
        let id = self.flow.next_node_id();
        let offset = self.flow.nodes.len() as f32;
        self.flow.nodes.push(FlowNode {
            id,
            x: 120.0 + 40.0 * offset,
            y: 160.0 + 30.0 * offset,
            kind: NodeKind::Assistant {
                assistant_name: String::new(),
            },
        });
    }

    /// Trigger nodes are the entry point of the flow and never removable.
    pub fn remove_node(&mut self, id: u64) {
        self.flow
            .nodes
            .retain(|node| node.id != id || node.kind.is_trigger());
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        hub: &NotificationHub,
        log: &mut ActivityLog,
        assistant_names: &[String],
    ) {
        ui.horizontal(|ui| {
            ui.heading("Bot Flow");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if primary_button(ui, theme, "Save Flow") {
                    self.save(hub, log);
                }
                if subtle_button(ui, theme, "+ Assistant Node") {
                    self.add_assistant_node();
                    hub.info("Assistant node added");
                }
                if subtle_button(ui, theme, "+ Message Node") {
                    self.add_message_node();
                    hub.info("Message node added");
                }
            });
        });
        ui.add_space(theme.spacing_8);

        let canvas_size = egui::vec2(ui.available_width(), ui.available_height().max(420.0));
        let (canvas_rect, _) = ui.allocate_exact_size(canvas_size, egui::Sense::hover());
        ui.painter().rect_filled(
            canvas_rect,
            CornerRadius::same(theme.radius_12),
            theme.surface_0,
        );

        let mut remove_requested: Option<u64> = None;
        for node in &mut self.flow.nodes {
            let area_id = egui::Id::new(("flow-node", node.id));
            let response = egui::Area::new(area_id)
                .default_pos(canvas_rect.min + egui::vec2(node.x, node.y))
                .constrain_to(canvas_rect)
                .show(ui.ctx(), |ui| {
                    theme.card_frame().show(ui, |ui| {
                        ui.set_width(240.0);
                        node_header(ui, theme, node, &mut remove_requested);
                        match &mut node.kind {
                            NodeKind::Trigger {
                                contact_type,
                                match_mode,
                                keywords,
                            } => {
                                string_combo(
                                    ui,
                                    theme,
                                    "Contacts",
                                    contact_type,
                                    &["All Contacts", "Leads", "Customers", "VIP"],
                                );
                                combo_field(
                                    ui,
                                    theme,
                                    "Keywords",
                                    match_mode,
                                    &MatchMode::ALL,
                                    MatchMode::as_str,
                                );
                                keyword_chips(ui, theme, keywords);
                                ui.horizontal(|ui| {
                                    ui.add(
                                        egui::TextEdit::singleline(&mut self.keyword_input)
                                            .desired_width(130.0)
                                            .hint_text("Add keyword"),
                                    );
                                    if subtle_button(ui, theme, "Add") {
                                        let keyword = self.keyword_input.trim().to_string();
                                        if keyword.is_empty() {
                                            hub.error("Keyword cannot be empty");
                                        } else if keywords
                                            .iter()
                                            .any(|k| k.eq_ignore_ascii_case(&keyword))
                                        {
                                            hub.warning("Keyword already added");
                                        } else {
                                            keywords.push(keyword);
                                            self.keyword_input.clear();
                                        }
                                    }
                                });
                            }
                            NodeKind::Message { text } => {
                                multiline_field(ui, theme, "Message", text);
                            }
                            NodeKind::Assistant { assistant_name } => {
                                if assistant_names.is_empty() {
                                    text_field(ui, theme, "Assistant", assistant_name);
                                } else {
                                    let options: Vec<&str> =
                                        assistant_names.iter().map(String::as_str).collect();
                                    string_combo(ui, theme, "Assistant", assistant_name, &options);
                                }
                            }
                        }
                    });
                });

            // Dragging moves the floating card; write the spot back so
            // saving captures it.
            let placed = response.response.rect.min - canvas_rect.min;
            node.x = placed.x;
            node.y = placed.y;
        }

        if let Some(id) = remove_requested {
            self.remove_node(id);
        }
    }
}

fn node_header(
    ui: &mut egui::Ui,
    theme: &Theme,
    node: &FlowNode,
    remove_requested: &mut Option<u64>,
) {
    let (tint, accent) = match node.kind {
        NodeKind::Trigger { .. } => (theme.success_tint, theme.success),
        NodeKind::Message { .. } => (theme.info_tint, theme.info),
        NodeKind::Assistant { .. } => (theme.warning_tint, theme.warning),
    };
    ui.horizontal(|ui| {
        theme.pill_frame(tint).show(ui, |ui| {
            ui.label(RichText::new(node.kind.label()).color(accent).size(12.0));
        });
        if !node.kind.is_trigger() {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let close = egui::Button::new(
                    RichText::new("\u{2715}").color(theme.text_muted).size(11.0),
                )
                .fill(Color32::TRANSPARENT);
                if ui.add(close).clicked() {
                    *remove_requested = Some(node.id);
                }
            });
        }
    });
    ui.add_space(theme.spacing_4);
}

fn keyword_chips(ui: &mut egui::Ui, theme: &Theme, keywords: &mut Vec<String>) {
    let mut remove_at: Option<usize> = None;
    ui.horizontal_wrapped(|ui| {
        for (index, keyword) in keywords.iter().enumerate() {
            theme.pill_frame(theme.info_tint).show(ui, |ui| {
                ui.label(RichText::new(keyword).color(theme.info).size(12.0));
                let close = egui::Button::new(
                    RichText::new("\u{2715}").color(theme.text_muted).size(10.0),
                )
                .fill(Color32::TRANSPARENT)
                .small();
                if ui.add(close).clicked() {
                    remove_at = Some(index);
                }
            });
        }
    });
    if let Some(index) = remove_at {
        keywords.remove(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_root(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "relaydeck_flow_{prefix}_{}_{}_{}",
            std::process::id(),
            nanos,
            rand::random::<u32>()
        ))
    }

    #[test]
    fn starter_flow_has_exactly_one_trigger() {
        let flow = BotFlow::starter();
        let triggers = flow.nodes.iter().filter(|n| n.kind.is_trigger()).count();
        assert_eq!(triggers, 1);
    }

    #[test]
    fn trigger_nodes_cannot_be_removed() {
        let root = temp_root("trigger");
        let mut page = FlowPage::new(LocalStore::at(&root));
        let before = page.flow.nodes.len();

        page.remove_node(1);
        assert_eq!(page.flow.nodes.len(), before);

        page.remove_node(2);
        assert_eq!(page.flow.nodes.len(), before - 1);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn added_nodes_get_fresh_ids() {
        let root = temp_root("ids");
        let mut page = FlowPage::new(LocalStore::at(&root));

        page.add_message_node();
        page.add_assistant_node();

        let mut ids: Vec<u64> = page.flow.nodes.iter().map(|n| n.id).collect();
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn saved_flows_reload_with_positions_and_keywords() {
        let root = temp_root("round_trip");
        let store = LocalStore::at(&root);
        let hub = NotificationHub::new();
        let mut log = ActivityLog::new();

        let mut page = FlowPage::new(store.clone());
        page.add_message_node();
        if let NodeKind::Trigger { keywords, .. } = &mut page.flow.nodes[0].kind {
            keywords.push("pricing".to_string());
        }
        page.flow.nodes[1].x = 412.5;
        page.flow.nodes[1].y = 97.0;
        page.save(&hub, &mut log);

        let reopened = FlowPage::new(store);
        assert_eq!(reopened.flow, page.flow);

        let _ = fs::remove_dir_all(root);
    }
}
