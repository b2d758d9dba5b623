use crate::assistant::AssistantClient;
use crate::event::AppEvent;
use crate::notify::{NotificationHub, Toast, ToastKind, ToastReceiver, TOAST_DURATION};
use crate::pages::chat::ChatPage;
use crate::pages::crm::{Contact, Tenant, Ticket};
use crate::pages::dashboard::DashboardPage;
use crate::pages::entity::EntityPage;
use crate::pages::flow::FlowPage;
use crate::pages::logs::ActivityLog;
use crate::pages::marketing::{Campaign, MessageTemplate};
use crate::pages::sales::{CreditAccount, Invoice, Plan, Subscription, Transaction};
use crate::pages::settings::SettingsPage;
use crate::pages::setup::StaffUser;
use crate::pages::Page;
use crate::store::{self, keys, LocalStore};
use crate::theme::Theme;
use eframe::egui::{self, Color32, CornerRadius, RichText};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ThemePreference {
    dark: bool,
}

struct ActiveToast {
    toast: Toast,
    expires_at: Instant,
}

/// Root of the console: owns the store, the pages, the toast overlay and
/// the receiving end of the app event channel.
pub struct AdminApp {
    rx: Receiver<AppEvent>,
    store: LocalStore,
    hub: NotificationHub,
    toasts: ToastReceiver,
    active_toasts: Vec<ActiveToast>,
    theme: Theme,
    page: Page,
    log: ActivityLog,
    dashboard: DashboardPage,
    tenants: EntityPage<Tenant>,
    contacts: EntityPage<Contact>,
    tickets: EntityPage<Ticket>,
    subscriptions: EntityPage<Subscription>,
    invoices: EntityPage<Invoice>,
    transactions: EntityPage<Transaction>,
    credits: EntityPage<CreditAccount>,
    plans: EntityPage<Plan>,
    templates: EntityPage<MessageTemplate>,
    campaigns: EntityPage<Campaign>,
    staff: EntityPage<StaffUser>,
    chat: ChatPage,
    flow: FlowPage,
    settings: SettingsPage,
}

impl AdminApp {
    pub fn new(
        rx: Receiver<AppEvent>,
        store: LocalStore,
        hub: NotificationHub,
        client: AssistantClient,
    ) -> Self {
        let preference: ThemePreference = store.get(keys::THEME, ThemePreference::default());
        let theme = Theme::from_preference(preference.dark);
        let toasts = hub.subscribe();
        let export_dir = store::default_export_dir();
        let mut log = ActivityLog::new();
        log.push("console started");
        log.push(format!("state directory {}", store.root().display()));

        Self {
            rx,
            hub,
            toasts,
            active_toasts: Vec::new(),
            theme,
            page: Page::Dashboard,
            log,
            dashboard: DashboardPage::new(store.clone()),
            tenants: EntityPage::new(store.clone(), export_dir.clone()),
            contacts: EntityPage::new(store.clone(), export_dir.clone()),
            tickets: EntityPage::new(store.clone(), export_dir.clone()),
            subscriptions: EntityPage::new(store.clone(), export_dir.clone()),
            invoices: EntityPage::new(store.clone(), export_dir.clone()),
            transactions: EntityPage::new(store.clone(), export_dir.clone()),
            credits: EntityPage::new(store.clone(), export_dir.clone()),
            plans: EntityPage::new(store.clone(), export_dir.clone()),
            templates: EntityPage::new(store.clone(), export_dir.clone()),
            campaigns: EntityPage::new(store.clone(), export_dir.clone()),
            staff: EntityPage::new(store.clone(), export_dir),
            chat: ChatPage::new(store.clone(), client),
            flow: FlowPage::new(store.clone()),
            settings: SettingsPage::new(store.clone()),
            store,
        }
    }

    pub fn apply_theme(&self, ctx: &egui::Context) {
        self.theme.apply_visuals(ctx);
    }

    fn set_dark(&mut self, dark: bool, ctx: &egui::Context) {
        self.theme = Theme::from_preference(dark);
        self.theme.apply_visuals(ctx);
        if let Err(err) = self.store.set(keys::THEME, &ThemePreference { dark }) {
            self.hub.error(format!("Failed to save theme: {err}"));
        }
        self.log.push(if dark {
            "switched to dark theme"
        } else {
            "switched to light theme"
        });
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(AppEvent::AssistantReply { assistant_id, text }) => {
                    self.chat
                        .on_reply(assistant_id, text, &self.hub, &mut self.log);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log.push("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn collect_toasts(&mut self) {
        while let Some(toast) = self.toasts.try_recv() {
            self.active_toasts.push(ActiveToast {
                toast,
                expires_at: Instant::now() + TOAST_DURATION,
            });
        }
    }

    fn prune_toasts(&mut self, now: Instant) {
        self.active_toasts.retain(|active| active.expires_at > now);
    }

    /// Entering a page resets its transient view state; chat and flow keep
    /// theirs so in-flight replies and unsaved graphs survive a tab switch.
    fn on_navigate(&mut self, page: Page) {
        match page {
            Page::Dashboard => self.dashboard.reload(),
            Page::Tenants => self.tenants.reset_view(),
            Page::Contacts => self.contacts.reset_view(),
            Page::Tickets => self.tickets.reset_view(),
            Page::Subscriptions => self.subscriptions.reset_view(),
            Page::Invoices => self.invoices.reset_view(),
            Page::Transactions => self.transactions.reset_view(),
            Page::Credits => self.credits.reset_view(),
            Page::Plans => self.plans.reset_view(),
            Page::Templates => self.templates.reset_view(),
            Page::Campaigns => self.campaigns.reset_view(),
            Page::Staff => self.staff.reset_view(),
            Page::Assistant | Page::BotFlow | Page::SystemLogs | Page::Settings => {}
        }
    }

    fn render_sidebar(&mut self, ctx: &egui::Context) {
        let theme = self.theme.clone();
        egui::SidePanel::left("sidebar")
            .resizable(false)
            .exact_width(220.0)
            .frame(
                egui::Frame::new()
                    .fill(theme.sidebar_fill)
                    .inner_margin(egui::Margin::symmetric(12, 16)),
            )
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("RelayDeck")
                        .color(theme.sidebar_text)
                        .strong()
                        .size(18.0),
                );
                ui.label(
                    RichText::new("Messaging Admin")
                        .color(theme.sidebar_text_muted)
                        .size(11.0),
                );
                ui.add_space(theme.spacing_16);

                for (section, pages) in Page::SECTIONS {
                    ui.label(
                        RichText::new(*section)
                            .color(theme.sidebar_text_muted)
                            .size(11.0),
                    );
                    ui.add_space(theme.spacing_4);
                    for page in *pages {
                        let active = self.page == *page;
                        let fill = if active {
                            theme.accent_primary
                        } else {
                            Color32::TRANSPARENT
                        };
                        let color = if active {
                            theme.text_on_accent
                        } else {
                            theme.sidebar_text
                        };
                        let row =
                            egui::Button::new(RichText::new(page.label()).color(color).size(13.0))
                                .fill(fill)
                                .corner_radius(CornerRadius::same(theme.radius_8))
                                .min_size(egui::vec2(ui.available_width(), 28.0));
                        if ui.add(row).clicked() && self.page != *page {
                            self.page = *page;
                            self.on_navigate(*page);
                        }
                    }
                    ui.add_space(theme.spacing_12);
                }
            });
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let theme = self.theme.clone();
        egui::TopBottomPanel::top("top-bar")
            .frame(
                egui::Frame::new()
                    .fill(theme.surface_1)
                    .inner_margin(egui::Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(self.page.label()).strong().size(16.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let mut dark = theme.dark;
                        if ui.checkbox(&mut dark, "Dark Mode").changed() {
                            self.set_dark(dark, ctx);
                        }
                    });
                });
            });
    }

    fn render_central(&mut self, ctx: &egui::Context) {
        let theme = self.theme.clone();
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme.surface_0)
                    .inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| match self.page {
                Page::Dashboard => {
                    if let Some(target) = self.dashboard.show(ui, &theme, &self.hub, &mut self.log)
                    {
                        self.page = target;
                        self.on_navigate(target);
                    }
                }
                Page::Tenants => self.tenants.show(ui, &theme, &self.hub, &mut self.log),
                Page::Contacts => self.contacts.show(ui, &theme, &self.hub, &mut self.log),
                Page::Tickets => self.tickets.show(ui, &theme, &self.hub, &mut self.log),
                Page::Subscriptions => {
                    self.subscriptions.show(ui, &theme, &self.hub, &mut self.log)
                }
                Page::Invoices => self.invoices.show(ui, &theme, &self.hub, &mut self.log),
                Page::Transactions => {
                    self.transactions.show(ui, &theme, &self.hub, &mut self.log)
                }
                Page::Credits => self.credits.show(ui, &theme, &self.hub, &mut self.log),
                Page::Plans => self.plans.show(ui, &theme, &self.hub, &mut self.log),
                Page::Templates => self.templates.show(ui, &theme, &self.hub, &mut self.log),
                Page::Campaigns => self.campaigns.show(ui, &theme, &self.hub, &mut self.log),
                Page::Staff => self.staff.show(ui, &theme, &self.hub, &mut self.log),
                Page::Assistant => self.chat.show(ui, &theme, &self.hub, &mut self.log),
                Page::BotFlow => {
                    let names = self.chat.assistant_names();
                    self.flow.show(ui, &theme, &self.hub, &mut self.log, &names);
                }
                Page::SystemLogs => self.log.show(ui, &theme),
                Page::Settings => self.settings.show(ui, &theme, &self.hub, &mut self.log),
            });
    }

    fn render_toasts(&mut self, ctx: &egui::Context) {
        if self.active_toasts.is_empty() {
            return;
        }
        let theme = self.theme.clone();
        let mut dismissed: Option<u64> = None;
        egui::Area::new(egui::Id::new("toast-overlay"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for active in &self.active_toasts {
                    let accent = match active.toast.kind {
                        ToastKind::Success => theme.success,
                        ToastKind::Error => theme.danger,
                        ToastKind::Info => theme.info,
                        ToastKind::Warning => theme.warning,
                    };
                    theme.panel_frame(theme.surface_1, 10).show(ui, |ui| {
                        ui.set_max_width(340.0);
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(active.toast.kind.as_str())
                                    .color(accent)
                                    .strong()
                                    .size(11.0),
                            );
                            ui.label(RichText::new(&active.toast.message).size(13.0));
                            let close = egui::Button::new(
                                RichText::new("\u{2715}").color(theme.text_muted).size(10.0),
                            )
                            .fill(Color32::TRANSPARENT)
                            .small();
                            if ui.add(close).clicked() {
                                dismissed = Some(active.toast.id);
                            }
                        });
                    });
                    ui.add_space(theme.spacing_4);
                }
            });
        if let Some(id) = dismissed {
            self.active_toasts.retain(|active| active.toast.id != id);
        }
    }
}

impl eframe::App for AdminApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.collect_toasts();
        self.prune_toasts(Instant::now());

        self.render_sidebar(ctx);
        self.render_top_bar(ctx);
        self.render_central(ctx);
        self.render_toasts(ctx);

        // Toast expiry and in-flight replies need frames while the user
        // is idle.
        if !self.active_toasts.is_empty() || self.chat.awaiting_reply() {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::rules::ScriptedResponder;
    use crate::assistant::ChatMessage;
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
            "relaydeck_app_{prefix}_{}_{}_{}",
            std::process::id(),
            nanos,
            rand::random::<u32>()
        ))
    }

    fn harness(
        prefix: &str,
    ) -> (
        tokio::runtime::Runtime,
        mpsc::Sender<AppEvent>,
        AdminApp,
        PathBuf,
    ) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("runtime should build");
        let (tx, rx) = mpsc::channel();
        let root = temp_root(prefix);
        let store = LocalStore::at(&root);
        let hub = NotificationHub::new();
        let client = AssistantClient::new(
            runtime.handle().clone(),
            tx.clone(),
            Arc::new(ScriptedResponder),
        );
        let app = AdminApp::new(rx, store, hub, client);
        (runtime, tx, app, root)
    }

    #[test]
    fn unrequested_replies_from_the_event_channel_are_dropped() {
        let (_runtime, tx, mut app, root) = harness("events");

        tx.send(AppEvent::AssistantReply {
            assistant_id: 1,
            text: "pong".to_string(),
        })
        .expect("channel should accept the event");
        app.drain_events();

        let history: Vec<ChatMessage> = app.store.get(&keys::assistant_chat(1), Vec::new());
        assert!(history.is_empty());
        assert!(app
            .log
            .lines()
            .iter()
            .any(|line| line.message.contains("stale reply for assistant 1 dropped")));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn toasts_queue_up_and_expire_after_their_deadline() {
        let (_runtime, _tx, mut app, root) = harness("toasts");

        app.hub.success("saved");
        app.hub.warning("careful");
        app.collect_toasts();
        assert_eq!(app.active_toasts.len(), 2);

        app.prune_toasts(Instant::now());
        assert_eq!(app.active_toasts.len(), 2, "fresh toasts must survive");

        app.prune_toasts(Instant::now() + TOAST_DURATION + Duration::from_millis(50));
        assert!(app.active_toasts.is_empty());

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn each_toast_dismisses_on_its_own_deadline() {
        let (_runtime, _tx, mut app, root) = harness("stagger");

        app.hub.success("one");
        app.hub.info("two");
        app.hub.warning("three");
        app.collect_toasts();
        assert_eq!(app.active_toasts.len(), 3);

        let base = Instant::now();
        app.active_toasts[0].expires_at = base + Duration::from_millis(300);
        app.active_toasts[1].expires_at = base + Duration::from_millis(100);
        app.active_toasts[2].expires_at = base + Duration::from_millis(200);

        app.prune_toasts(base + Duration::from_millis(150));
        let left: Vec<&str> = app
            .active_toasts
            .iter()
            .map(|active| active.toast.message.as_str())
            .collect();
        assert_eq!(left, ["one", "three"]);

        app.prune_toasts(base + Duration::from_millis(250));
        assert_eq!(app.active_toasts.len(), 1);
        assert_eq!(app.active_toasts[0].toast.message, "one");

        app.prune_toasts(base + Duration::from_millis(350));
        assert!(app.active_toasts.is_empty());

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn stored_theme_preference_is_honored_at_startup() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("runtime should build");
        let (tx, rx) = mpsc::channel();
        let root = temp_root("theme");
        let store = LocalStore::at(&root);
        store
            .set(keys::THEME, &ThemePreference { dark: true })
            .expect("preference should write");

        let client =
            AssistantClient::new(runtime.handle().clone(), tx, Arc::new(ScriptedResponder));
        let app = AdminApp::new(rx, store, NotificationHub::new(), client);
        assert!(app.theme.dark);

        let _ = fs::remove_dir_all(root);
    }
}
