mod app;
mod assistant;
mod event;
mod notify;
mod pages;
mod store;
mod table;
mod theme;

use app::AdminApp;
use assistant::rules::ScriptedResponder;
use assistant::AssistantClient;
use eframe::egui;
use notify::NotificationHub;
use std::sync::{mpsc, Arc};
use store::LocalStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("relaydeck-runtime")
        .build()?;

    let store = LocalStore::open_default();
    let hub = NotificationHub::new();
    let client = AssistantClient::new(runtime.handle().clone(), tx, Arc::new(ScriptedResponder));

    let app = AdminApp::new(rx, store, hub, client);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1024.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "RelayDeck",
        native_options,
        Box::new(move |creation_context| {
            app.apply_theme(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}
