use super::entity::{form_label, string_combo, text_field};
use super::logs::ActivityLog;
use crate::notify::NotificationHub;
use crate::store::{keys, LocalStore};
use crate::table::view::primary_button;
use crate::theme::Theme;
use eframe::egui::{self, RichText};
use serde::{Deserialize, Serialize};

/// The whole settings document; saved and loaded as one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub timezone: String,
    pub date_format: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub require_two_factor: bool,
    pub require_strong_passwords: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            smtp_host: String::new(),
            smtp_port: 587,
            require_two_factor: false,
            require_strong_passwords: true,
        }
    }
}

pub struct SettingsPage {
    store: LocalStore,
    settings: SystemSettings,
}

impl SettingsPage {
    pub fn new(store: LocalStore) -> Self {
        let settings = store.get(keys::SYSTEM_SETTINGS, SystemSettings::default());
        Self { store, settings }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        hub: &NotificationHub,
        log: &mut ActivityLog,
    ) {
        ui.heading("Settings");
        ui.add_space(theme.spacing_8);

        theme.card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new("General").strong());
            ui.add_space(theme.spacing_4);
            string_combo(
                ui,
                theme,
                "Timezone",
                &mut self.settings.timezone,
                &["UTC", "Europe/Madrid", "America/New_York", "Asia/Kolkata"],
            );
            string_combo(
                ui,
                theme,
                "Date Format",
                &mut self.settings.date_format,
                &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"],
            );
        });
        ui.add_space(theme.spacing_12);

        theme.card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new("Email").strong());
            ui.add_space(theme.spacing_4);
            text_field(ui, theme, "SMTP Host", &mut self.settings.smtp_host);
            form_label(ui, theme, "SMTP Port");
            ui.add(egui::DragValue::new(&mut self.settings.smtp_port).range(1..=65535));
        });
        ui.add_space(theme.spacing_12);

        theme.card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new("Security").strong());
            ui.add_space(theme.spacing_4);
            ui.checkbox(
                &mut self.settings.require_two_factor,
                "Require two-factor authentication for staff",
            );
            ui.checkbox(
                &mut self.settings.require_strong_passwords,
                "Require strong passwords",
            );
        });
        ui.add_space(theme.spacing_16);

        if primary_button(ui, theme, "Save Settings") {
            self.save(hub, log);
        }
    }

    pub fn save(&self, hub: &NotificationHub, log: &mut ActivityLog) {
        match self.store.set(keys::SYSTEM_SETTINGS, &self.settings) {
            Ok(()) => {
                hub.success("Settings saved");
                log.push("system settings saved".to_string());
            }
            Err(err) => {
                hub.error(format!("Failed to save settings: {err}"));
                log.push(format!("settings save failed: {err}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_root() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "relaydeck_settings_{}_{}_{}",
            std::process::id(),
            nanos,
            rand::random::<u32>()
        ))
    }

    #[test]
    fn saved_settings_come_back_on_the_next_launch() {
        let root = temp_root();
        let store = LocalStore::at(&root);
        let hub = NotificationHub::new();
        let mut log = ActivityLog::new();

        let mut page = SettingsPage::new(store.clone());
        assert_eq!(page.settings, SystemSettings::default());

        page.settings.timezone = "Europe/Madrid".to_string();
        page.settings.smtp_host = "mail.relaydeck.io".to_string();
        page.settings.smtp_port = 465;
        page.settings.require_two_factor = true;
        page.save(&hub, &mut log);

        let reopened = SettingsPage::new(store);
        assert_eq!(reopened.settings, page.settings);

        let _ = fs::remove_dir_all(root);
    }
}
