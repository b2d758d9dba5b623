use crate::theme::Theme;
use chrono::{DateTime, Local};
use eframe::egui::{self, RichText};

const MAX_LINES: usize = 500;

pub struct LogLine {
    pub at: DateTime<Local>,
    pub message: String,
}

/// In-app activity trail: seeds, saves, exports, assistant traffic and
/// failures all land here. Never persisted.
pub struct ActivityLog {
    lines: Vec<LogLine>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        if self.lines.len() >= MAX_LINES {
            self.lines.remove(0);
        }
        self.lines.push(LogLine {
            at: Local::now(),
            message: message.into(),
        });
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn show(&self, ui: &mut egui::Ui, theme: &Theme) {
        ui.heading("System Logs");
        ui.label(
            RichText::new("Activity recorded in this session")
                .color(theme.text_muted)
                .size(12.0),
        );
        ui.add_space(theme.spacing_8);

        theme.card_frame().show(ui, |ui| {
            if self.lines.is_empty() {
                ui.label(RichText::new("No activity yet").color(theme.text_muted));
                return;
            }
            egui::ScrollArea::vertical()
                .max_height(f32::INFINITY)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in &self.lines {
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(line.at.format("%Y-%m-%d %H:%M:%S").to_string())
                                    .color(theme.text_muted)
                                    .size(12.0)
                                    .monospace(),
                            );
                            ui.label(RichText::new(&line.message).size(13.0));
                        });
                    }
                });
        });
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{ActivityLog, MAX_LINES};

    #[test]
    fn push_keeps_the_newest_lines() {
        let mut log = ActivityLog::new();
        for n in 0..(MAX_LINES + 10) {
            log.push(format!("line {n}"));
        }
        assert_eq!(log.lines().len(), MAX_LINES);
        assert_eq!(log.lines()[0].message, "line 10");
        assert_eq!(
            log.lines().last().map(|l| l.message.as_str()),
            Some("line 509")
        );
    }
}
