use super::query;
use super::{Column, ConfirmTarget, ExportFormat, Record, TableAction, TableState};
use crate::theme::Theme;
use eframe::egui::{self, RichText};

pub(crate) fn primary_button(ui: &mut egui::Ui, theme: &Theme, label: &str) -> bool {
    ui.add(
        egui::Button::new(RichText::new(label).color(theme.text_on_accent).size(13.0))
            .fill(theme.accent_primary)
            .stroke(theme.primary_button_stroke())
            .corner_radius(egui::CornerRadius::same(theme.radius_8))
            .min_size(egui::vec2(0.0, theme.button_height)),
    )
    .clicked()
}

pub(crate) fn subtle_button(ui: &mut egui::Ui, theme: &Theme, label: &str) -> bool {
    ui.add(
        egui::Button::new(RichText::new(label).color(theme.text_primary).size(13.0))
            .fill(theme.surface_2)
            .stroke(theme.subtle_button_stroke())
            .corner_radius(egui::CornerRadius::same(theme.radius_8))
            .min_size(egui::vec2(0.0, theme.button_height)),
    )
    .clicked()
}

pub(crate) fn danger_button(ui: &mut egui::Ui, theme: &Theme, label: &str) -> bool {
    ui.add(
        egui::Button::new(RichText::new(label).color(theme.text_on_accent).size(13.0))
            .fill(theme.danger)
            .stroke(theme.primary_button_stroke())
            .corner_radius(egui::CornerRadius::same(theme.radius_8))
            .min_size(egui::vec2(0.0, theme.button_height)),
    )
    .clicked()
}

fn row_action(ui: &mut egui::Ui, theme: &Theme, label: &str, color: egui::Color32) -> bool {
    ui.add(
        egui::Button::new(RichText::new(label).color(color).size(12.0))
            .fill(theme.surface_2)
            .stroke(theme.subtle_button_stroke())
            .corner_radius(egui::CornerRadius::same(theme.radius_8)),
    )
    .clicked()
}

/// The shared tabular surface. Renders search, per-column filters,
/// pagination, selection, exports and the destructive-action confirmation
/// dialog; reports what the user asked for as [`TableAction`]s and leaves
/// every mutation to the caller.
pub struct RecordTable<'a> {
    columns: &'static [Column],
    search_hint: &'a str,
    create_label: Option<&'a str>,
}

impl<'a> RecordTable<'a> {
    pub fn new(columns: &'static [Column]) -> Self {
        Self {
            columns,
            search_hint: "Search...",
            create_label: Some("+ Add New"),
        }
    }

    pub fn search_hint(mut self, hint: &'a str) -> Self {
        self.search_hint = hint;
        self
    }

    pub fn create_label(mut self, label: &'a str) -> Self {
        self.create_label = Some(label);
        self
    }

    pub fn show<R: Record>(
        &self,
        ui: &mut egui::Ui,
        theme: &Theme,
        state: &mut TableState,
        rows: &[R],
    ) -> Vec<TableAction> {
        let mut actions = Vec::new();
        query::prune_selection(state, rows);

        ui.horizontal(|ui| {
            let search = ui.add(
                egui::TextEdit::singleline(&mut state.search)
                    .hint_text(self.search_hint)
                    .desired_width(240.0),
            );
            if search.changed() {
                state.page = 1;
            }
            let filters_label = if state.show_filters {
                "Hide Filters"
            } else {
                "Filters"
            };
            if subtle_button(ui, theme, filters_label) {
                state.show_filters = !state.show_filters;
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(label) = self.create_label {
                    if primary_button(ui, theme, label) {
                        actions.push(TableAction::Create);
                    }
                }
                if subtle_button(ui, theme, "Delete Selected") {
                    if state.selected.is_empty() {
                        actions.push(TableAction::EmptySelection);
                    } else {
                        state.pending_confirm =
                            Some(ConfirmTarget::Many(state.selected.iter().cloned().collect()));
                    }
                }
                if subtle_button(ui, theme, "Print") {
                    actions.push(TableAction::Print);
                }
                if subtle_button(ui, theme, "JSON") {
                    actions.push(TableAction::Export(ExportFormat::Json));
                }
                if subtle_button(ui, theme, "CSV") {
                    actions.push(TableAction::Export(ExportFormat::Csv));
                }
            });
        });
        ui.add_space(theme.spacing_8);

        let filtered = query::filter_rows(rows, self.columns, state);
        let pages = query::page_count(filtered.len());
        state.page = query::clamp_page(state.page, pages);
        let page_rows: Vec<&R> = query::page_slice(&filtered, state.page).to_vec();

        theme.card_frame().show(ui, |ui| {
            egui::Grid::new(("records", self.columns.len()))
                .striped(true)
                .num_columns(self.columns.len() + 2)
                .spacing(egui::vec2(theme.spacing_16, theme.spacing_8))
                .show(ui, |ui| {
                    let mut all_selected = query::page_fully_selected(state, &page_rows);
                    if ui.checkbox(&mut all_selected, "").changed() {
                        query::toggle_select_page(state, &page_rows);
                    }
                    for column in self.columns {
                        ui.label(
                            RichText::new(column.label)
                                .color(theme.text_muted)
                                .size(12.0)
                                .strong(),
                        );
                    }
                    ui.label(
                        RichText::new("Actions")
                            .color(theme.text_muted)
                            .size(12.0)
                            .strong(),
                    );
                    ui.end_row();

                    if state.show_filters {
                        ui.label("");
                        let mut filter_changed = false;
                        for column in self.columns {
                            let filter = state.filters.entry(column.key).or_default();
                            let response = ui.add(
                                egui::TextEdit::singleline(filter)
                                    .hint_text("Filter")
                                    .desired_width(120.0),
                            );
                            if response.changed() {
                                filter_changed = true;
                            }
                        }
                        ui.label("");
                        ui.end_row();
                        if filter_changed {
                            state.page = 1;
                        }
                    }

                    for record in &page_rows {
                        let id = record.id();
                        let mut checked = state.selected.contains(&id);
                        if ui.checkbox(&mut checked, "").changed() {
                            query::toggle_select(state, id.clone());
                        }
                        for column in self.columns {
                            ui.label(record.field(column.key));
                        }
                        ui.horizontal(|ui| {
                            if row_action(ui, theme, "Edit", theme.accent_primary) {
                                actions.push(TableAction::Edit(id.clone()));
                            }
                            if row_action(ui, theme, "Delete", theme.danger) {
                                state.pending_confirm = Some(ConfirmTarget::One(id.clone()));
                            }
                        });
                        ui.end_row();
                    }
                });

            if filtered.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(theme.spacing_24);
                    ui.label(RichText::new("No data found").color(theme.text_muted));
                    ui.add_space(theme.spacing_24);
                });
            }
        });

        ui.add_space(theme.spacing_8);
        ui.horizontal(|ui| {
            let (start, end) = query::page_window(filtered.len(), state.page);
            ui.label(
                RichText::new(format!(
                    "Showing {start} to {end} of {} entries",
                    filtered.len()
                ))
                .color(theme.text_muted)
                .size(12.0),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let last_page = pages.max(1);
                if ui
                    .add_enabled(state.page < last_page, egui::Button::new("Next"))
                    .clicked()
                {
                    state.page += 1;
                }
                ui.label(
                    RichText::new(format!("Page {} of {last_page}", state.page))
                        .color(theme.text_muted)
                        .size(12.0),
                );
                if ui
                    .add_enabled(state.page > 1, egui::Button::new("Previous"))
                    .clicked()
                {
                    state.page -= 1;
                }
            });
        });

        if let Some(target) = state.pending_confirm.clone() {
            let message = match &target {
                ConfirmTarget::One(id) => {
                    format!("Delete record {id}? This cannot be undone.")
                }
                ConfirmTarget::Many(ids) => {
                    format!("Delete {} selected records? This cannot be undone.", ids.len())
                }
            };
            egui::Window::new("Confirm Delete")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ui.ctx(), |ui| {
                    theme.pill_frame(theme.danger_tint).show(ui, |ui| {
                        ui.label(RichText::new(message).color(theme.danger));
                    });
                    ui.add_space(theme.spacing_8);
                    ui.horizontal(|ui| {
                        if subtle_button(ui, theme, "Cancel") {
                            state.pending_confirm = None;
                        }
                        if danger_button(ui, theme, "Delete") {
                            match target.clone() {
                                ConfirmTarget::One(id) => actions.push(TableAction::Delete(id)),
                                ConfirmTarget::Many(ids) => {
                                    actions.push(TableAction::BulkDelete(ids))
                                }
                            }
                            state.pending_confirm = None;
                        }
                    });
                });
        }

        actions
    }
}
