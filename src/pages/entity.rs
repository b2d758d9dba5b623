use crate::notify::NotificationHub;
use crate::pages::logs::ActivityLog;
use crate::store::LocalStore;
use crate::table::view::{primary_button, subtle_button, RecordTable};
use crate::table::{export, query, Column, ExportFormat, Record, RecordId, TableAction, TableState};
use crate::theme::Theme;
use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, RichText};
use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// What one entity contributes to the generic CRUD page: identity, table
/// shape, seed rows, the editor form and its validation.
pub trait EntityRecord: Record + Default + DeserializeOwned {
    const TITLE: &'static str;
    /// Singular, title case, for toasts and the editor window.
    const NOUN: &'static str;
    const STORE_KEY: &'static str;
    const COLUMNS: &'static [Column];
    const SEARCH_HINT: &'static str;
    /// Lowercase plural; doubles as the export file stem.
    const EXPORT_STEM: &'static str;

    /// First-run dataset, shown until the collection is first persisted.
    fn seed() -> Vec<Self>;
    fn assign_next_id(&mut self, existing: &[Self]);
    fn edit_form(&mut self, ui: &mut egui::Ui, theme: &Theme);
    fn validate(&self) -> Result<(), String>;
}

struct Editor<R> {
    draft: R,
    /// `None` while creating; the id being replaced while editing.
    original: Option<RecordId>,
}

/// Generic CRUD page over one persisted collection. Owns the rows, the
/// table state and the editor modal; every mutation rewrites the whole
/// slot through the store and raises a toast.
pub struct EntityPage<R: EntityRecord> {
    rows: Vec<R>,
    state: TableState,
    editor: Option<Editor<R>>,
    store: LocalStore,
    export_dir: PathBuf,
}

impl<R: EntityRecord> EntityPage<R> {
    pub fn new(store: LocalStore, export_dir: PathBuf) -> Self {
        let rows = store.get(R::STORE_KEY, R::seed());
        Self {
            rows,
            state: TableState::default(),
            editor: None,
            store,
            export_dir,
        }
    }

    /// Navigating to the page lands on fresh view state: search, filters,
    /// selection and any open editor are gone; the rows stay.
    pub fn reset_view(&mut self) {
        self.state = TableState::default();
        self.editor = None;
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        hub: &NotificationHub,
        log: &mut ActivityLog,
    ) {
        ui.heading(R::TITLE);
        ui.label(
            RichText::new(format!("{} records", self.rows.len()))
                .color(theme.text_muted)
                .size(12.0),
        );
        ui.add_space(theme.spacing_8);

        let actions = RecordTable::new(R::COLUMNS)
            .search_hint(R::SEARCH_HINT)
            .create_label("+ Add New")
            .show(ui, theme, &mut self.state, &self.rows);
        for action in actions {
            self.apply(action, hub, log);
        }

        self.editor_window(ui, theme, hub, log);
    }

    fn apply(&mut self, action: TableAction, hub: &NotificationHub, log: &mut ActivityLog) {
        match action {
            TableAction::Create => {
                self.editor = Some(Editor {
                    draft: R::default(),
                    original: None,
                });
            }
            TableAction::Edit(id) => {
                if let Some(record) = self.rows.iter().find(|record| record.id() == id) {
                    self.editor = Some(Editor {
                        draft: record.clone(),
                        original: Some(id),
                    });
                }
            }
            TableAction::Delete(id) => {
                let removed = query::remove_by_ids(&mut self.rows, &[id.clone()]);
                if removed > 0 && self.persist(hub, log) {
                    hub.success(format!("{} deleted successfully", R::NOUN));
                    log.push(format!("{} {id} deleted", R::NOUN));
                }
            }
            TableAction::BulkDelete(ids) => {
                let removed = query::remove_by_ids(&mut self.rows, &ids);
                self.state.selected.clear();
                if removed > 0 && self.persist(hub, log) {
                    hub.success(format!("{removed} records deleted"));
                    log.push(format!("{removed} {} deleted", R::EXPORT_STEM));
                }
            }
            TableAction::EmptySelection => {
                hub.warning(format!("No {} selected", R::EXPORT_STEM));
            }
            TableAction::Export(format) => self.export(format, hub, log),
            TableAction::Print => self.print(hub, log),
        }
    }

    fn editor_window(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        hub: &NotificationHub,
        log: &mut ActivityLog,
    ) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let creating = editor.original.is_none();
        let title = if creating {
            format!("Add {}", R::NOUN)
        } else {
            format!("Edit {}", R::NOUN)
        };

        let mut open = true;
        let mut submitted = false;
        let mut cancelled = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ui.ctx(), |ui| {
                editor.draft.edit_form(ui, theme);
                ui.add_space(theme.spacing_8);
                ui.horizontal(|ui| {
                    if subtle_button(ui, theme, "Cancel") {
                        cancelled = true;
                    }
                    if primary_button(ui, theme, "Save") {
                        submitted = true;
                    }
                });
            });

        if !open || cancelled {
            self.editor = None;
            return;
        }
        if !submitted {
            return;
        }

        // Validation failures keep the editor open and write nothing.
        if let Err(message) = editor.draft.validate() {
            hub.warning(message);
            return;
        }

        let mut record = editor.draft.clone();
        let original = editor.original.clone();
        match original {
            None => {
                record.assign_next_id(&self.rows);
                let id = record.id();
                self.rows.push(record);
                if self.persist(hub, log) {
                    hub.success(format!("{} created successfully", R::NOUN));
                    log.push(format!("{} {id} created", R::NOUN));
                }
            }
            Some(id) => {
                if let Some(slot) = self.rows.iter_mut().find(|record| record.id() == id) {
                    *slot = record;
                }
                if self.persist(hub, log) {
                    hub.success(format!("{} updated successfully", R::NOUN));
                    log.push(format!("{} {id} updated", R::NOUN));
                }
            }
        }
        self.editor = None;
    }

    fn persist(&self, hub: &NotificationHub, log: &mut ActivityLog) -> bool {
        match self.store.set(R::STORE_KEY, &self.rows) {
            Ok(()) => true,
            Err(err) => {
                hub.error(format!("Failed to save {}: {err}", R::EXPORT_STEM));
                log.push(format!("save of {} failed: {err}", R::STORE_KEY));
                false
            }
        }
    }

    fn filtered(&self) -> Vec<&R> {
        query::filter_rows(&self.rows, R::COLUMNS, &self.state)
    }

    fn export(&self, format: ExportFormat, hub: &NotificationHub, log: &mut ActivityLog) {
        let rows = self.filtered();
        let written = match format {
            ExportFormat::Csv => {
                let contents = export::to_csv(&rows, R::COLUMNS);
                export::write_export(&self.export_dir, R::EXPORT_STEM, "csv", &contents)
            }
            ExportFormat::Json => match export::to_json(&rows) {
                Ok(contents) => {
                    export::write_export(&self.export_dir, R::EXPORT_STEM, "json", &contents)
                }
                Err(err) => {
                    hub.error(format!("Export failed: {err}"));
                    return;
                }
            },
        };
        match written {
            Ok(path) => {
                hub.success(format!("Exported {} rows to {}", rows.len(), path.display()));
                log.push(format!("exported {} to {}", R::EXPORT_STEM, path.display()));
            }
            Err(err) => hub.error(format!("Export failed: {err}")),
        }
    }

    fn print(&self, hub: &NotificationHub, log: &mut ActivityLog) {
        let filtered = self.filtered();
        let page_rows = query::page_slice(&filtered, self.state.page).to_vec();
        let text = export::print_text(&page_rows, R::COLUMNS, R::TITLE);
        match export::write_export(
            &self.export_dir,
            &format!("{}-print", R::EXPORT_STEM),
            "txt",
            &text,
        ) {
            Ok(path) => {
                hub.info(format!("Print view written to {}", path.display()));
                log.push(format!("printed {} page to {}", R::EXPORT_STEM, path.display()));
            }
            Err(err) => hub.error(format!("Print failed: {err}")),
        }
    }
}

pub(crate) fn next_numeric_id<R: Record>(rows: &[R]) -> u64 {
    rows.iter()
        .filter_map(|record| match record.id() {
            RecordId::Num(n) => Some(n),
            RecordId::Text(_) => None,
        })
        .max()
        .unwrap_or(0)
        + 1
}

pub(crate) fn next_prefixed_id<R: Record>(rows: &[R], prefix: &str) -> String {
    let next = rows
        .iter()
        .filter_map(|record| match record.id() {
            RecordId::Text(id) => id
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('-'))
                .and_then(|digits| digits.parse::<u32>().ok()),
            RecordId::Num(_) => None,
        })
        .max()
        .unwrap_or(0)
        + 1;
    format!("{prefix}-{next:03}")
}

/// For seed rows; callers pass literal calendar dates.
pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub(crate) fn money(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("${value:.0}")
    } else {
        format!("${value:.2}")
    }
}

pub(crate) fn form_label(ui: &mut egui::Ui, theme: &Theme, text: &str) {
    ui.label(RichText::new(text).color(theme.text_muted).size(12.0));
}

pub(crate) fn text_field(ui: &mut egui::Ui, theme: &Theme, label: &str, value: &mut String) {
    form_label(ui, theme, label);
    ui.add(egui::TextEdit::singleline(value).desired_width(260.0));
}

pub(crate) fn multiline_field(ui: &mut egui::Ui, theme: &Theme, label: &str, value: &mut String) {
    form_label(ui, theme, label);
    ui.add(
        egui::TextEdit::multiline(value)
            .desired_width(260.0)
            .desired_rows(3),
    );
}

pub(crate) fn money_field(ui: &mut egui::Ui, theme: &Theme, label: &str, value: &mut f64) {
    form_label(ui, theme, label);
    ui.add(
        egui::DragValue::new(value)
            .speed(1.0)
            .prefix("$")
            .range(0.0..=f64::MAX),
    );
}

pub(crate) fn count_field(ui: &mut egui::Ui, theme: &Theme, label: &str, value: &mut u32) {
    form_label(ui, theme, label);
    ui.add(egui::DragValue::new(value).speed(1));
}

pub(crate) fn combo_field<T: PartialEq + Copy>(
    ui: &mut egui::Ui,
    theme: &Theme,
    label: &str,
    value: &mut T,
    options: &[T],
    display: fn(T) -> &'static str,
) {
    form_label(ui, theme, label);
    egui::ComboBox::from_id_salt(label)
        .selected_text(display(*value))
        .show_ui(ui, |ui| {
            for option in options {
                ui.selectable_value(value, *option, display(*option));
            }
        });
}

pub(crate) fn string_combo(
    ui: &mut egui::Ui,
    theme: &Theme,
    label: &str,
    value: &mut String,
    options: &[&str],
) {
    form_label(ui, theme, label);
    egui::ComboBox::from_id_salt(label)
        .selected_text(value.clone())
        .show_ui(ui, |ui| {
            for option in options {
                ui.selectable_value(value, option.to_string(), *option);
            }
        });
}

pub(crate) fn date_field(ui: &mut egui::Ui, theme: &Theme, label: &str, value: &mut NaiveDate) {
    form_label(ui, theme, label);
    let mut year = value.year();
    let mut month = value.month();
    let mut day = value.day();
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= ui
            .add(egui::DragValue::new(&mut year).range(1970..=2100))
            .changed();
        changed |= ui
            .add(egui::DragValue::new(&mut month).range(1..=12))
            .changed();
        changed |= ui
            .add(egui::DragValue::new(&mut day).range(1..=31))
            .changed();
    });
    if changed {
        if let Some(updated) = NaiveDate::from_ymd_opt(year, month, day) {
            *value = updated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::crm::Tenant;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_root(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "relaydeck_entity_{prefix}_{}_{}_{}",
            std::process::id(),
            nanos,
            rand::random::<u32>()
        ))
    }

    fn tenant(id: u64, name: &str, email: &str) -> Tenant {
        Tenant {
            id,
            name: name.to_string(),
            email: email.to_string(),
            ..Tenant::default()
        }
    }

    #[test]
    fn numeric_ids_continue_past_the_maximum() {
        let rows: Vec<Tenant> = Vec::new();
        assert_eq!(next_numeric_id(&rows), 1);

        let rows = vec![tenant(1, "A", "a@a.com"), tenant(5, "B", "b@b.com")];
        assert_eq!(next_numeric_id(&rows), 6);
    }

    #[test]
    fn prefixed_ids_pad_to_three_digits() {
        let rows: Vec<crate::pages::crm::Ticket> = Vec::new();
        assert_eq!(next_prefixed_id(&rows, "TKT"), "TKT-001");

        let rows = crate::pages::crm::Ticket::seed();
        let next = next_prefixed_id(&rows, "TKT");
        assert!(next.starts_with("TKT-"));
        let max: u32 = rows
            .iter()
            .filter_map(|t| t.id.strip_prefix("TKT-").and_then(|d| d.parse().ok()))
            .max()
            .expect("seed has prefixed ids");
        assert_eq!(next, format!("TKT-{:03}", max + 1));
    }

    #[test]
    fn money_drops_cents_only_when_whole() {
        assert_eq!(money(500.0), "$500");
        assert_eq!(money(99.5), "$99.50");
    }

    #[test]
    fn page_loads_seed_until_a_slot_exists() {
        let root = temp_root("seed");
        let store = LocalStore::at(&root);
        let page: EntityPage<Tenant> = EntityPage::new(store, root.join("exports"));
        assert_eq!(page.rows.len(), Tenant::seed().len());

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn delete_persists_and_announces() {
        let root = temp_root("delete");
        let store = LocalStore::at(&root);
        store
            .set(
                Tenant::STORE_KEY,
                &vec![tenant(1, "Acme", "a@acme.com"), tenant(2, "Globex", "g@globex.com")],
            )
            .expect("seed slot should write");

        let hub = NotificationHub::new();
        let listener = hub.subscribe();
        let mut log = ActivityLog::new();
        let mut page: EntityPage<Tenant> = EntityPage::new(store.clone(), root.join("exports"));

        page.apply(TableAction::Delete(RecordId::Num(2)), &hub, &mut log);

        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id, 1);
        let persisted: Vec<Tenant> = store.get(Tenant::STORE_KEY, Vec::new());
        assert_eq!(persisted.len(), 1);
        let toast = listener.try_recv().expect("delete should toast");
        assert_eq!(toast.kind, crate::notify::ToastKind::Success);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn bulk_delete_with_no_selection_warns_and_changes_nothing() {
        let root = temp_root("empty_bulk");
        let store = LocalStore::at(&root);
        let hub = NotificationHub::new();
        let listener = hub.subscribe();
        let mut log = ActivityLog::new();
        let mut page: EntityPage<Tenant> = EntityPage::new(store, root.join("exports"));
        let before = page.rows.len();

        page.apply(TableAction::EmptySelection, &hub, &mut log);

        assert_eq!(page.rows.len(), before);
        let toast = listener.try_recv().expect("warning should toast");
        assert_eq!(toast.kind, crate::notify::ToastKind::Warning);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn bulk_delete_removes_exactly_the_selected_ids() {
        let root = temp_root("bulk");
        let store = LocalStore::at(&root);
        store
            .set(
                Tenant::STORE_KEY,
                &vec![
                    tenant(1, "A", "a@a.com"),
                    tenant(2, "B", "b@b.com"),
                    tenant(3, "C", "c@c.com"),
                ],
            )
            .expect("seed slot should write");

        let hub = NotificationHub::new();
        let mut log = ActivityLog::new();
        let mut page: EntityPage<Tenant> = EntityPage::new(store.clone(), root.join("exports"));
        page.state.selected.insert(RecordId::Num(1));
        page.state.selected.insert(RecordId::Num(3));

        page.apply(
            TableAction::BulkDelete(vec![RecordId::Num(1), RecordId::Num(3)]),
            &hub,
            &mut log,
        );

        let left: Vec<u64> = page.rows.iter().map(|t| t.id).collect();
        assert_eq!(left, vec![2]);
        assert!(page.state.selected.is_empty());
        let persisted: Vec<Tenant> = store.get(Tenant::STORE_KEY, Vec::new());
        assert_eq!(persisted.len(), 1);

        let _ = fs::remove_dir_all(root);
    }

    // Cancelling the confirmation emits no action at all, so the rows, the
    // selection and the persisted slot keep their pre-dialog values.
    #[test]
    fn declined_delete_changes_nothing() {
        let root = temp_root("decline");
        let store = LocalStore::at(&root);
        store
            .set(
                Tenant::STORE_KEY,
                &vec![tenant(1, "Acme", "a@acme.com"), tenant(2, "Globex", "g@globex.com")],
            )
            .expect("seed slot should write");

        let hub = NotificationHub::new();
        let listener = hub.subscribe();
        let mut log = ActivityLog::new();
        let mut page: EntityPage<Tenant> = EntityPage::new(store.clone(), root.join("exports"));
        page.state.selected.insert(RecordId::Num(2));
        page.state.pending_confirm =
            Some(crate::table::ConfirmTarget::Many(vec![RecordId::Num(2)]));

        // What the dialog's Cancel button does.
        page.state.pending_confirm = None;

        assert_eq!(page.rows.len(), 2);
        assert!(page.state.selected.contains(&RecordId::Num(2)));
        let persisted: Vec<Tenant> = store.get(Tenant::STORE_KEY, Vec::new());
        assert_eq!(persisted.len(), 2);
        assert!(listener.try_recv().is_none(), "declining is silent");

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn reset_view_clears_the_view_state_but_not_the_rows() {
        let root = temp_root("reset");
        let store = LocalStore::at(&root);
        store
            .set(
                Tenant::STORE_KEY,
                &vec![tenant(1, "Acme", "a@acme.com"), tenant(2, "Globex", "g@globex.com")],
            )
            .expect("seed slot should write");

        let hub = NotificationHub::new();
        let mut log = ActivityLog::new();
        let mut page: EntityPage<Tenant> = EntityPage::new(store, root.join("exports"));
        page.state.search = "glob".to_string();
        page.state.filters.insert("status", "Active".to_string());
        page.state.page = 2;
        page.state.selected.insert(RecordId::Num(2));
        page.state.show_filters = true;
        page.state.pending_confirm = Some(crate::table::ConfirmTarget::One(RecordId::Num(2)));
        page.apply(TableAction::Create, &hub, &mut log);
        assert!(page.editor.is_some());

        page.reset_view();

        assert!(page.state.search.is_empty());
        assert!(page.state.filters.is_empty());
        assert_eq!(page.state.page, 1);
        assert!(page.state.selected.is_empty());
        assert!(!page.state.show_filters);
        assert!(page.state.pending_confirm.is_none());
        assert!(page.editor.is_none());
        assert_eq!(page.rows.len(), 2);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn export_writes_the_filtered_rows() {
        let root = temp_root("export");
        let store = LocalStore::at(&root);
        store
            .set(
                Tenant::STORE_KEY,
                &vec![tenant(1, "Acme", "a@acme.com"), tenant(2, "Globex", "g@globex.com")],
            )
            .expect("seed slot should write");

        let hub = NotificationHub::new();
        let mut log = ActivityLog::new();
        let mut page: EntityPage<Tenant> = EntityPage::new(store, root.join("exports"));
        page.state.search = "glob".to_string();

        page.apply(TableAction::Export(ExportFormat::Csv), &hub, &mut log);

        let entries: Vec<_> = fs::read_dir(root.join("exports"))
            .expect("export dir should exist")
            .flatten()
            .collect();
        assert_eq!(entries.len(), 1);
        let contents = fs::read_to_string(entries[0].path()).expect("export should read");
        assert!(contents.contains("Globex"));
        assert!(!contents.contains("Acme"));

        let _ = fs::remove_dir_all(root);
    }

    // The full lifecycle the console goes through: load a two-row slot,
    // narrow it with search, create a third record with an assigned id,
    // delete the second, and check persistence at every step.
    #[test]
    fn search_create_delete_round_trip() {
        let root = temp_root("lifecycle");
        let store = LocalStore::at(&root);
        store
            .set(
                Tenant::STORE_KEY,
                &vec![tenant(1, "Acme", "ops@acme.com"), tenant(2, "Globex", "ops@globex.com")],
            )
            .expect("seed slot should write");

        let hub = NotificationHub::new();
        let mut log = ActivityLog::new();
        let mut page: EntityPage<Tenant> = EntityPage::new(store.clone(), root.join("exports"));

        page.state.search = "glob".to_string();
        assert_eq!(page.filtered().len(), 1);
        assert_eq!(page.filtered()[0].name, "Globex");
        page.state.search.clear();

        let mut initech = tenant(0, "Initech", "ops@initech.com");
        initech.assign_next_id(&page.rows);
        assert_eq!(initech.id, 3);
        page.rows.push(initech);
        assert!(page.persist(&hub, &mut log));

        page.apply(TableAction::Delete(RecordId::Num(2)), &hub, &mut log);

        let persisted: Vec<Tenant> = store.get(Tenant::STORE_KEY, Vec::new());
        let ids: Vec<u64> = persisted.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let _ = fs::remove_dir_all(root);
    }
}
