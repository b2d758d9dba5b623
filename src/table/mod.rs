pub mod export;
pub mod query;
pub mod view;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Rows per table page.
pub const PAGE_SIZE: usize = 10;

/// Stable identity of a table row. Numeric for counter-assigned records,
/// text for prefixed ids like `INV-001`. Untagged so persisted collections
/// carry plain numbers or strings in their `id` fields.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Num(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Num(n) => write!(f, "{n}"),
            RecordId::Text(t) => f.write_str(t),
        }
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId::Num(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Text(value)
    }
}

/// A row the table can display, query and export. `field` returns the
/// display string of one column; search, column filters, CSV and print all
/// operate on exactly these strings.
pub trait Record: Clone + Serialize {
    fn id(&self) -> RecordId;
    fn field(&self, key: &str) -> String;
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
}

impl Column {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// What the widget asks its caller to do. The widget itself never mutates
/// the collection and never persists.
#[derive(Debug, Clone, PartialEq)]
pub enum TableAction {
    Create,
    Edit(RecordId),
    Delete(RecordId),
    BulkDelete(Vec<RecordId>),
    EmptySelection,
    Export(ExportFormat),
    Print,
}

/// A destructive action awaiting the user's confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmTarget {
    One(RecordId),
    Many(Vec<RecordId>),
}

/// Per-table UI state. Owned by the page and rebuilt on navigation, so
/// filters and selection reset when the user leaves the page.
#[derive(Debug, Clone)]
pub struct TableState {
    pub search: String,
    pub filters: BTreeMap<&'static str, String>,
    /// 1-based, clamped against the filtered row count each frame.
    pub page: usize,
    pub selected: BTreeSet<RecordId>,
    pub show_filters: bool,
    pub pending_confirm: Option<ConfirmTarget>,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: BTreeMap::new(),
            page: 1,
            selected: BTreeSet::new(),
            show_filters: false,
            pending_confirm: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RecordId;

    #[test]
    fn record_id_serializes_untagged() {
        let numeric = serde_json::to_string(&RecordId::Num(7)).expect("serialize");
        let text = serde_json::to_string(&RecordId::Text("INV-001".into())).expect("serialize");
        assert_eq!(numeric, "7");
        assert_eq!(text, "\"INV-001\"");

        let back_num: RecordId = serde_json::from_str("7").expect("deserialize");
        let back_text: RecordId = serde_json::from_str("\"INV-001\"").expect("deserialize");
        assert_eq!(back_num, RecordId::Num(7));
        assert_eq!(back_text, RecordId::Text("INV-001".into()));
    }

    #[test]
    fn default_state_starts_on_page_one_with_nothing_selected() {
        let state = super::TableState::default();
        assert_eq!(state.page, 1);
        assert!(state.selected.is_empty());
        assert!(state.pending_confirm.is_none());
    }
}
