use super::{Column, Record, RecordId, TableState, PAGE_SIZE};
use std::collections::BTreeMap;

pub fn matches_search<R: Record>(record: &R, columns: &[Column], query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    if record.id().to_string().to_lowercase().contains(&needle) {
        return true;
    }
    columns
        .iter()
        .any(|column| record.field(column.key).to_lowercase().contains(&needle))
}

pub fn matches_filters<R: Record>(
    record: &R,
    filters: &BTreeMap<&'static str, String>,
) -> bool {
    filters.iter().all(|(key, filter)| {
        let needle = filter.trim().to_lowercase();
        needle.is_empty() || record.field(key).to_lowercase().contains(&needle)
    })
}

/// Search and column filters combined. Search ORs across every column,
/// filters AND per column, and the two compose conjunctively. Preserves
/// the collection's order.
pub fn filter_rows<'a, R: Record>(
    rows: &'a [R],
    columns: &[Column],
    state: &TableState,
) -> Vec<&'a R> {
    rows.iter()
        .filter(|record| {
            matches_search(*record, columns, &state.search)
                && matches_filters(*record, &state.filters)
        })
        .collect()
}

pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

pub fn clamp_page(page: usize, pages: usize) -> usize {
    page.clamp(1, pages.max(1))
}

pub fn page_slice<'a, 'r, R>(filtered: &'a [&'r R], page: usize) -> &'a [&'r R] {
    let page = clamp_page(page, page_count(filtered.len()));
    let start = (page - 1) * PAGE_SIZE;
    if start >= filtered.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(filtered.len());
    &filtered[start..end]
}

/// 1-based inclusive bounds of the visible window, for the
/// "Showing X to Y of Z entries" footer. `(0, 0)` when empty.
pub fn page_window(total: usize, page: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    let page = clamp_page(page, page_count(total));
    let start = (page - 1) * PAGE_SIZE + 1;
    let end = (page * PAGE_SIZE).min(total);
    (start, end)
}

pub fn toggle_select(state: &mut TableState, id: RecordId) {
    if !state.selected.remove(&id) {
        state.selected.insert(id);
    }
}

pub fn page_fully_selected<R: Record>(state: &TableState, page_rows: &[&R]) -> bool {
    !page_rows.is_empty()
        && page_rows
            .iter()
            .all(|record| state.selected.contains(&record.id()))
}

/// Select-all checkbox semantics: flips exactly the rows of the current
/// page, leaving selections on other pages alone.
pub fn toggle_select_page<R: Record>(state: &mut TableState, page_rows: &[&R]) {
    if page_fully_selected(state, page_rows) {
        for record in page_rows {
            state.selected.remove(&record.id());
        }
    } else {
        for record in page_rows {
            state.selected.insert(record.id());
        }
    }
}

/// Drops selected ids that no longer exist in the collection. Filtering a
/// selected row out of view does not deselect it; deleting it does.
pub fn prune_selection<R: Record>(state: &mut TableState, rows: &[R]) {
    state
        .selected
        .retain(|id| rows.iter().any(|record| record.id() == *id));
}

/// Removes exactly the given ids, returning how many rows went away.
pub fn remove_by_ids<R: Record>(rows: &mut Vec<R>, ids: &[RecordId]) -> usize {
    let before = rows.len();
    rows.retain(|record| !ids.contains(&record.id()));
    before - rows.len()
}
