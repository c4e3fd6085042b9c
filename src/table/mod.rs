//! Client-side table model: sorting, filtering, pagination, row selection
//! and column visibility over an already fetched row set.
//!
//! All derivations run over the full row set held in memory; nothing is
//! pushed to the server.

mod column;
mod view;

use std::collections::{BTreeSet, HashSet};

pub use column::Column;
pub use view::{CheckState, HeaderView, RowView, TableView};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Rows need a stable identity so selection can be keyed by it.
pub trait TableRow {
    fn row_id(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sorting {
    pub column: &'static str,
    pub direction: SortDirection,
}

pub struct DataTable<R> {
    rows: Vec<R>,
    columns: Vec<Column<R>>,
    filter_column: &'static str,
    filter: String,
    sorting: Option<Sorting>,
    page_index: usize,
    page_size: usize,
    selected: BTreeSet<String>,
    hidden: HashSet<&'static str>,
}

impl<R: TableRow> DataTable<R> {
    /// `filter_column` names the column the text filter matches against.
    pub fn new(columns: Vec<Column<R>>, filter_column: &'static str) -> Self {
        debug_assert!(
            columns.iter().any(|c| c.id == filter_column),
            "filter column {filter_column} is not a column of this table"
        );
        Self {
            rows: Vec::new(),
            columns,
            filter_column,
            filter: String::new(),
            sorting: None,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            selected: BTreeSet::new(),
            hidden: HashSet::new(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self.clamp_page();
        self
    }

    /// Replace the row set after a (re)fetch.
    ///
    /// Selected ids that no longer exist are dropped; everything else
    /// (sorting, filter, visibility, page) is kept.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        let present: HashSet<String> = rows.iter().map(|row| row.row_id()).collect();
        self.selected.retain(|id| present.contains(id));
        self.rows = rows;
        self.clamp_page();
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    fn column(&self, id: &str) -> Option<&Column<R>> {
        self.columns.iter().find(|c| c.id == id)
    }

    // --- Filtering ---

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Case-insensitive substring filter on the filter column. An empty value
    /// clears it. Always returns to the first page.
    pub fn set_filter(&mut self, value: impl Into<String>) {
        self.filter = value.into();
        self.page_index = 0;
    }

    fn matches_filter(&self, row: &R) -> bool {
        if self.filter.is_empty() {
            return true;
        }
        let needle = self.filter.to_lowercase();
        self.column(self.filter_column)
            .map(|column| column.render(row).to_lowercase().contains(&needle))
            .unwrap_or(true)
    }

    // --- Sorting ---

    pub fn sorting(&self) -> Option<Sorting> {
        self.sorting
    }

    /// Unsorted or descending goes ascending; ascending goes descending.
    /// Returns false for unknown or non-sortable columns.
    pub fn toggle_sorting(&mut self, column_id: &str) -> bool {
        let Some(column) = self.column(column_id).filter(|c| c.sortable) else {
            return false;
        };
        let column = column.id;
        let direction = match self.sorting {
            Some(Sorting {
                column: current,
                direction: SortDirection::Ascending,
            }) if current == column => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        self.sorting = Some(Sorting { column, direction });
        true
    }

    pub fn clear_sorting(&mut self) {
        self.sorting = None;
    }

    /// Indices into `rows` after filtering and sorting. The sort is stable,
    /// so ties keep fetch order in both directions.
    fn derived_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.rows.len())
            .filter(|&i| self.matches_filter(&self.rows[i]))
            .collect();

        if let Some(sorting) = self.sorting {
            if let Some(column) = self.column(sorting.column) {
                indices.sort_by(|&a, &b| {
                    let ordering = column.compare_rows(&self.rows[a], &self.rows[b]);
                    match sorting.direction {
                        SortDirection::Ascending => ordering,
                        SortDirection::Descending => ordering.reverse(),
                    }
                });
            }
        }
        indices
    }

    /// Filtered and sorted rows across all pages.
    pub fn filtered_rows(&self) -> Vec<&R> {
        self.derived_indices()
            .into_iter()
            .map(|i| &self.rows[i])
            .collect()
    }

    // --- Pagination ---

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Never less than one, so an empty table still has a first page.
    pub fn page_count(&self) -> usize {
        let filtered = self.derived_indices().len();
        filtered.div_ceil(self.page_size).max(1)
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.can_previous_page() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    pub fn next_page(&mut self) -> bool {
        if !self.can_next_page() {
            return false;
        }
        self.page_index += 1;
        true
    }

    fn clamp_page(&mut self) {
        let last = self.page_count() - 1;
        if self.page_index > last {
            self.page_index = last;
        }
    }

    fn page_indices(&self) -> Vec<usize> {
        self.derived_indices()
            .into_iter()
            .skip(self.page_index * self.page_size)
            .take(self.page_size)
            .collect()
    }

    pub fn page_rows(&self) -> Vec<&R> {
        self.page_indices()
            .into_iter()
            .map(|i| &self.rows[i])
            .collect()
    }

    // --- Selection ---

    pub fn is_selected(&self, row_id: &str) -> bool {
        self.selected.contains(row_id)
    }

    pub fn set_row_selected(&mut self, row_id: &str, selected: bool) {
        if selected {
            if self.rows.iter().any(|row| row.row_id() == row_id) {
                self.selected.insert(row_id.to_string());
            }
        } else {
            self.selected.remove(row_id);
        }
    }

    pub fn toggle_row_selected(&mut self, row_id: &str) {
        let selected = self.is_selected(row_id);
        self.set_row_selected(row_id, !selected);
    }

    /// Select or deselect exactly the rows on the current page.
    pub fn toggle_all_page_rows_selected(&mut self, selected: bool) {
        let ids: Vec<String> = self
            .page_indices()
            .into_iter()
            .map(|i| self.rows[i].row_id())
            .collect();
        for id in ids {
            if selected {
                self.selected.insert(id);
            } else {
                self.selected.remove(&id);
            }
        }
    }

    fn page_selection_counts(&self) -> (usize, usize) {
        let page = self.page_indices();
        let selected = page
            .iter()
            .filter(|&&i| self.selected.contains(&self.rows[i].row_id()))
            .count();
        (selected, page.len())
    }

    pub fn is_all_page_rows_selected(&self) -> bool {
        let (selected, total) = self.page_selection_counts();
        total > 0 && selected == total
    }

    pub fn is_some_page_rows_selected(&self) -> bool {
        let (selected, total) = self.page_selection_counts();
        selected > 0 && selected < total
    }

    pub fn select_all_state(&self) -> CheckState {
        let (selected, total) = self.page_selection_counts();
        if total > 0 && selected == total {
            CheckState::Checked
        } else if selected > 0 {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }

    /// Selected ids, including rows currently hidden by the filter.
    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn selected_rows(&self) -> Vec<&R> {
        self.rows
            .iter()
            .filter(|row| self.selected.contains(&row.row_id()))
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Selected rows among those passing the filter.
    pub fn filtered_selected_count(&self) -> usize {
        self.derived_indices()
            .into_iter()
            .filter(|&i| self.selected.contains(&self.rows[i].row_id()))
            .count()
    }

    // --- Column visibility ---

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        !self.hidden.contains(column_id)
    }

    /// Returns false when the column is unknown or cannot be hidden.
    pub fn set_column_visibility(&mut self, column_id: &str, visible: bool) -> bool {
        let Some(column) = self.column(column_id) else {
            return false;
        };
        if !visible && !column.hideable {
            return false;
        }
        let id = column.id;
        if visible {
            self.hidden.remove(id);
        } else {
            self.hidden.insert(id);
        }
        true
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &Column<R>> {
        self.columns
            .iter()
            .filter(|column| !self.hidden.contains(column.id))
    }

    /// Columns offered in the visibility menu.
    pub fn hideable_columns(&self) -> impl Iterator<Item = &Column<R>> {
        self.columns.iter().filter(|column| column.hideable)
    }

    // --- View ---

    pub fn view(&self) -> TableView<'_, R> {
        let visible: Vec<&Column<R>> = self.visible_columns().collect();

        let headers = visible
            .iter()
            .map(|column| HeaderView {
                id: column.id,
                title: column.header,
                sortable: column.sortable,
                sorted: self
                    .sorting
                    .filter(|sorting| sorting.column == column.id)
                    .map(|sorting| sorting.direction),
            })
            .collect();

        let rows = self
            .page_indices()
            .into_iter()
            .map(|i| {
                let row = &self.rows[i];
                let id = row.row_id();
                RowView {
                    selected: self.selected.contains(&id),
                    cells: visible.iter().map(|column| column.render(row)).collect(),
                    id,
                    row,
                }
            })
            .collect();

        TableView {
            headers,
            rows,
            select_all: self.select_all_state(),
            filter: self.filter.clone(),
            selected_count: self.filtered_selected_count(),
            filtered_count: self.derived_indices().len(),
            page_index: self.page_index,
            page_count: self.page_count(),
            can_previous_page: self.can_previous_page(),
            can_next_page: self.can_next_page(),
        }
    }
}
