use super::SortDirection;

/// Tri-state header checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Indeterminate,
    Checked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub id: &'static str,
    pub title: &'static str,
    pub sortable: bool,
    pub sorted: Option<SortDirection>,
}

#[derive(Debug)]
pub struct RowView<'a, R> {
    pub id: String,
    pub row: &'a R,
    pub selected: bool,
    /// Rendered cells, one per visible column.
    pub cells: Vec<String>,
}

/// Everything a renderer needs for one frame of a table.
#[derive(Debug)]
pub struct TableView<'a, R> {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView<'a, R>>,
    pub select_all: CheckState,
    pub filter: String,
    pub selected_count: usize,
    pub filtered_count: usize,
    pub page_index: usize,
    pub page_count: usize,
    pub can_previous_page: bool,
    pub can_next_page: bool,
}

impl<R> TableView<'_, R> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn selection_summary(&self) -> String {
        format!(
            "{} of {} row(s) selected.",
            self.selected_count, self.filtered_count
        )
    }
}
