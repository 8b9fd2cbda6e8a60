//! Generic tabular list.
//!
//! Holds a set of rows plus the view state a list page needs: a debounced
//! global filter over searchable columns, single-column sort, pagination,
//! row selection and per-row expansion. [`DataTable::view`] turns that state
//! into rows a renderer can draw directly.

use crate::domain::model::{Buyer, Record};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_PLACEHOLDER_ROWS: usize = 5;
pub const EMPTY_MESSAGE: &str = "No results.";

pub trait TableRow {
    /// Stable identity used for selection and expansion.
    fn row_id(&self) -> String;
}

impl TableRow for Record {
    fn row_id(&self) -> String {
        self.field_text("id")
    }
}

impl TableRow for Buyer {
    fn row_id(&self) -> String {
        self.id.clone()
    }
}

type Accessor<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

pub struct Column<T> {
    pub key: String,
    pub header: String,
    pub searchable: bool,
    pub sortable: bool,
    accessor: Accessor<T>,
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            header: self.header.clone(),
            searchable: self.searchable,
            sortable: self.sortable,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<T> Column<T> {
    pub fn new<F>(key: &str, header: &str, accessor: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            key: key.to_string(),
            header: header.to_string(),
            searchable: false,
            sortable: true,
            accessor: Arc::new(accessor),
        }
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn value(&self, row: &T) -> String {
        (self.accessor)(row)
    }
}

impl Column<Record> {
    /// Column reading one JSON field of an untyped row.
    pub fn field(key: &str, header: &str) -> Self {
        let field = key.to_string();
        Self::new(key, header, move |r: &Record| r.field_text(&field))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRow {
    Placeholder {
        cells: usize,
    },
    Data {
        id: String,
        cells: Vec<String>,
        selected: bool,
        expanded: bool,
    },
    Detail {
        id: String,
        colspan: usize,
        content: String,
    },
    Empty {
        colspan: usize,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<ViewRow>,
    pub page_index: usize,
    pub page_count: usize,
    pub total_filtered: usize,
}

pub struct DataTable<T> {
    columns: Vec<Column<T>>,
    rows: Vec<T>,
    loading: bool,
    filter: String,
    pending_filter: Option<(String, Instant)>,
    debounce: Duration,
    sort: Option<(String, SortDirection)>,
    page_index: usize,
    page_size: usize,
    placeholder_rows: usize,
    selected: HashSet<String>,
    expanded: HashSet<String>,
    detail: Option<Accessor<T>>,
}

impl<T: TableRow> DataTable<T> {
    /// A new table starts in the loading state until rows arrive.
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            loading: true,
            filter: String::new(),
            pending_filter: None,
            debounce: DEFAULT_DEBOUNCE,
            sort: None,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            placeholder_rows: DEFAULT_PLACEHOLDER_ROWS,
            selected: HashSet::new(),
            expanded: HashSet::new(),
            detail: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_placeholder_rows(mut self, count: usize) -> Self {
        self.placeholder_rows = count;
        self
    }

    /// Content for expanded rows. Without it, expanded rows list every column.
    pub fn with_detail<F>(mut self, render: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.detail = Some(Arc::new(render));
        self
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Replaces the data set. Selection and expansion of rows that are gone
    /// are dropped.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        let ids: HashSet<String> = rows.iter().map(TableRow::row_id).collect();
        self.selected.retain(|id| ids.contains(id));
        self.expanded.retain(|id| ids.contains(id));
        self.rows = rows;
        self.loading = false;
        self.clamp_page();
        tracing::debug!("Table now holds {} rows", self.rows.len());
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Records a keystroke; the filter applies once input has been quiet
    /// for the debounce period.
    pub fn input_filter(&mut self, text: &str, now: Instant) {
        self.pending_filter = Some((text.to_string(), now));
    }

    /// Applies the pending filter if the quiet period has elapsed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let due = match &self.pending_filter {
            Some((_, typed_at)) => now.saturating_duration_since(*typed_at) >= self.debounce,
            None => false,
        };
        if due {
            self.flush_filter()
        } else {
            false
        }
    }

    pub fn flush_filter(&mut self) -> bool {
        match self.pending_filter.take() {
            Some((text, _)) => {
                self.set_filter(&text);
                true
            }
            None => false,
        }
    }

    pub fn has_pending_filter(&self) -> bool {
        self.pending_filter.is_some()
    }

    /// Applies a filter immediately, bypassing the debounce.
    pub fn set_filter(&mut self, text: &str) {
        self.pending_filter = None;
        if self.filter != text {
            tracing::debug!("Applying table filter '{}'", text);
            self.filter = text.to_string();
            self.page_index = 0;
        }
    }

    /// Case-insensitive substring match against any searchable column.
    pub fn matches(&self, row: &T) -> bool {
        let needle = self.filter.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.columns
            .iter()
            .filter(|c| c.searchable)
            .any(|c| c.value(row).to_lowercase().contains(&needle))
    }

    pub fn sort(&self) -> Option<(&str, SortDirection)> {
        self.sort.as_ref().map(|(key, dir)| (key.as_str(), *dir))
    }

    /// Cycles ascending, descending, unsorted. Unknown or unsortable columns
    /// are ignored.
    pub fn toggle_sort(&mut self, key: &str) {
        if !self.columns.iter().any(|c| c.key == key && c.sortable) {
            return;
        }
        self.sort = match self.sort.take() {
            Some((current, SortDirection::Ascending)) if current == key => {
                Some((current, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == key => None,
            _ => Some((key.to_string(), SortDirection::Ascending)),
        };
    }

    /// Rows passing the filter, in sort order.
    pub fn filtered_rows(&self) -> Vec<&T> {
        let mut rows: Vec<&T> = self.rows.iter().filter(|r| self.matches(r)).collect();

        if let Some((key, direction)) = &self.sort {
            if let Some(column) = self.columns.iter().find(|c| &c.key == key) {
                rows.sort_by(|a, b| {
                    let ordering = compare_cells(&column.value(a), &column.value(b));
                    match direction {
                        SortDirection::Ascending => ordering,
                        SortDirection::Descending => ordering.reverse(),
                    }
                });
            }
        }
        rows
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Never less than one, so an empty table still shows "page 1 of 1".
    pub fn page_count(&self) -> usize {
        let total = self.filtered_rows().len();
        total.div_ceil(self.page_size).max(1)
    }

    pub fn set_page(&mut self, index: usize) {
        self.page_index = index;
        self.clamp_page();
    }

    pub fn next_page(&mut self) -> bool {
        let before = self.page_index;
        self.set_page(before + 1);
        self.page_index != before
    }

    pub fn previous_page(&mut self) -> bool {
        let before = self.page_index;
        self.set_page(before.saturating_sub(1));
        self.page_index != before
    }

    fn clamp_page(&mut self) {
        let last = self.page_count() - 1;
        if self.page_index > last {
            self.page_index = last;
        }
    }

    pub fn current_page_rows(&self) -> Vec<&T> {
        self.filtered_rows()
            .into_iter()
            .skip(self.page_index * self.page_size)
            .take(self.page_size)
            .collect()
    }

    pub fn toggle_selected(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Selects every row that passes the current filter.
    pub fn select_all_filtered(&mut self) {
        let ids: Vec<String> = self.filtered_rows().iter().map(|r| r.row_id()).collect();
        self.selected.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    fn render_detail(&self, row: &T) -> String {
        match &self.detail {
            Some(render) => render(row),
            None => self
                .columns
                .iter()
                .map(|c| format!("{}: {}", c.header, c.value(row)))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn view(&self) -> TableView {
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let colspan = self.columns.len();
        let filtered = self.filtered_rows();
        let total_filtered = filtered.len();
        let page_count = total_filtered.div_ceil(self.page_size).max(1);

        let rows = if self.loading {
            (0..self.placeholder_rows)
                .map(|_| ViewRow::Placeholder { cells: colspan })
                .collect()
        } else if filtered.is_empty() {
            vec![ViewRow::Empty {
                colspan,
                message: EMPTY_MESSAGE.to_string(),
            }]
        } else {
            let mut rows = Vec::new();
            for row in filtered
                .into_iter()
                .skip(self.page_index * self.page_size)
                .take(self.page_size)
            {
                let id = row.row_id();
                let expanded = self.is_expanded(&id);
                rows.push(ViewRow::Data {
                    cells: self.columns.iter().map(|c| c.value(row)).collect(),
                    selected: self.is_selected(&id),
                    expanded,
                    id: id.clone(),
                });
                if expanded {
                    rows.push(ViewRow::Detail {
                        id,
                        colspan,
                        content: self.render_detail(row),
                    });
                }
            }
            rows
        };

        TableView {
            headers,
            rows,
            page_index: self.page_index,
            page_count,
            total_filtered,
        }
    }
}

/// Numbers compare numerically, everything else case-insensitively.
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}
