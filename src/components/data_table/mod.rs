//! Data table component with per-column sorting and per-row selection
//!
//! The table owns two pieces of local state: the active [`SortConfig`] and the
//! [`Selection`] of checked rows. Rows are never reordered in place; the
//! display order is a memoized list of indices into the caller's data.

pub mod selection;
pub mod sort;

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthStr;

use crate::{
    errors::TableError,
    models::{Column, TableRow},
    traits::{Component, Navigable},
    ui::{centered_rect, Styles},
};

pub use selection::Selection;
pub use sort::{sorted_order, SortConfig, SortDirection};
use sort::SortCache;

pub const LOADING_TEXT: &str = "Loading...";
pub const EMPTY_TEXT: &str = "No data available";
const CHECKED: &str = "[x]";
const UNCHECKED: &str = "[ ]";

/// Which of the three render branches applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableView {
    Loading,
    Empty,
    Ready,
}

impl TableView {
    /// Loading wins over everything, then emptiness
    pub fn of(loading: bool, len: usize) -> Self {
        if loading {
            TableView::Loading
        } else if len == 0 {
            TableView::Empty
        } else {
            TableView::Ready
        }
    }
}

type SelectHandler<R> = Box<dyn FnMut(&[&R])>;

/// Sortable, selectable table over caller-supplied rows
pub struct DataTable<R: TableRow> {
    data: Vec<R>,
    columns: Vec<Column>,
    loading: bool,
    selectable: bool,
    title: String,
    sort: Option<SortConfig>,
    selection: Selection<R::Id>,
    /// Row id to position in `data`; first row wins on duplicates
    index: HashMap<R::Id, usize>,
    /// Bumped whenever `data` is replaced, keys the sort cache
    generation: u64,
    cache: SortCache,
    /// Cursor row, as a position in display order
    state: TableState,
    focused_column: usize,
    is_focused: bool,
    on_row_select: Option<SelectHandler<R>>,
}

impl<R: TableRow> DataTable<R> {
    pub fn new(data: Vec<R>, columns: Vec<Column>) -> Self {
        let index = build_index(&data);
        let mut state = TableState::default();
        if !data.is_empty() {
            state.select(Some(0));
        }

        Self {
            data,
            columns,
            loading: false,
            selectable: false,
            title: "Data".to_string(),
            sort: None,
            selection: Selection::new(),
            index,
            generation: 0,
            cache: SortCache::default(),
            state,
            focused_column: 0,
            is_focused: false,
            on_row_select: None,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Called with the full selection, in the order rows were checked, after
    /// every change to it
    pub fn on_row_select(mut self, handler: impl FnMut(&[&R]) + 'static) -> Self {
        self.on_row_select = Some(Box::new(handler));
        self
    }

    /// Replace the rows. Sort config is kept; selected ids that no longer
    /// exist are dropped and the handler is told if that changed anything.
    pub fn set_data(&mut self, data: Vec<R>) {
        self.data = data;
        self.index = build_index(&self.data);
        self.generation += 1;
        debug!(rows = self.data.len(), generation = self.generation, "table data replaced");

        let index = &self.index;
        if self.selection.retain(|id| index.contains_key(id)) {
            self.notify_selection();
        }

        let len = self.data.len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    /// Rows in input order, exactly as supplied
    pub fn data(&self) -> &[R] {
        &self.data
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn sort_config(&self) -> Option<&SortConfig> {
        self.sort.as_ref()
    }

    pub fn view(&self) -> TableView {
        TableView::of(self.loading, self.data.len())
    }

    pub fn focused_column(&self) -> usize {
        self.focused_column
    }

    /// Header click on the column with `column_key`.
    ///
    /// Returns `Ok(false)` for columns that are not sortable, which leaves the
    /// sort untouched. The cursor stays on the same row across the re-sort.
    pub fn toggle_sort(&mut self, column_key: &str) -> Result<bool, TableError> {
        let column = self
            .columns
            .iter()
            .find(|c| c.key == column_key)
            .ok_or_else(|| TableError::UnknownColumn(column_key.to_string()))?;
        if !column.sortable {
            return Ok(false);
        }
        let field = column.field.clone();

        let cursor_row = self.cursor_row_index();
        let next = SortConfig::next(self.sort.as_ref(), &field);
        debug!(field = %next.field, direction = next.direction.as_str(), "sort changed");
        self.sort = Some(next);

        if let Some(row) = cursor_row {
            let position = self.display_order().iter().position(|&i| i == row);
            self.state.select(position);
        }
        Ok(true)
    }

    /// Indices into [`DataTable::data`] in display order
    pub fn display_order(&mut self) -> Vec<usize> {
        self.cache
            .order(self.generation, &self.data, self.sort.as_ref())
            .to_vec()
    }

    /// Rows in display order
    pub fn display_rows(&mut self) -> Vec<&R> {
        let order = self.cache.order(self.generation, &self.data, self.sort.as_ref());
        order.iter().map(|&i| &self.data[i]).collect()
    }

    /// Check the row if unchecked, uncheck it otherwise, then hand the whole
    /// selection to the handler. Returns whether the row is now selected.
    pub fn toggle_row(&mut self, id: &R::Id) -> Result<bool, TableError> {
        if !self.index.contains_key(id) {
            return Err(TableError::UnknownRow(format!("{:?}", id)));
        }
        let selected = self.selection.toggle(id.clone());
        debug!(row = ?id, selected, "row toggled");
        self.notify_selection();
        Ok(selected)
    }

    /// Toggle the row under the cursor, if any
    pub fn toggle_cursor_row(&mut self) -> Result<Option<bool>, TableError> {
        let Some(row) = self.cursor_row_index() else {
            return Ok(None);
        };
        let id = self.data[row].id();
        self.toggle_row(&id).map(Some)
    }

    pub fn is_selected(&self, id: &R::Id) -> bool {
        self.selection.contains(id)
    }

    pub fn selection(&self) -> &Selection<R::Id> {
        &self.selection
    }

    /// Selected rows in the order they were checked
    pub fn selected_rows(&self) -> Vec<&R> {
        self.selection
            .iter()
            .filter_map(|id| self.index.get(id))
            .map(|&i| &self.data[i])
            .collect()
    }

    fn notify_selection(&mut self) {
        let rows: Vec<&R> = self
            .selection
            .iter()
            .filter_map(|id| self.index.get(id))
            .map(|&i| &self.data[i])
            .collect();
        info!(selected = rows.len(), "row selection changed");
        if let Some(handler) = self.on_row_select.as_mut() {
            handler(&rows);
        }
    }

    /// Position in `data` of the row under the cursor
    fn cursor_row_index(&mut self) -> Option<usize> {
        let position = self.state.selected()?;
        self.display_order().get(position).copied()
    }

    pub fn focus_next_column(&mut self) {
        if !self.columns.is_empty() {
            self.focused_column = (self.focused_column + 1) % self.columns.len();
        }
    }

    pub fn focus_previous_column(&mut self) {
        if !self.columns.is_empty() {
            self.focused_column = if self.focused_column == 0 {
                self.columns.len() - 1
            } else {
                self.focused_column - 1
            };
        }
    }

    /// Header click on the column that has keyboard focus
    pub fn sort_focused_column(&mut self) -> Result<bool, TableError> {
        match self.columns.get(self.focused_column) {
            Some(column) => {
                let key = column.key.clone();
                self.toggle_sort(&key)
            }
            None => Ok(false),
        }
    }

    fn sort_column_at(&mut self, position: usize) -> bool {
        let Some(column) = self.columns.get(position) else {
            return false;
        };
        let key = column.key.clone();
        self.focused_column = position;
        match self.toggle_sort(&key) {
            Ok(_) => true,
            Err(e) => {
                warn!("Sort failed: {}", e);
                false
            }
        }
    }

    fn header_label(&self, column: &Column) -> String {
        match &self.sort {
            Some(sort) if sort.field == column.field => {
                format!("{} {}", column.title, sort.direction.indicator())
            }
            _ => column.title.clone(),
        }
    }

    fn cell_text(row: &R, column: &Column) -> String {
        row.field(&column.field)
            .map(|value| value.to_string())
            .unwrap_or_default()
    }

    fn block_title(&self) -> String {
        let rows = self.data.len();
        if self.selectable {
            format!("{} ({} rows, {} selected)", self.title, rows, self.selection.len())
        } else {
            format!("{} ({} rows)", self.title, rows)
        }
    }

    /// Header labels and cell texts in display order, including the checkbox
    /// column when selectable
    fn text_grid(&mut self) -> (Vec<String>, Vec<Vec<String>>) {
        let order = self.display_order();
        let mut header = Vec::with_capacity(self.columns.len() + 1);
        if self.selectable {
            header.push(String::new());
        }
        header.extend(self.columns.iter().map(|c| self.header_label(c)));

        let body = order
            .iter()
            .map(|&i| {
                let row = &self.data[i];
                let mut cells = Vec::with_capacity(header.len());
                if self.selectable {
                    let mark = if self.selection.contains(&row.id()) { CHECKED } else { UNCHECKED };
                    cells.push(mark.to_string());
                }
                cells.extend(self.columns.iter().map(|c| Self::cell_text(row, c)));
                cells
            })
            .collect();

        (header, body)
    }

    /// Render the table
    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(self.block_title())
            .borders(Borders::ALL)
            .border_style(if self.is_focused {
                Styles::active_border()
            } else {
                Styles::inactive_border()
            });

        match self.view() {
            TableView::Loading => render_placeholder(f, area, block, LOADING_TEXT),
            TableView::Empty => render_placeholder(f, area, block, EMPTY_TEXT),
            TableView::Ready => self.render_rows(f, area, block),
        }
    }

    fn render_rows(&mut self, f: &mut Frame, area: Rect, block: Block) {
        let (header, body) = self.text_grid();
        let widths = column_widths(&header, &body);
        let offset = usize::from(self.selectable);

        let header_cells = header.into_iter().enumerate().map(|(i, label)| {
            let style = if self.is_focused && i >= offset && i - offset == self.focused_column {
                Styles::focused_header()
            } else {
                Styles::title()
            };
            Cell::from(label).style(style)
        });
        let header_row = Row::new(header_cells).bottom_margin(1);

        let rows = body
            .into_iter()
            .map(|cells| Row::new(cells.into_iter().map(Cell::from)));

        let constraints: Vec<Constraint> = widths
            .iter()
            .map(|&w| Constraint::Min(u16::try_from(w).unwrap_or(u16::MAX)))
            .collect();

        let highlight = if self.is_focused {
            Styles::selected()
        } else {
            Style::default()
        };

        let table = Table::new(rows, constraints)
            .header(header_row)
            .block(block)
            .highlight_style(highlight);

        f.render_stateful_widget(table, area, &mut self.state);
    }

    /// Plain-text rendition of the current view, one string per line
    pub fn render_plain(&mut self) -> Vec<String> {
        match self.view() {
            TableView::Loading => return vec![LOADING_TEXT.to_string()],
            TableView::Empty => return vec![EMPTY_TEXT.to_string()],
            TableView::Ready => {}
        }

        let (header, body) = self.text_grid();
        let widths = column_widths(&header, &body);

        let mut lines = Vec::with_capacity(body.len() + 2);
        lines.push(join_padded(&header, &widths));
        lines.push(
            widths
                .iter()
                .map(|&w| "-".repeat(w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        lines.extend(body.iter().map(|cells| join_padded(cells, &widths)));
        lines
    }
}

impl<R: TableRow> Navigable for DataTable<R> {
    fn navigate_up(&mut self) {
        let count = self.get_item_count();
        if count == 0 {
            return;
        }
        let selected = self.state.selected().unwrap_or(0);
        let new_selected = if selected == 0 { count - 1 } else { selected - 1 };
        self.state.select(Some(new_selected));
    }

    fn navigate_down(&mut self) {
        let count = self.get_item_count();
        if count == 0 {
            return;
        }
        let selected = self.state.selected().unwrap_or(0);
        self.state.select(Some((selected + 1) % count));
    }

    fn get_selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.state.select(index);
    }

    fn get_item_count(&self) -> usize {
        match self.view() {
            TableView::Ready => self.data.len(),
            TableView::Loading | TableView::Empty => 0,
        }
    }
}

impl<R: TableRow> Component for DataTable<R> {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        self.render(f, area);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if self.view() != TableView::Ready {
            return false;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.navigate_up(),
            KeyCode::Down | KeyCode::Char('j') => self.navigate_down(),
            KeyCode::Home | KeyCode::Char('g') => self.navigate_to_first(),
            KeyCode::End | KeyCode::Char('G') => self.navigate_to_last(),
            KeyCode::Left | KeyCode::Char('h') => self.focus_previous_column(),
            KeyCode::Right | KeyCode::Char('l') => self.focus_next_column(),
            KeyCode::Enter | KeyCode::Char('s') => {
                if let Err(e) = self.sort_focused_column() {
                    warn!("Sort failed: {}", e);
                }
            }
            KeyCode::Char(' ') if self.selectable => {
                if let Err(e) = self.toggle_cursor_row() {
                    warn!("Row toggle failed: {}", e);
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                let position = c as usize - '1' as usize;
                return self.sort_column_at(position);
            }
            _ => return false,
        }
        true
    }

    fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    fn is_focused(&self) -> bool {
        self.is_focused
    }

    fn preferred_height(&self) -> u16 {
        match self.view() {
            // borders + placeholder line
            TableView::Loading | TableView::Empty => 3,
            // borders + header + header margin + rows
            TableView::Ready => u16::try_from(self.data.len())
                .unwrap_or(u16::MAX)
                .saturating_add(4),
        }
    }
}

fn build_index<R: TableRow>(data: &[R]) -> HashMap<R::Id, usize> {
    let mut index = HashMap::with_capacity(data.len());
    for (i, row) in data.iter().enumerate() {
        let id = row.id();
        if index.contains_key(&id) {
            warn!(row = ?id, position = i, "duplicate row id; keeping the first occurrence");
            continue;
        }
        index.insert(id, i);
    }
    index
}

fn render_placeholder(f: &mut Frame, area: Rect, block: Block, text: &str) {
    let inner = block.inner(area);
    f.render_widget(block, area);
    let line_area = centered_rect(inner.width, 1, inner);
    let paragraph = Paragraph::new(Line::from(text.to_string()))
        .style(Styles::inactive())
        .alignment(Alignment::Center);
    f.render_widget(paragraph, line_area);
}

/// Display width of the widest cell in each column, header included
fn column_widths(header: &[String], body: &[Vec<String>]) -> Vec<usize> {
    header
        .iter()
        .enumerate()
        .map(|(col, label)| {
            body.iter()
                .filter_map(|cells| cells.get(col))
                .map(|cell| cell.width())
                .chain(std::iter::once(label.width()))
                .max()
                .unwrap_or(0)
        })
        .collect()
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| {
            let pad = width.saturating_sub(cell.width());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ");
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use std::{cell::RefCell, rc::Rc};

    #[derive(Debug, Clone, PartialEq)]
    struct User {
        id: u32,
        name: &'static str,
        email: &'static str,
    }

    impl TableRow for User {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }

        fn field(&self, name: &str) -> Option<CellValue> {
            match name {
                "id" => Some(self.id.into()),
                "name" => Some(self.name.into()),
                "email" => Some(self.email.into()),
                _ => None,
            }
        }
    }

    fn users() -> Vec<User> {
        vec![
            User { id: 1, name: "John Doe", email: "john@example.com" },
            User { id: 2, name: "Jane Smith", email: "jane@example.com" },
        ]
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name", "name").sortable(),
            Column::new("email", "Email", "email"),
        ]
    }

    fn names(table: &mut DataTable<User>) -> Vec<&'static str> {
        table.display_rows().iter().map(|u| u.name).collect()
    }

    fn recording_table(data: Vec<User>) -> (DataTable<User>, Rc<RefCell<Vec<Vec<u32>>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let table = DataTable::new(data, columns())
            .selectable(true)
            .on_row_select(move |rows: &[&User]| {
                sink.borrow_mut().push(rows.iter().map(|r| r.id).collect());
            });
        (table, calls)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn buffer_lines(buffer: &Buffer) -> Vec<String> {
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer.get(x, y).symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn render_lines(table: &mut DataTable<User>, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                table.render(f, area)
            })
            .unwrap();
        buffer_lines(terminal.backend().buffer())
    }

    #[test]
    fn test_view_state_branches() {
        assert_eq!(TableView::of(true, 5), TableView::Loading);
        assert_eq!(TableView::of(true, 0), TableView::Loading);
        assert_eq!(TableView::of(false, 0), TableView::Empty);
        assert_eq!(TableView::of(false, 2), TableView::Ready);
    }

    #[test]
    fn test_name_header_sorts_asc_then_desc() {
        let mut table = DataTable::new(users(), columns());
        assert_eq!(names(&mut table), vec!["John Doe", "Jane Smith"]);

        assert!(table.toggle_sort("name").unwrap());
        assert_eq!(names(&mut table), vec!["Jane Smith", "John Doe"]);

        assert!(table.toggle_sort("name").unwrap());
        assert_eq!(names(&mut table), vec!["John Doe", "Jane Smith"]);
        assert_eq!(table.sort_config().unwrap().direction, SortDirection::Descending);
    }

    #[test]
    fn test_three_clicks_return_to_ascending() {
        let mut table = DataTable::new(users(), columns());
        for _ in 0..3 {
            table.toggle_sort("name").unwrap();
        }
        assert_eq!(table.sort_config(), Some(&SortConfig::ascending("name")));
    }

    #[test]
    fn test_non_sortable_header_is_ignored() {
        let mut table = DataTable::new(users(), columns());
        assert!(!table.toggle_sort("email").unwrap());
        assert_eq!(table.sort_config(), None);
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let mut table = DataTable::new(users(), columns());
        let err = table.toggle_sort("phone").unwrap_err();
        assert!(matches!(err, TableError::UnknownColumn(ref key) if key == "phone"));
    }

    #[test]
    fn test_sorting_keeps_input_data_order() {
        let mut table = DataTable::new(users(), columns());
        table.toggle_sort("name").unwrap();
        let _ = table.display_rows();
        assert_eq!(table.data(), users().as_slice());
    }

    #[test]
    fn test_selection_callback_gets_full_selection_in_check_order() {
        let (mut table, calls) = recording_table(users());

        assert!(table.toggle_row(&2).unwrap());
        assert!(table.toggle_row(&1).unwrap());
        assert!(!table.toggle_row(&2).unwrap());
        assert!(table.toggle_row(&2).unwrap());

        assert_eq!(
            *calls.borrow(),
            vec![vec![2], vec![2, 1], vec![1], vec![1, 2]]
        );
        let selected: Vec<u32> = table.selected_rows().iter().map(|u| u.id).collect();
        assert_eq!(selected, vec![1, 2]);
    }

    #[test]
    fn test_selection_order_ignores_display_order() {
        let (mut table, calls) = recording_table(users());
        table.toggle_sort("name").unwrap();
        table.toggle_row(&1).unwrap();
        table.toggle_row(&2).unwrap();
        assert_eq!(calls.borrow().last().unwrap(), &vec![1, 2]);
    }

    #[test]
    fn test_double_toggle_restores_selection() {
        let (mut table, calls) = recording_table(users());
        table.toggle_row(&1).unwrap();
        table.toggle_row(&2).unwrap();
        table.toggle_row(&2).unwrap();
        assert!(table.is_selected(&1));
        assert!(!table.is_selected(&2));
        assert_eq!(calls.borrow().last().unwrap(), &vec![1]);
    }

    #[test]
    fn test_toggle_unknown_row_is_an_error() {
        let (mut table, calls) = recording_table(users());
        assert!(matches!(table.toggle_row(&99), Err(TableError::UnknownRow(_))));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_set_data_prunes_missing_selection() {
        let (mut table, calls) = recording_table(users());
        table.toggle_row(&1).unwrap();
        table.toggle_row(&2).unwrap();

        table.set_data(vec![User { id: 2, name: "Jane Smith", email: "jane@example.com" }]);
        assert_eq!(calls.borrow().last().unwrap(), &vec![2]);
        assert_eq!(calls.borrow().len(), 3);

        // nothing pruned, no extra notification
        table.set_data(users());
        assert_eq!(calls.borrow().len(), 3);
    }

    #[test]
    fn test_set_data_keeps_sort_and_invalidates_cache() {
        let mut table = DataTable::new(users(), columns());
        table.toggle_sort("name").unwrap();
        assert_eq!(names(&mut table), vec!["Jane Smith", "John Doe"]);

        let mut more = users();
        more.push(User { id: 3, name: "Adam Ant", email: "adam@example.com" });
        table.set_data(more);
        assert_eq!(names(&mut table), vec!["Adam Ant", "Jane Smith", "John Doe"]);
    }

    #[test]
    fn test_duplicate_ids_keep_first_row() {
        let mut data = users();
        data.push(User { id: 1, name: "Impostor", email: "x@example.com" });
        let (mut table, calls) = recording_table(data);
        table.toggle_row(&1).unwrap();
        assert_eq!(table.selected_rows()[0].name, "John Doe");
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_keyboard_sort_and_toggle() {
        let (mut table, calls) = recording_table(users());

        assert!(table.handle_key_event(key(KeyCode::Enter)));
        assert_eq!(names(&mut table), vec!["Jane Smith", "John Doe"]);

        // cursor followed John Doe to the second position
        assert_eq!(table.get_selected_index(), Some(1));
        assert!(table.handle_key_event(key(KeyCode::Char(' '))));
        assert_eq!(calls.borrow().last().unwrap(), &vec![1]);

        table.handle_key_event(key(KeyCode::Up));
        table.handle_key_event(key(KeyCode::Char(' ')));
        assert_eq!(calls.borrow().last().unwrap(), &vec![1, 2]);
    }

    #[test]
    fn test_keyboard_column_focus_and_digit_sort() {
        let mut table = DataTable::new(users(), columns());
        table.handle_key_event(key(KeyCode::Right));
        assert_eq!(table.focused_column(), 1);
        table.handle_key_event(key(KeyCode::Enter));
        assert_eq!(table.sort_config(), None);

        assert!(table.handle_key_event(key(KeyCode::Char('1'))));
        assert_eq!(table.focused_column(), 0);
        assert_eq!(table.sort_config(), Some(&SortConfig::ascending("name")));
        assert!(!table.handle_key_event(key(KeyCode::Char('9'))));
    }

    #[test]
    fn test_space_ignored_when_not_selectable() {
        let mut table = DataTable::new(users(), columns());
        assert!(!table.handle_key_event(key(KeyCode::Char(' '))));
        assert!(table.selection().is_empty());
    }

    #[test]
    fn test_loading_renders_no_rows() {
        let mut table = DataTable::new(users(), columns()).loading(true);
        assert_eq!(table.render_plain(), vec![LOADING_TEXT]);
        assert!(!table.handle_key_event(key(KeyCode::Down)));

        let lines = render_lines(&mut table, 40, 6);
        assert!(lines.iter().any(|l| l.contains(LOADING_TEXT)));
        assert!(!lines.iter().any(|l| l.contains("John Doe")));
    }

    #[test]
    fn test_empty_data_renders_placeholder() {
        let mut table = DataTable::<User>::new(Vec::new(), columns());
        assert_eq!(table.view(), TableView::Empty);
        assert_eq!(table.render_plain(), vec![EMPTY_TEXT]);

        let lines = render_lines(&mut table, 40, 5);
        assert!(lines.iter().any(|l| l.contains(EMPTY_TEXT)));
        assert!(!lines.iter().any(|l| l.contains("Name")));
    }

    #[test]
    fn test_plain_rendering_with_checkboxes_and_indicator() {
        let (mut table, _) = recording_table(users());
        table.toggle_sort("name").unwrap();
        table.toggle_row(&1).unwrap();

        let lines = table.render_plain();
        assert_eq!(lines[0], "    | Name ▲     | Email");
        assert_eq!(lines[2], "[ ] | Jane Smith | jane@example.com");
        assert_eq!(lines[3], "[x] | John Doe   | john@example.com");
    }

    #[test]
    fn test_render_ready_table() {
        let (mut table, _) = recording_table(users());
        table.toggle_sort("name").unwrap();
        table.toggle_sort("name").unwrap();
        table.toggle_row(&2).unwrap();

        let lines = render_lines(&mut table, 60, 7);
        assert!(lines[0].contains("2 rows, 1 selected"));
        assert!(lines[1].contains("Name ▼"));
        assert!(lines[1].contains("Email"));
        let john = lines.iter().position(|l| l.contains("John Doe")).unwrap();
        let jane = lines.iter().position(|l| l.contains("Jane Smith")).unwrap();
        assert!(john < jane);
        assert!(lines[jane].contains(CHECKED));
        assert!(lines[john].contains(UNCHECKED));
    }

    #[test]
    fn test_preferred_height_saturates_for_huge_tables() {
        let data: Vec<User> = (0..70_000)
            .map(|id| User { id, name: "n", email: "e" })
            .collect();
        let table = DataTable::new(data, columns());
        assert_eq!(table.preferred_height(), u16::MAX);

        let table = DataTable::new(users(), columns());
        assert_eq!(table.preferred_height(), 6);
    }
}
