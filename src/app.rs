//! Showcase application composing the input fields and the data table

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::{cell::RefCell, rc::Rc};
use tracing::{debug, info};

use crate::{
    components::{DataTable, FieldVariant, InputField, InputType},
    models::{Column, Record, RecordId, TableRow},
    traits::Component,
    ui::Styles,
};

const HELP_TEXT: &str =
    "Tab focus | Space select | Enter/1-9 sort | ^U clear | ^R reveal | F5 loading | Esc quit";

/// The two users the showcase starts with
pub fn sample_users() -> Vec<Record> {
    vec![
        Record::new(RecordId::Number(1))
            .with_field("name", "John Doe")
            .with_field("email", "john@example.com"),
        Record::new(RecordId::Number(2))
            .with_field("name", "Jane Smith")
            .with_field("email", "jane@example.com"),
    ]
}

/// Name is sortable, email is not
pub fn sample_columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name", "name").sortable(),
        Column::new("email", "Email", "email"),
    ]
}

/// One column per field of the first record
pub fn columns_for(records: &[Record]) -> Vec<Column> {
    records
        .first()
        .map(|record| record.field_names().map(Column::for_field).collect())
        .unwrap_or_default()
}

/// Which component receives key input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Username,
    Password,
    Table,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Username => Focus::Password,
            Focus::Password => Focus::Table,
            Focus::Table => Focus::Username,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Username => Focus::Table,
            Focus::Password => Focus::Username,
            Focus::Table => Focus::Password,
        }
    }
}

/// Main showcase state
pub struct App {
    pub username: InputField,
    pub password: InputField,
    pub table: DataTable<Record>,
    pub should_quit: bool,
    focus: Focus,
    /// Written by the table's selection handler
    selection_status: Rc<RefCell<Option<String>>>,
}

impl App {
    pub fn new(records: Vec<Record>, columns: Vec<Column>, selectable: bool, loading: bool) -> Self {
        let selection_status = Rc::new(RefCell::new(None));
        let status = Rc::clone(&selection_status);

        let table = DataTable::new(records, columns)
            .title("Users")
            .selectable(selectable)
            .loading(loading)
            .on_row_select(move |rows: &[&Record]| {
                let ids: Vec<String> = rows.iter().map(|r| r.id().to_string()).collect();
                info!("Selected: {:?}", ids);
                *status.borrow_mut() = Some(if ids.is_empty() {
                    "Nothing selected".to_string()
                } else {
                    format!("Selected ids: {}", ids.join(", "))
                });
            });

        let username = InputField::new()
            .label("Username")
            .placeholder("Enter name")
            .helper_text("Letters and digits only")
            .error_message("Username may only contain letters and digits")
            .clearable(true)
            .on_change(|e| debug!(value = %e.value, source = ?e.source, "username changed"));

        let password = InputField::new()
            .label("Password")
            .placeholder("Enter password")
            .input_type(InputType::Password)
            .variant(FieldVariant::Filled)
            .clearable(true);

        let mut app = Self {
            username,
            password,
            table,
            should_quit: false,
            focus: Focus::Username,
            selection_status,
        };
        app.update_focus();
        app
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selection_status(&self) -> Option<String> {
        self.selection_status.borrow().clone()
    }

    fn update_focus(&mut self) {
        self.username.set_focus(self.focus == Focus::Username);
        self.password.set_focus(self.focus == Focus::Password);
        self.table.set_focus(self.focus == Focus::Table);
    }

    fn focused_component(&mut self) -> &mut dyn Component {
        match self.focus {
            Focus::Username => &mut self.username,
            Focus::Password => &mut self.password,
            Focus::Table => &mut self.table,
        }
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.draw(f))?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }
        Ok(())
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') if self.focus == Focus::Table => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                self.update_focus();
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                self.update_focus();
                return;
            }
            KeyCode::F(5) => {
                let loading = !self.table.is_loading();
                self.table.set_loading(loading);
                info!(loading, "table loading toggled");
                return;
            }
            _ => {}
        }

        if !self.focused_component().handle_key_event(key) {
            debug!(?key, "unhandled key");
        }

        // Validity is the parent's call; the field only shows it.
        let name = self.username.value();
        self.username.invalid = !name.chars().all(char::is_alphanumeric);
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.username.preferred_height()),
                Constraint::Length(self.password.preferred_height()),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(f.size());

        self.username.draw(f, chunks[0]);
        self.password.draw(f, chunks[1]);
        self.table.draw(f, chunks[2]);

        let mut spans = vec![Span::styled(HELP_TEXT, Styles::info())];
        if let Some(status) = self.selection_status() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(status, Styles::success()));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), chunks[3]);
    }
}
