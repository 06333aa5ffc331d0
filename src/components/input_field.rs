//! Labeled text input with optional clear button and password toggle

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::{traits::Component, ui::Styles};

const MASK_CHAR: char = '•';
const CLEAR_INDICATOR: &str = "✕";

/// Visual treatment of the field's frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldVariant {
    Filled,
    #[default]
    Outlined,
    Ghost,
}

/// Horizontal padding inside the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl FieldSize {
    fn padding(self) -> u16 {
        match self {
            FieldSize::Sm => 0,
            FieldSize::Md => 1,
            FieldSize::Lg => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Password,
}

/// What produced a [`ChangeEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    /// Typing or deleting characters
    Input,
    /// The clear action
    Clear,
}

/// Forwarded to the change handler after every value change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub value: String,
    pub source: ChangeSource,
}

/// The single message line shown below the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMessage<'a> {
    Helper(&'a str),
    Error(&'a str),
}

type ChangeHandler = Box<dyn FnMut(&ChangeEvent)>;

/// Text input component.
///
/// The field keeps its own copy of the value. A parent that wants to control
/// it can push a new value with [`InputField::set_value`] and listen through
/// [`InputField::on_change`]. Whether the field is invalid is decided by the
/// caller; the field only displays the outcome.
pub struct InputField {
    pub label: Option<String>,
    pub placeholder: String,
    pub helper_text: Option<String>,
    pub error_message: Option<String>,
    pub disabled: bool,
    pub invalid: bool,
    pub variant: FieldVariant,
    pub size: FieldSize,
    pub input_type: InputType,
    pub clearable: bool,
    value: String,
    /// Cursor position in chars, not bytes
    cursor_position: usize,
    show_password: bool,
    is_focused: bool,
    on_change: Option<ChangeHandler>,
}

impl Default for InputField {
    fn default() -> Self {
        Self {
            label: None,
            placeholder: String::new(),
            helper_text: None,
            error_message: None,
            disabled: false,
            invalid: false,
            variant: FieldVariant::default(),
            size: FieldSize::default(),
            input_type: InputType::default(),
            clearable: false,
            value: String::new(),
            cursor_position: 0,
            show_password: false,
            is_focused: false,
            on_change: None,
        }
    }
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self.cursor_position = value.chars().count();
        self
    }

    pub fn on_change(mut self, handler: impl FnMut(&ChangeEvent) + 'static) -> Self {
        self.on_change = Some(Box::new(handler));
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn helper_text(mut self, text: &str) -> Self {
        self.helper_text = Some(text.to_string());
        self
    }

    pub fn error_message(mut self, message: &str) -> Self {
        self.error_message = Some(message.to_string());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }

    pub fn variant(mut self, variant: FieldVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn size(mut self, size: FieldSize) -> Self {
        self.size = size;
        self
    }

    /// Password fields start out revealed, matching the toggle's first state
    pub fn input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self.show_password = input_type == InputType::Password;
        self
    }

    pub fn clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Overwrite the value from the outside without notifying the handler
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor_position = self.value.chars().count();
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// True when the value is currently rendered as mask characters
    pub fn is_masked(&self) -> bool {
        self.input_type == InputType::Password && !self.show_password
    }

    /// Whether the clear indicator is shown
    pub fn shows_clear_button(&self) -> bool {
        self.clearable && !self.value.is_empty()
    }

    /// Helper text when valid, error message when invalid, never both
    pub fn visible_message(&self) -> Option<FieldMessage<'_>> {
        if self.invalid {
            self.error_message.as_deref().map(FieldMessage::Error)
        } else {
            self.helper_text.as_deref().map(FieldMessage::Helper)
        }
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn emit(&mut self, source: ChangeSource) {
        if let Some(handler) = self.on_change.as_mut() {
            let event = ChangeEvent {
                value: self.value.clone(),
                source,
            };
            handler(&event);
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.value.insert(idx, c);
        self.cursor_position += 1;
        self.emit(ChangeSource::Input);
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let idx = self.byte_index();
            self.value.remove(idx);
            self.emit(ChangeSource::Input);
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            let idx = self.byte_index();
            self.value.remove(idx);
            self.emit(ChangeSource::Input);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.value.chars().count();
    }

    /// Reset the value to empty and tell the handler about it
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
        debug!(label = ?self.label, "input field cleared");
        self.emit(ChangeSource::Clear);
    }

    /// Swap between masked and plain rendering; the value is untouched
    pub fn toggle_visibility(&mut self) {
        if self.input_type == InputType::Password {
            self.show_password = !self.show_password;
        }
    }

    fn display_value(&self) -> String {
        if self.is_masked() {
            std::iter::repeat(MASK_CHAR)
                .take(self.value.chars().count())
                .collect()
        } else {
            self.value.clone()
        }
    }

    fn box_height(&self) -> u16 {
        match self.variant {
            FieldVariant::Ghost => 1,
            FieldVariant::Filled | FieldVariant::Outlined => 3,
        }
    }

    fn indicators(&self) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        if self.input_type == InputType::Password {
            let label = if self.show_password { "hide" } else { "show" };
            spans.push(Span::styled(label, Styles::info()));
        }
        if self.shows_clear_button() {
            if !spans.is_empty() {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(CLEAR_INDICATOR, Styles::inactive()));
        }
        spans
    }

    /// Render the field and its message line
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.box_height()),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);
        let input_area = chunks[0];
        let message_area = chunks[1];

        let border_style = if self.invalid {
            Styles::error()
        } else if self.is_focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let mut block = Block::default().padding(Padding::horizontal(self.size.padding()));
        block = match self.variant {
            FieldVariant::Filled => block
                .borders(Borders::ALL)
                .border_style(border_style)
                .style(Styles::filled()),
            FieldVariant::Outlined => block.borders(Borders::ALL).border_style(border_style),
            FieldVariant::Ghost => block.borders(Borders::NONE),
        };
        if self.variant != FieldVariant::Ghost {
            if let Some(ref label) = self.label {
                block = block.title(label.as_str());
            }
        }
        if self.disabled {
            block = block.style(Styles::disabled());
        }

        let inner = block.inner(input_area);
        f.render_widget(block, input_area);

        let indicators = Line::from(self.indicators());
        let indicator_width = match indicators.width() {
            0 => 0,
            w => w + 1,
        };
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(u16::try_from(indicator_width).unwrap_or(u16::MAX)),
            ])
            .split(inner);
        let text_area = columns[0];
        let indicator_area = columns[1];

        let mut spans = Vec::new();
        let mut prefix_width = 0;
        if self.variant == FieldVariant::Ghost {
            if let Some(ref label) = self.label {
                let prefix = format!("{}: ", label);
                prefix_width = prefix.width();
                spans.push(Span::styled(prefix, Styles::title()));
            }
        }

        let display = self.display_value();
        let before_cursor: String = display.chars().take(self.cursor_position).collect();
        let cursor_offset = prefix_width + before_cursor.width();
        let visible = usize::from(text_area.width);
        // Scroll just far enough that the cursor cell stays inside the box
        let scroll = if self.is_focused && visible > 0 && cursor_offset >= visible {
            cursor_offset + 1 - visible
        } else {
            0
        };

        if self.value.is_empty() && !self.placeholder.is_empty() {
            spans.push(Span::styled(self.placeholder.clone(), Styles::inactive()));
        } else {
            let style = if self.disabled {
                Styles::disabled()
            } else {
                Styles::default()
            };
            spans.push(Span::styled(display, style));
        }

        f.render_widget(
            Paragraph::new(Line::from(spans)).scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX))),
            text_area,
        );

        if indicator_width > 0 {
            f.render_widget(
                Paragraph::new(indicators).alignment(Alignment::Right),
                indicator_area,
            );
        }

        if let Some(message) = self.visible_message() {
            let (text, style) = match message {
                FieldMessage::Helper(text) => (text, Styles::inactive()),
                FieldMessage::Error(text) => (text, Styles::error()),
            };
            let indent = if self.variant == FieldVariant::Ghost { 0 } else { 1 };
            let message_area = Rect {
                x: message_area.x + indent,
                width: message_area.width.saturating_sub(indent),
                ..message_area
            };
            f.render_widget(Paragraph::new(text.to_string()).style(style), message_area);
        }

        if self.is_focused && !self.disabled && text_area.width > 0 && text_area.height > 0 {
            if let Ok(column) = u16::try_from(cursor_offset - scroll) {
                if column < text_area.width {
                    f.set_cursor(text_area.x + column, text_area.y);
                }
            }
        }
    }
}

impl Component for InputField {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        self.render(f, area);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if self.disabled {
            return false;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl && self.clearable => {
                self.clear();
                true
            }
            KeyCode::Char('r') if ctrl && self.input_type == InputType::Password => {
                self.toggle_visibility();
                true
            }
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.insert_char(c);
                true
            }
            KeyCode::Backspace => {
                self.delete_char();
                true
            }
            KeyCode::Delete => {
                self.delete_char_forward();
                true
            }
            KeyCode::Left => {
                self.move_cursor_left();
                true
            }
            KeyCode::Right => {
                self.move_cursor_right();
                true
            }
            KeyCode::Home => {
                self.move_cursor_to_start();
                true
            }
            KeyCode::End => {
                self.move_cursor_to_end();
                true
            }
            _ => false,
        }
    }

    fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    fn is_focused(&self) -> bool {
        self.is_focused
    }

    fn preferred_height(&self) -> u16 {
        self.box_height() + 1
    }
}
