//! Core traits shared by the widgets
//!
//! These give the showcase app one way to draw, focus and feed keys to any
//! component, and give list-like components a common cursor API.

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// A focusable widget that owns its own state
pub trait Component {
    /// Draw the component into `area`
    fn draw(&mut self, f: &mut Frame, area: Rect);

    /// Handle a key press, returning `true` if the component consumed it
    fn handle_key_event(&mut self, key: KeyEvent) -> bool;

    fn set_focus(&mut self, focused: bool);

    fn is_focused(&self) -> bool;

    /// Rows the component wants when laid out in a vertical stack
    fn preferred_height(&self) -> u16;
}

/// Trait for components with a movable row cursor
pub trait Navigable {
    /// Move selection up
    fn navigate_up(&mut self);

    /// Move selection down
    fn navigate_down(&mut self);

    /// Get currently selected index
    fn get_selected_index(&self) -> Option<usize>;

    /// Set selected index
    fn set_selected_index(&mut self, index: Option<usize>);

    /// Get total number of items
    fn get_item_count(&self) -> usize;

    /// Navigate to first item
    fn navigate_to_first(&mut self) {
        if self.get_item_count() > 0 {
            self.set_selected_index(Some(0));
        }
    }

    /// Navigate to last item
    fn navigate_to_last(&mut self) {
        let count = self.get_item_count();
        if count > 0 {
            self.set_selected_index(Some(count - 1));
        }
    }
}
