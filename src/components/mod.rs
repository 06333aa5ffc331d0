//! Reusable widgets
//!
//! Each component owns its local state, draws itself into a ratatui frame and
//! reacts to key events through [`Component`](crate::traits::Component).

pub mod data_table;
pub mod input_field;

pub use data_table::{DataTable, SortConfig, SortDirection, TableView};
pub use input_field::{ChangeEvent, ChangeSource, FieldSize, FieldVariant, InputField, InputType};
