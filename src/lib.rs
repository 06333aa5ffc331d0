//! Terminal widgets: a labeled text input and a sortable, selectable table

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod errors;
pub mod models;
pub mod traits;
pub mod ui;

pub use components::{DataTable, InputField};
pub use errors::TableError;
pub use models::{CellValue, Column, Record, RecordId, TableRow};
