use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::models::Column;

#[derive(Parser, Debug)]
#[command(name = "fieldgrid")]
#[command(about = "Showcase for the fieldgrid input field and data table widgets")]
#[command(version)]
pub struct Cli {
    /// JSON file holding an array of row objects, each with an `id`
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Field to show as a column, repeat for more columns (in display order)
    #[arg(long = "column", value_name = "FIELD")]
    pub columns: Vec<String>,

    /// Column key that responds to sort clicks, may be repeated
    #[arg(long, value_name = "KEY")]
    pub sortable: Vec<String>,

    /// Make every column sortable
    #[arg(long)]
    pub all_sortable: bool,

    /// Click this column header once; repeat the same key to flip direction
    #[arg(long, value_name = "KEY")]
    pub sort: Vec<String>,

    /// Hide the checkbox column
    #[arg(long)]
    pub no_select: bool,

    /// Start the table in its loading state
    #[arg(long)]
    pub loading: bool,

    /// Print the table once and exit instead of starting the TUI
    #[arg(long)]
    pub cli: bool,
}

impl Cli {
    /// Let command line flags override environment configuration
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref data) = self.data {
            config.data_path = Some(data.clone());
        }
        if self.no_select {
            config.selectable = false;
        }
    }

    /// Columns named with `--column`, or `fallback` when none were given,
    /// with `--sortable` / `--all-sortable` applied on top
    pub fn resolve_columns(&self, fallback: Vec<Column>) -> Vec<Column> {
        let columns = if self.columns.is_empty() {
            fallback
        } else {
            self.columns.iter().map(|field| Column::for_field(field)).collect()
        };

        columns
            .into_iter()
            .map(|column| {
                let sortable = column.sortable
                    || self.all_sortable
                    || self.sortable.iter().any(|key| *key == column.key);
                column.with_sortable(sortable)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "fieldgrid", "--data", "rows.json", "--column", "name", "--column", "email",
            "--sortable", "email", "--sort", "email", "--sort", "email", "--no-select", "--cli",
        ]);
        assert_eq!(cli.data, Some(PathBuf::from("rows.json")));
        assert_eq!(cli.columns, vec!["name", "email"]);
        assert_eq!(cli.sort, vec!["email", "email"]);
        assert!(cli.no_select && cli.cli && !cli.loading);

        let mut config = Config::default();
        cli.apply_to(&mut config);
        assert!(!config.selectable);
        assert_eq!(config.data_path, Some(PathBuf::from("rows.json")));
    }

    #[test]
    fn test_resolve_columns() {
        let cli = Cli::parse_from(["fieldgrid", "--sortable", "email"]);
        let fallback = vec![
            Column::new("name", "Name", "name").sortable(),
            Column::new("email", "Email", "email"),
        ];
        let columns = cli.resolve_columns(fallback);
        assert!(columns.iter().all(|c| c.sortable));

        let cli = Cli::parse_from(["fieldgrid", "--column", "age", "--all-sortable"]);
        let columns = cli.resolve_columns(Vec::new());
        assert_eq!(columns, vec![Column::new("age", "Age", "age").sortable()]);
    }
}
