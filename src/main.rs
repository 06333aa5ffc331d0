use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use fieldgrid::{
    app::{self, App},
    cli::Cli,
    config::Config,
    models::{load_records, Record},
    DataTable,
};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fieldgrid=info"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    cli.apply_to(&mut config);
    config.validate()?;

    // Log to a file so the TUI is not drawn over; CLI mode also logs to stderr
    let file_appender = tracing_appender::rolling::never(&config.log_dir, &config.log_file);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(env_filter()),
        )
        .with(cli.cli.then(|| {
            fmt::layer()
                .with_writer(io::stderr)
                .with_filter(env_filter())
        }))
        .init();

    info!("Starting fieldgrid...");

    let (records, fallback_columns) = match config.data_path {
        Some(ref path) => {
            let records = load_records(path)
                .with_context(|| format!("Failed to load table data from {}", path.display()))?;
            info!("Loaded {} rows from {}", records.len(), path.display());
            let columns = app::columns_for(&records);
            (records, columns)
        }
        None => (app::sample_users(), app::sample_columns()),
    };
    let columns = cli.resolve_columns(fallback_columns);

    if cli.cli {
        return print_table(&cli, records, columns, config.selectable);
    }

    let mut app = App::new(records, columns, config.selectable, cli.loading);
    for key in &cli.sort {
        apply_sort(&mut app.table, key)?;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(()) => info!("fieldgrid exited successfully"),
        Err(e) => {
            error!("fieldgrid encountered an error: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Header click from the command line; clicks on non-sortable columns are
/// reported but not fatal
fn apply_sort(table: &mut DataTable<Record>, key: &str) -> Result<()> {
    if !table.toggle_sort(key)? {
        warn!("Column '{}' is not sortable, ignoring --sort", key);
    }
    Ok(())
}

/// CLI mode: print the table once and exit
fn print_table(
    cli: &Cli,
    records: Vec<Record>,
    columns: Vec<fieldgrid::Column>,
    selectable: bool,
) -> Result<()> {
    let mut table = DataTable::new(records, columns)
        .selectable(selectable)
        .loading(cli.loading);
    for key in &cli.sort {
        apply_sort(&mut table, key)?;
    }

    for line in table.render_plain() {
        println!("{}", line);
    }
    if let Some(sort) = table.sort_config() {
        println!();
        println!("Sorted by {} ({})", sort.field, sort.direction.as_str());
    }
    Ok(())
}
