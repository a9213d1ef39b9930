use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use table_model_core::{CsvOptions, ImportMode, Model, ModelConfig, Value};
use table_model_sqlite::SqliteStore;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "table-model")]
#[command(about = "Inspect and modify SQLite tables through table models")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the row with the given primary key as JSON.
    Show(ShowArgs),
    /// Print matching rows as a JSON array.
    List(ListArgs),
    /// Count rows in the table.
    Count(CountArgs),
    /// Report whether any row has column = value.
    Exists(ExistsArgs),
    /// Set one column of the row with the given primary key.
    SetField(SetFieldArgs),
    /// Delete a row (and its descendants when a parent column is set).
    Delete(DeleteArgs),
    /// Delete every row in the table.
    Truncate(TruncateArgs),
    /// Import rows from a CSV file whose first line names the columns.
    Import(ImportArgs),
}

/// Which database and table to operate on.
#[derive(Debug, Args)]
struct TargetArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
    /// Table name (overrides the config file).
    #[arg(long)]
    table: Option<String>,
    /// YAML model configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Primary-key column (overrides the config file).
    #[arg(long)]
    primary_key: Option<String>,
    /// Parent column enabling tree mode (overrides the config file).
    #[arg(long)]
    parent_column: Option<String>,
}

#[derive(Debug, Args)]
struct ShowArgs {
    #[command(flatten)]
    target: TargetArgs,
    /// Primary-key value.
    id: String,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[command(flatten)]
    target: TargetArgs,
    /// Equality filter `column=value`; may be repeated. An empty value
    /// matches NULL.
    #[arg(long = "where", value_name = "COLUMN=VALUE")]
    filters: Vec<String>,
    /// Comma-separated columns to print.
    #[arg(long)]
    fields: Option<String>,
}

#[derive(Debug, Args)]
struct CountArgs {
    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Debug, Args)]
struct ExistsArgs {
    #[command(flatten)]
    target: TargetArgs,
    column: String,
    value: String,
}

#[derive(Debug, Args)]
struct SetFieldArgs {
    #[command(flatten)]
    target: TargetArgs,
    id: String,
    column: String,
    value: String,
    /// Store NULL instead of the given value.
    #[arg(long)]
    null: bool,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    #[command(flatten)]
    target: TargetArgs,
    id: String,
}

#[derive(Debug, Args)]
struct TruncateArgs {
    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Debug, Args)]
struct ImportArgs {
    #[command(flatten)]
    target: TargetArgs,
    /// CSV file to import.
    file: PathBuf,
    /// Keep existing rows instead of replacing them.
    #[arg(long)]
    append: bool,
    /// Field delimiter.
    #[arg(long, default_value_t = ',')]
    delimiter: char,
    /// Keep empty lines as records.
    #[arg(long)]
    keep_empty_lines: bool,
    /// Do not trim whitespace around fields.
    #[arg(long)]
    no_trim: bool,
    /// Refuse to grow the table beyond this many rows.
    #[arg(long)]
    max_rows: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Show(args) => run_show(args),
        Command::List(args) => run_list(args),
        Command::Count(args) => run_count(args),
        Command::Exists(args) => run_exists(args),
        Command::SetField(args) => run_set_field(args),
        Command::Delete(args) => run_delete(args),
        Command::Truncate(args) => run_truncate(args),
        Command::Import(args) => run_import(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_show(args: ShowArgs) -> Result<(), String> {
    let store = open_store(&args.target)?;
    let model = build_model(&store, &args.target, None)?;
    let row = model
        .load(args.id.as_str())
        .map_err(|e| format!("Failed to load row: {e}"))?
        .ok_or_else(|| format!("no row with {} = {}", model.primary_key(), args.id))?;
    print_json(&row)
}

fn run_list(args: ListArgs) -> Result<(), String> {
    let store = open_store(&args.target)?;
    let model = build_model(&store, &args.target, None)?;

    let mut query = model.all().order_by(model.primary_key());
    for filter in &args.filters {
        let (column, value) = filter
            .split_once('=')
            .ok_or_else(|| format!("invalid filter '{filter}': expected COLUMN=VALUE"))?;
        query = query.filter_eq(column.trim(), filter_value(value));
    }
    let fields = parse_list(args.fields);
    let fields: Vec<&str> = fields.iter().map(String::as_str).collect();

    let rows = model
        .rows(query, &fields)
        .map_err(|e| format!("Failed to list rows: {e}"))?;
    print_json(&rows)
}

fn run_count(args: CountArgs) -> Result<(), String> {
    let store = open_store(&args.target)?;
    let model = build_model(&store, &args.target, None)?;
    let count = model
        .count(&model.all())
        .map_err(|e| format!("Failed to count rows: {e}"))?;
    println!("{count}");
    Ok(())
}

fn run_exists(args: ExistsArgs) -> Result<(), String> {
    let store = open_store(&args.target)?;
    let model = build_model(&store, &args.target, None)?;
    let exists = model
        .exists(&args.column, args.value.as_str())
        .map_err(|e| format!("Failed to query rows: {e}"))?;
    println!("{}", if exists { "yes" } else { "no" });
    Ok(())
}

fn run_set_field(args: SetFieldArgs) -> Result<(), String> {
    let store = open_store(&args.target)?;
    let model = build_model(&store, &args.target, None)?;
    let value = if args.null {
        Value::Null
    } else {
        Value::from(args.value)
    };
    let affected = model
        .change_field(args.id.as_str(), &args.column, value)
        .map_err(|e| e.to_string())?;
    println!("Updated {affected} row(s).");
    Ok(())
}

fn run_delete(args: DeleteArgs) -> Result<(), String> {
    let store = open_store(&args.target)?;
    let model = build_model(&store, &args.target, None)?;
    let removed = model
        .delete_one(args.id.as_str())
        .map_err(|e| e.to_string())?;
    println!("Deleted {removed} row(s).");
    Ok(())
}

fn run_truncate(args: TruncateArgs) -> Result<(), String> {
    let store = open_store(&args.target)?;
    let model = build_model(&store, &args.target, None)?;
    let removed = model.delete_all().map_err(|e| e.to_string())?;
    println!("Deleted {removed} row(s).");
    Ok(())
}

fn run_import(args: ImportArgs) -> Result<(), String> {
    let text = fs::read_to_string(&args.file)
        .map_err(|e| format!("Failed to read '{}': {e}", args.file.display()))?;
    let store = open_store(&args.target)?;
    let model = build_model(&store, &args.target, args.max_rows)?;

    let options = CsvOptions {
        delimiter: args.delimiter,
        skip_empty_lines: !args.keep_empty_lines,
        trim_fields: !args.no_trim,
    };
    let mode = if args.append {
        ImportMode::Append
    } else {
        ImportMode::Replace
    };
    let report = model
        .import_csv(&text, &options, mode)
        .map_err(|e| e.to_string())?;
    println!("Import complete:");
    println!("  Rows removed: {}", report.rows_removed);
    println!("  Rows inserted: {}", report.rows_inserted);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store(target: &TargetArgs) -> Result<SqliteStore, String> {
    SqliteStore::open(&target.db)
        .map_err(|e| format!("Failed to open database '{}': {e}", target.db.display()))
}

/// Builds a model from the optional config file and command-line overrides.
fn build_model<'a>(
    store: &'a SqliteStore,
    target: &TargetArgs,
    max_rows: Option<u64>,
) -> Result<Model<&'a SqliteStore>, String> {
    let mut config = match &target.config {
        Some(path) => ModelConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => ModelConfig::default(),
    };
    if let Some(table) = &target.table {
        config.table = Some(table.clone());
    }
    if let Some(primary_key) = &target.primary_key {
        config.primary_key = primary_key.clone();
    }
    if let Some(parent_column) = &target.parent_column {
        config.parent_column = Some(parent_column.clone());
    }
    if max_rows.is_some() {
        config.max_rows = max_rows;
    }

    let table = config
        .table
        .clone()
        .ok_or("no table given: pass --table or set `table` in the config file")?;
    let name = model_name(&table);
    debug!(table = %table, model = %name, "model configured");
    Ok(Model::from_config(store, &name, config))
}

/// `blog_posts` becomes `BlogPosts`.
fn model_name(table: &str) -> String {
    table
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `--where col=` selects rows where `col` is NULL.
fn filter_value(raw: &str) -> Value {
    if raw.is_empty() {
        Value::Null
    } else {
        Value::from(raw)
    }
}

fn parse_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("JSON serialization failed: {e}"))?;
    println!("{json}");
    Ok(())
}
