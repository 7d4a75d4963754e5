//! oxide-ddl CLI
//!
//! Diffs two schema files into migration SQL, or re-prints one schema in
//! canonical form.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_ddl::dialect::{self, Dialect};
use oxide_ddl::{Ddl, DiffError, DiffOptions, Differ};

/// Schema diff and formatter for PostgreSQL, MySQL and CockroachDB DDL.
#[derive(Parser, Debug)]
#[command(name = "oxide-ddl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQL dialect: postgres, mysql or cockroach.
    #[arg(
        short,
        long,
        env = "OXIDE_DDL_DIALECT",
        default_value = "postgres",
        global = true
    )]
    dialect: String,

    /// Add new FOREIGN KEY and CHECK constraints as NOT VALID.
    #[arg(long)]
    not_valid: bool,

    /// Treat table OLD in the old schema as table NEW in the new one.
    #[arg(long, value_name = "OLD=NEW", value_parser = parse_table_rename)]
    rename_table: Vec<(String, String)>,

    /// Treat column OLD of TABLE (new name) as column NEW.
    #[arg(long, value_name = "TABLE.OLD=NEW", value_parser = parse_column_rename)]
    rename_column: Vec<(String, String, String)>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Sql, global = true)]
    format: Format,

    /// Write the result to FILE instead of stdout.
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Old schema file, or `-` for an empty database.
    before: Option<String>,

    /// New schema file, or `-` for an empty database.
    after: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a schema file and print it in canonical form.
    Fmt {
        /// Schema file.
        file: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// Canonical SQL.
    Sql,
    /// The statement list as JSON.
    Json,
}

impl Cli {
    fn diff_options(&self) -> DiffOptions {
        let mut options = DiffOptions::new().not_valid(self.not_valid);
        for (from, to) in &self.rename_table {
            options = options.rename_table(from, to);
        }
        for (table, from, to) in &self.rename_column {
            options = options.rename_column(table, from, to);
        }
        options
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let text = run(&cli)?;
    write_output(cli.output.as_deref(), &text)
}

/// Executes the command line and returns the text to output.
fn run(cli: &Cli) -> anyhow::Result<String> {
    let dialect = dialect::from_name(&cli.dialect).ok_or_else(|| {
        anyhow!(
            "unknown dialect `{}`, expected postgres, mysql or cockroach",
            cli.dialect
        )
    })?;
    debug!(dialect = dialect.name(), "dialect selected");

    if let Some(Commands::Fmt { file }) = &cli.command {
        let ddl = read_schema(file, dialect)?;
        return render(&ddl, cli.format);
    }

    let (Some(before), Some(after)) = (&cli.before, &cli.after) else {
        bail!("both BEFORE and AFTER schemas are required (use `-` for none)");
    };
    let before = read_optional_schema(before, dialect)?;
    let after = read_optional_schema(after, dialect)?;

    match Differ::new(dialect)
        .options(cli.diff_options())
        .diff(before.as_ref(), after.as_ref())
    {
        Ok(migration) => {
            info!(
                statements = migration.statements.len(),
                "migration generated"
            );
            render(&migration, cli.format)
        }
        Err(DiffError::NoDifference) => {
            info!("no difference between the schemas");
            Ok(String::new())
        }
        Err(e) => Err(anyhow::Error::new(e).context("failed to diff schemas")),
    }
}

fn read_optional_schema(path: &str, dialect: &dyn Dialect) -> anyhow::Result<Option<Ddl>> {
    if path == "-" {
        return Ok(None);
    }
    read_schema(Path::new(path), dialect).map(Some)
}

fn read_schema(path: &Path, dialect: &dyn Dialect) -> anyhow::Result<Ddl> {
    let sql = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let ddl = oxide_ddl::parse(&sql, dialect)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    debug!(
        path = %path.display(),
        statements = ddl.statements.len(),
        "schema parsed"
    );
    Ok(ddl)
}

fn render(ddl: &Ddl, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Sql => Ok(ddl.to_sql()),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(ddl)?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn write_output(path: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn parse_table_rename(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((from, to)) if !from.is_empty() && !to.is_empty() => {
            Ok((from.to_string(), to.to_string()))
        }
        _ => Err(format!("expected OLD=NEW, got `{value}`")),
    }
}

fn parse_column_rename(value: &str) -> Result<(String, String, String), String> {
    let parts = value
        .split_once('=')
        .and_then(|(column, to)| column.split_once('.').map(|(table, from)| (table, from, to)));
    match parts {
        Some((table, from, to)) if !table.is_empty() && !from.is_empty() && !to.is_empty() => {
            Ok((table.to_string(), from.to_string(), to.to_string()))
        }
        _ => Err(format!("expected TABLE.OLD=NEW, got `{value}`")),
    }
}
