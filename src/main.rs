use clap::{Parser, Subcommand};
use pgtables::config::{default_config_path, load_config, Config};
use pgtables::{Database, PgConnection, PgTablesError, QualifiedName, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Inspect and edit PostgreSQL tables from the command line.
#[derive(Debug, Parser)]
#[command(name = "pgtables", version, about)]
struct Cli {
    /// Configuration file (defaults to <config dir>/pgtables/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Connection string or URL; overrides the configuration file
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every user table as schema.table
    List,
    /// Print one table, column-aligned
    Show { table: String },
    /// Print a table's column names in declaration order
    Columns { table: String },
    /// Print every table, each under a dashed header
    Dump,
    /// Export a table's rows as json or csv
    Export {
        table: String,
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Create a table if it does not exist
    Create {
        table: String,
        #[arg(long)]
        tablespace: Option<String>,
    },
    /// Drop a table
    Drop { table: String },
}

fn load(cli: &Cli) -> Result<Config> {
    if let Some(path) = &cli.config {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config(path),
        _ => Ok(Config::default()),
    }
}

fn resolve(config: &Config, table: &str) -> QualifiedName {
    if table.contains('.') {
        QualifiedName::from(table)
    } else {
        QualifiedName::new(config.schema(), table)
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load(&cli)?;
    let url = cli
        .url
        .as_deref()
        .or_else(|| config.url())
        .ok_or_else(|| {
            PgTablesError::Config(
                "no connection URL: pass --url or set [connection] url in the config file"
                    .to_string(),
            )
        })?;

    let conn = PgConnection::connect(url)?;
    let db = Database::new(&conn);

    match cli.command {
        Command::List => {
            for name in db.list_tables()? {
                println!("{name}");
            }
        }
        Command::Show { table } => println!("{}", db.table(resolve(&config, &table)).render()?),
        Command::Columns { table } => {
            for column in db.table(resolve(&config, &table)).list_columns()? {
                println!("{column}");
            }
        }
        Command::Dump => println!("{}", db.render()?),
        Command::Export { table, format } => {
            let grid = db.table(resolve(&config, &table)).to_grid()?;
            print!("{}", grid.export(&format)?);
        }
        Command::Create { table, tablespace } => {
            let tablespace = tablespace.as_deref().unwrap_or(config.tablespace());
            let created = db.create_table_in(resolve(&config, &table), tablespace)?;
            info!(table = %created.name(), "created");
        }
        Command::Drop { table } => db.drop_table(resolve(&config, &table))?,
    }
    Ok(())
}

fn main() -> ExitCode {
    // Initialize the logging system using tracing subscriber
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pgtables: {e}");
            ExitCode::FAILURE
        }
    }
}
