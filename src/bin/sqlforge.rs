//! sqlforge: statement translator CLI
//!
//! Reads statements in their JSON form, prints the MySQL text and bindings,
//! or runs them against a database.
//!
//! # Usage
//!
//! ```bash
//! # Translate only
//! echo '{"kind": "select", "table": "users"}' | sqlforge translate
//!
//! # Run, re-keyed by id
//! sqlforge run query.json --forward-key id --format json
//!
//! # Show the effective encryption policy
//! sqlforge check-config
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use serde_json::Value as JsonValue;
use sqlforge::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlforge")]
#[command(version)]
#[command(about = "Translate statement trees into parameterized MySQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlforge translate query.json
    cat query.json | sqlforge translate -
    sqlforge run query.json --group-by team --format json
    sqlforge check-config --config ./sqlforge.toml")]
struct Cli {
    /// Config file (default: ./sqlforge.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database connection URL, overrides the config file
    #[arg(long, env = "SQLFORGE_DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SQL and bindings of a JSON statement
    Translate {
        /// Statement file, `-` or nothing for stdin
        input: Option<PathBuf>,

        /// Print the translation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Translate and execute a JSON statement
    Run {
        /// Statement file, `-` or nothing for stdin
        input: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Re-key rows by this column
        #[arg(long)]
        forward_key: Option<String>,

        /// Group rows by this column
        #[arg(long)]
        group_by: Option<String>,
    },
    /// Show the effective configuration and encryption policy
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "sqlforge=debug" } else { "sqlforge=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = &cli.database_url {
        config.database.url = Some(url.clone());
    }

    match cli.command {
        Commands::Translate { input, json } => {
            let statement = read_statement(input.as_deref())?;
            let translator = Translator::with_policy(config.transform_policy());
            let out = translator.translate(&statement)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_translation(&out);
            }
        }
        Commands::Run {
            input,
            format,
            forward_key,
            group_by,
        } => {
            let statement = read_statement(input.as_deref())?;
            let engine = Engine::from_config(&config)
                .await
                .context("cannot connect, use --database-url or set SQLFORGE_DATABASE_URL")?;
            if cli.verbose {
                let out = engine.translator().translate(&statement)?;
                print_translation(&out);
                println!();
            }
            execute(&engine, statement, format, forward_key, group_by).await?;
        }
        Commands::CheckConfig => check_config(&config),
    }
    Ok(())
}

fn read_statement(input: Option<&Path>) -> Result<Statement> {
    let text = match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("cannot read statement file {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("cannot read statement from stdin")?;
            buf
        }
    };
    Ok(Statement::from_json(&text)?)
}

async fn execute(
    engine: &Engine,
    statement: Statement,
    format: OutputFormat,
    forward_key: Option<String>,
    group_by: Option<String>,
) -> Result<()> {
    match statement {
        Statement::Select(mut select) => {
            if forward_key.is_some() {
                select.forward_key = forward_key;
            }
            if group_by.is_some() {
                select.group_results = group_by;
            }
            let shaped = engine.fetch_shaped(&select).await?;
            format_output(shaped, format)?;
        }
        statement @ (Statement::Exists(_) | Statement::Show(_)) => {
            let rows = engine.fetch_all(&statement).await?;
            format_output(Shaped::Rows(rows), format)?;
        }
        statement => {
            let affected = engine.execute(&statement).await?;
            println!("{} {} rows affected", "✓".green(), affected);
        }
    }
    Ok(())
}

fn print_translation(out: &Translated) {
    println!("{}", "Generated SQL:".green().bold());
    println!("{}", out.sql.white());

    if !out.params.is_empty() {
        println!();
        println!("{}", "Bindings:".cyan());
        for (i, p) in out.params.iter().enumerate() {
            println!("  ?{} = {}", i + 1, p.to_string().yellow());
        }
    }
}

fn format_output(shaped: Shaped, format: OutputFormat) -> Result<()> {
    if shaped.is_empty() {
        println!("{}", "(no results)".dimmed());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shaped.into_json())?),
        OutputFormat::Table => match shaped {
            Shaped::Rows(rows) => print_table(&rows),
            Shaped::Keyed(rows) => {
                let rows: Vec<JsonValue> = rows.into_iter().map(|(_, row)| row).collect();
                print_table(&rows);
            }
            Shaped::Grouped(groups) => {
                for (key, group) in groups {
                    println!("{} {}", "Group:".cyan().bold(), key.yellow());
                    format_output(group, format)?;
                }
            }
        },
    }
    Ok(())
}

fn print_table(rows: &[JsonValue]) {
    let Some(first) = rows.first().and_then(JsonValue::as_object) else {
        return;
    };
    let columns: Vec<&String> = first.keys().collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (i, col) in columns.iter().enumerate() {
            widths[i] = widths[i].max(cell(row, col).chars().count());
        }
    }

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:width$}", c, width = w))
        .collect();
    println!("{}", header.join(" │ ").white().bold());

    let sep: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    println!("{}", sep.join("─┼─").dimmed());

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:width$}", cell(row, c), width = w))
            .collect();
        println!("{}", cells.join(" │ "));
    }

    println!();
    println!("{} row(s) returned", rows.len().to_string().cyan());
}

fn cell(row: &JsonValue, column: &str) -> String {
    match row.get(column) {
        None | Some(JsonValue::Null) => "NULL".to_string(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn check_config(config: &Config) {
    println!("{}", "sqlforge configuration".cyan().bold());
    println!();

    let url = match &config.database.url {
        Some(_) => "set".green(),
        None => "not set".yellow(),
    };
    println!("  {} {}", "Database URL:".dimmed(), url);
    println!(
        "  {} {}",
        "Max connections:".dimmed(),
        config.database.max_connections
    );

    let policy = config.transform_policy();
    let state = if policy.is_active() {
        "active".green()
    } else {
        "inactive".yellow()
    };
    println!("  {} {}", "Encryption:".dimmed(), state);

    let columns = policy.columns();
    if columns.is_empty() {
        println!("  {}", "(no encrypted columns)".dimmed());
        return;
    }
    println!("  {}", "Encrypted columns:".dimmed());
    for (table, column) in columns {
        println!("    • {}.{}", table.white(), column.cyan());
    }
}
