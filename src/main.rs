use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use ddlkit::{
    generate_script, load_model, parse_script, read_script, translate_with, Dialect,
    GenerateOptions, TranslateOptions, Warning,
};

#[derive(Parser)]
#[command(name = "ddlkit")]
#[command(author, version, about = "Translate CREATE TABLE scripts between SQL dialects")]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a SQL script into another dialect
    Translate {
        /// Path to the SQL script
        input: PathBuf,

        /// Target dialect (sqlite, mysql, mariadb, postgresql, sqlserver)
        #[arg(short, long, default_value = "mysql")]
        target: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave foreign key constraints out
        #[arg(long)]
        no_foreign_keys: bool,

        /// Leave indexes out
        #[arg(long)]
        no_indexes: bool,

        /// Make PostgreSQL foreign keys DEFERRABLE INITIALLY DEFERRED
        #[arg(long)]
        deferrable: bool,
    },

    /// Parse a SQL script and print its tables as JSON
    Parse {
        /// Path to the SQL script
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate SQL from a JSON table model
    Generate {
        /// Path to the JSON model (an array of tables)
        #[arg(short, long)]
        model: PathBuf,

        /// Target dialect (sqlite, mysql, mariadb, postgresql, sqlserver)
        #[arg(short, long, default_value = "mysql")]
        target: String,

        /// Also emit INSERT statements for table data
        #[arg(long)]
        with_data: bool,

        /// Rows per INSERT statement
        #[arg(long, default_value_t = 100)]
        batch_size: usize,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, format!("{}\n", text))
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

fn report(warnings: &[Warning]) {
    if !warnings.is_empty() {
        eprintln!("{} warning(s); affected items were left out", warnings.len());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Translate {
            input,
            target,
            output,
            no_foreign_keys,
            no_indexes,
            deferrable,
        } => {
            let options = TranslateOptions {
                target,
                include_foreign_keys: !no_foreign_keys,
                include_indexes: !no_indexes,
                deferrable_foreign_keys: deferrable,
            };
            let sql = read_script(&input)?;
            let translation = translate_with(&sql, &options);
            write_output(output.as_deref(), &translation.sql)?;
            report(&translation.warnings);
        }
        Commands::Parse { input, output } => {
            let sql = read_script(&input)?;
            let script = parse_script(&sql);
            let json = serde_json::to_string_pretty(&script.tables)?;
            write_output(output.as_deref(), &json)?;
            report(&script.warnings);
        }
        Commands::Generate {
            model,
            target,
            with_data,
            batch_size,
            output,
        } => {
            let tables = load_model(&model)?;
            let (dialect, unknown) = Dialect::resolve(&target);
            let options = GenerateOptions {
                max_row: batch_size,
                ..GenerateOptions::new(dialect)
            };
            let generated = generate_script(&tables, &options, with_data);
            write_output(output.as_deref(), &generated.sql)?;
            let mut warnings: Vec<Warning> = unknown.into_iter().collect();
            warnings.extend(generated.warnings);
            report(&warnings);
        }
    }

    Ok(())
}
