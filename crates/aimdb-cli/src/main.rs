//! aimdb - A tool for inspecting A.I.M. .tab/.ind/.dat databases
//!
//! Usage:
//!   aimdb info <base>                     - Show database summary
//!   aimdb tables <base>                   - List tables
//!   aimdb fields <base> [-t table]        - List fields
//!   aimdb records <base> [filter] [-t table] - List records
//!   aimdb show <base> <record>            - Show one record's values
//!
//! `<base>` is the path without extension, e.g. `data/db` for
//! `data/db.tab`, `data/db.ind` and `data/db.dat`.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use aimdb::db::{
    list_fields, list_records, list_tables, open_with_progress, show_db_info, show_record,
};
use aimdb::{DecodeOptions, ScalarWidth};

#[derive(Parser)]
#[command(name = "aimdb")]
#[command(version)]
#[command(about = "Inspect A.I.M. .tab/.ind/.dat databases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Byte width of integer values
    #[arg(long, global = true, value_enum, default_value = "4")]
    integer_width: Width,

    /// Byte width of float values
    #[arg(long, global = true, value_enum, default_value = "4")]
    float_width: Width,

    /// Show debug diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Width {
    #[value(name = "4")]
    Four,
    #[value(name = "8")]
    Eight,
}

impl From<Width> for ScalarWidth {
    fn from(w: Width) -> Self {
        match w {
            Width::Four => ScalarWidth::Four,
            Width::Eight => ScalarWidth::Eight,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show database summary
    Info {
        /// Database path without extension
        base: PathBuf,
    },
    /// List tables
    Tables {
        /// Database path without extension
        base: PathBuf,
    },
    /// List fields
    Fields {
        /// Database path without extension
        base: PathBuf,
        /// Only fields of this table
        #[arg(short, long)]
        table: Option<String>,
    },
    /// List records
    Records {
        /// Database path without extension
        base: PathBuf,
        /// Filter pattern on record names (e.g., SWORD*, gun)
        filter: Option<String>,
        /// Only records of this table
        #[arg(short, long)]
        table: Option<String>,
    },
    /// Show the values of one record
    Show {
        /// Database path without extension
        base: PathBuf,
        /// Record name
        record: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
        tracing_subscriber::filter::LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = DecodeOptions::new()
        .with_integer_width(cli.integer_width.into())
        .with_float_width(cli.float_width.into());

    match cli.command {
        Commands::Info { base } => {
            let db = open_with_progress(&base, &options)?;
            show_db_info(&db);
        }
        Commands::Tables { base } => {
            let db = open_with_progress(&base, &options)?;
            list_tables(&db);
        }
        Commands::Fields { base, table } => {
            let db = open_with_progress(&base, &options)?;
            list_fields(&db, table.as_deref())?;
        }
        Commands::Records {
            base,
            filter,
            table,
        } => {
            let db = open_with_progress(&base, &options)?;
            list_records(&db, filter.as_deref(), table.as_deref())?;
        }
        Commands::Show { base, record } => {
            let db = open_with_progress(&base, &options)?;
            show_record(&db, &record)?;
        }
    }

    Ok(())
}
