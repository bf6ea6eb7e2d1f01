//! CLI for imcite - keep one master BibTeX database and generate
//! per-document bibliography files containing only the cited entries.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use imcite_core::{
    cited_keys, db_keys, make_bib, missing_keys, run_bibtex, show_entry, Config, Error,
};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Generate a local bib file from a central database
#[derive(Parser)]
#[command(name = "imcite")]
#[command(version)]
#[command(after_help = "\
Examples:
  imcite compile thesis
  imcite --db ~/refs/master.bib compile thesis --no-bibtex
  imcite show missing thesis
  imcite show bibentry Knuth1984

Configuration is read from /etc/imcite.toml, the user config directory,
and ./.imcite.toml, in that order; later files win. Currently one option
is available:

  db = \"~/.imcite/db.bib\"")]
struct Cli {
    /// Path to the central bib database
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Path to an extra configuration file, read after the default ones
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a local bib file for the given TeX document and run BibTeX
    Compile {
        /// Base filename of the TeX source (without .tex)
        document: String,

        /// Do not run bibtex after writing the bib file
        #[arg(long)]
        no_bibtex: bool,
    },

    /// Show various information
    Show {
        #[command(subcommand)]
        info: Info,
    },
}

#[derive(Subcommand)]
enum Info {
    /// Keys cited by the given document, in citation order
    Cited { document: String },
    /// Cited keys that are missing from the central database
    Missing { document: String },
    /// All keys in the central database
    All,
    /// The database entry with the given key
    Bibentry { key: String },
    /// The effective configuration
    Cfg,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    tracing_subscriber::fmt::init();

    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn run() -> Result<i32, Error> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref(), cli.db.as_deref())?;

    match cli.command {
        Commands::Compile {
            document,
            no_bibtex,
        } => {
            make_bib(&document, &config.db)?;
            if no_bibtex {
                return Ok(0);
            }
            // The engine's exit status is surfaced unmodified.
            run_bibtex(&document)
        }
        Commands::Show { info } => {
            match info {
                Info::Cited { document } => print_lines(&cited_keys(&document)?),
                Info::Missing { document } => {
                    print_lines(&missing_keys(&document, &config.db)?)
                }
                Info::All => print_lines(&db_keys(&config.db)?),
                Info::Bibentry { key } => {
                    if let Some(text) = show_entry(&config.db, &key)? {
                        print!("{text}");
                    }
                }
                Info::Cfg => println!("db = {}", config.db.display()),
            }
            Ok(0)
        }
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
