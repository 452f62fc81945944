//! Lectern CLI - read, export and import holy texts from the terminal

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::AppContext;
use lectern_core::reader::Position;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "lectern")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Data directory for the offline catalog and bookmarks
    /// (overrides LECTERN_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the texts in the catalog
    Texts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the chapters of a text
    Chapters {
        /// Text code (quran, bible, gita, ...)
        code: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read a text one verse per page
    Read {
        /// Text code (quran, bible, gita, ...)
        code: String,

        /// Chapter to start at
        #[arg(short, long, default_value = "1")]
        chapter: u32,

        /// Verse to start at
        #[arg(long, default_value = "1")]
        verse: u32,

        /// Comma-separated display languages, e.g. original,english
        #[arg(short, long)]
        languages: Option<String>,

        /// Start turning pages automatically
        #[arg(short, long)]
        autoplay: bool,

        /// Seconds between automatic page turns (1-10)
        #[arg(short, long)]
        speed: Option<u64>,
    },

    /// Export chapters to text or JSON files
    Export {
        /// Text code (quran, bible, gita, ...)
        code: String,

        /// Chapter to export
        #[arg(required_unless_present = "all")]
        chapter: Option<u32>,

        /// Export every chapter into the output directory
        #[arg(long, conflicts_with = "chapter", requires = "output")]
        all: bool,

        /// Output file or directory (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Number of parallel jobs for --all (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,
    },

    /// Import a Bible JSON file into the catalog
    Import {
        /// Input file path
        input: PathBuf,
    },

    /// Download a text from its public source into the catalog
    Download {
        /// Text code (quran, bible, gita, ramayana, torah)
        code: String,
    },

    /// Show the bookmarks saved for a text
    Bookmarks {
        /// Text code (quran, bible, gita, ...)
        code: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "lectern_cli=debug,lectern_core=debug"
    } else {
        "lectern_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = AppContext::load(cli.data_dir)?;

    match cli.command {
        Commands::Texts { json } => commands::texts(&ctx, json).await,

        Commands::Chapters { code, json } => commands::chapters(&ctx, &code, json).await,

        Commands::Read {
            code,
            chapter,
            verse,
            languages,
            autoplay,
            speed,
        } => {
            commands::read(
                &ctx,
                &code,
                Position::new(chapter, verse),
                languages.as_deref(),
                autoplay,
                speed,
            )
            .await
        }

        Commands::Export {
            code,
            chapter,
            all,
            output,
            format,
            jobs,
        } => match (all, chapter, output) {
            (true, _, Some(dir)) => commands::export_all(&ctx, &code, &dir, &format, jobs).await,
            (_, Some(chapter), output) => {
                commands::export(&ctx, &code, chapter, output.as_deref(), &format).await
            }
            _ => anyhow::bail!("Pass a chapter number, or --all with --output"),
        },

        Commands::Import { input } => commands::import(&ctx, &input).await,

        Commands::Download { code } => commands::download(&ctx, &code).await,

        Commands::Bookmarks { code, json } => commands::bookmarks(&ctx, &code, json).await,
    }
}
