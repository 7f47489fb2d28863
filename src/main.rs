use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use packset::text::{Trie, build_file_catalog};
use packset::utils::{CatalogConfig, get_config_path};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "packset")]
#[command(about = "Substring and unique-prefix queries over text files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter (e.g. "debug", "packset=trace")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Threads used to build indexes (0 = one per CPU)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// List files containing a character sequence
    Find {
        /// Sequence to search for
        sequence: String,

        /// Files or directories to search (ignore files are honoured)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Fold ASCII case when matching
        #[arg(short, long)]
        ignore_case: bool,

        /// Print the character offset of every occurrence
        #[arg(short, long)]
        positions: bool,

        /// Hide progress output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print the shortest unique prefixes of the keys in a file (one per line)
    Prefixes {
        file: PathBuf,

        /// Only consider keys under this prefix
        #[arg(long, default_value = "")]
        prefix: String,
    },
    /// Print the keys in a file (one per line) in sorted order
    Values {
        file: PathBuf,

        /// Only print keys under this prefix
        #[arg(long, default_value = "")]
        prefix: String,
    },
    /// Show the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let mut config = CatalogConfig::load().context("Failed to load configuration")?;
    if let Some(threads) = cli.threads {
        config.build_threads = threads;
    }
    debug!(?config, "effective configuration");

    match cli.command {
        Commands::Find {
            sequence,
            paths,
            ignore_case,
            positions,
            quiet,
        } => {
            if ignore_case {
                config.case_sensitive = false;
            }
            find(&sequence, &paths, &config, positions, quiet)?;
        }
        Commands::Prefixes { file, prefix } => {
            let trie = load_trie(&file)?;
            print_lines(trie.prefixes(&prefix))?;
        }
        Commands::Values { file, prefix } => {
            let trie = load_trie(&file)?;
            print_lines(trie.values(&prefix))?;
        }
        Commands::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            println!("build threads: {}", config.effective_build_threads());
            if save {
                config.save().context("Failed to save configuration")?;
                println!("saved to {}", get_config_path()?.display());
            }
        }
    }

    Ok(())
}

fn find(
    sequence: &str,
    paths: &[PathBuf],
    config: &CatalogConfig,
    positions: bool,
    quiet: bool,
) -> Result<()> {
    let built = build_file_catalog(paths, config, quiet).context("Failed to build catalog")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for m in built.find(sequence) {
        if positions {
            let offsets: Vec<String> = m.positions.iter().map(|p| p.to_string()).collect();
            writeln!(out, "{}: {}", m.path.display(), offsets.join(","))?;
        } else {
            writeln!(out, "{}", m.path.display())?;
        }
    }
    out.flush()?;
    Ok(())
}

fn load_trie(file: &Path) -> Result<Trie> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let mut trie = Trie::with_validation(|key| !key.is_empty());
    for line in content.lines() {
        trie.add(line.trim_end());
    }
    debug!(keys = trie.len(), "loaded keys");
    Ok(trie)
}

fn print_lines(lines: impl Iterator<Item = String>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}
