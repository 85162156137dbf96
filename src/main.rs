use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use snappy_sift::config::{Config, RecentFile};
use snappy_sift::{KeyPath, Session};

/// Browse and filter JSON documents by a case-insensitive search term.
#[derive(Parser, Debug)]
#[command(name = "snappy-sift", author, version, about, long_about = None)]
struct Cli {
    /// Config file (TOML). Defaults to the per-user config file when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the pruned tree and the match paths as JSON.
    Filter {
        /// JSON document. Defaults to the last opened file.
        file: Option<PathBuf>,

        /// Search term; empty prints the document unchanged.
        #[arg(short, long, default_value = "")]
        term: String,

        /// Single-line output.
        #[arg(long)]
        compact: bool,
    },

    /// Print one page of child nodes of a path in the pruned tree.
    Children {
        /// JSON document. Defaults to the last opened file.
        file: Option<PathBuf>,

        #[arg(short, long, default_value = "")]
        term: String,

        /// Dotted (`a.b.0`) or JSON Pointer (`/a/b/0`) path; defaults to the root.
        #[arg(long, default_value = "")]
        path: String,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Defaults to the configured page size.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the remembered last opened file.
    Last {
        /// Forget it instead.
        #[arg(long)]
        forget: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref()).context("loading config")?;
    let recent = RecentFile::in_config_dir();

    match cli.command {
        Command::Filter { file, term, compact } => {
            let session = open(&config, recent.as_ref(), file)?;
            session.set_term(&term);
            let view = session.view()?;
            let out = if compact {
                serde_json::to_string(&view)?
            } else {
                serde_json::to_string_pretty(&view)?
            };
            println!("{out}");
        }
        Command::Children { file, term, path, offset, limit } => {
            let session = open(&config, recent.as_ref(), file)?;
            session.set_term(&term);
            let limit = limit.unwrap_or_else(|| session.page_size());
            let page = session
                .load_children(&KeyPath::parse(&path), offset, limit)
                .with_context(|| format!("listing children of {path:?}"))?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Command::Last { forget } => {
            let Some(recent) = recent else { bail!("no config directory on this platform") };
            if forget {
                recent.clear()?;
            } else if let Some(path) = recent.load()? {
                println!("{}", path.display());
            } else {
                bail!("no last opened file");
            }
        }
    }
    Ok(())
}

fn open(config: &Config, recent: Option<&RecentFile>, file: Option<PathBuf>) -> Result<Session> {
    let path = match file {
        Some(path) => path,
        None => recent
            .map(RecentFile::load)
            .transpose()?
            .flatten()
            .context("no file given and no last opened file")?,
    };
    let session = Session::new(config);
    session
        .open_file(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    remember(recent, &path);
    Ok(session)
}

fn remember(recent: Option<&RecentFile>, path: &Path) {
    let Some(recent) = recent else { return };
    let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if let Err(e) = recent.save(&absolute) {
        log::warn!("could not remember {}: {e}", absolute.display());
    }
}
