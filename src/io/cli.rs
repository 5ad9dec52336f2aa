//! Command-line interface for expanding prompts and managing embed files

use crate::io::configuration::{DEFAULT_EMBEDS_DIRECTORY, SEARCH_RESULT_LIMIT};
use crate::io::error::{Result, file_system};
use crate::io::index::EmbedIndex;
use crate::io::merge::merge_files;
use crate::io::store::FileTagStore;
use crate::prompt::expander::EmbedExpander;
use clap::{ArgAction, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "promptembed")]
#[command(
    author,
    version,
    about = "Expand <embed> placeholders in image-generation prompts"
)]
/// Command-line arguments for the embed tool
pub struct Cli {
    /// Directory holding embed documents
    #[arg(short, long, global = true, default_value = DEFAULT_EMBEDS_DIRECTORY)]
    pub embeds_dir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available operations
#[derive(Subcommand)]
pub enum Command {
    /// Expand placeholders in a prompt
    Expand {
        /// Prompt text; read from stdin when omitted
        #[arg(value_name = "PROMPT")]
        prompt: Option<String>,

        /// Random seed for reproducible expansion
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of expansions to print
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Fuzzy search embed names
    Search {
        /// Characters to match, in order
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = SEARCH_RESULT_LIMIT)]
        limit: usize,
    },

    /// Merge embed files into one
    Merge {
        /// Destination file (.yml, .yaml or .txt)
        #[arg(short, long)]
        output: PathBuf,

        /// Files to merge
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

impl Cli {
    /// Default log filter for the requested verbosity
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` takes precedence over `default_level`. Repeated calls keep the
/// first subscriber.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Another subscriber may already be installed, e.g. by a test harness
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs the parsed command and writes its results
pub struct CommandRunner {
    cli: Cli,
}

impl CommandRunner {
    /// Create a runner for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Execute the command, writing results to `out`
    ///
    /// # Errors
    ///
    /// Returns an error if stdin cannot be read, a merge fails, or `out`
    /// cannot be written
    pub fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        match &self.cli.command {
            Command::Expand {
                prompt,
                seed,
                count,
            } => self.expand(prompt.as_deref(), *seed, *count, out),
            Command::Search { query, limit } => self.search(query, *limit, out),
            Command::Merge { output, inputs } => {
                let merged = merge_files(inputs, output)?;
                writeln!(out, "Merged {merged} tags into {}", output.display())?;
                Ok(())
            }
        }
    }

    fn expand<W: Write>(
        &self,
        prompt: Option<&str>,
        seed: Option<u64>,
        count: usize,
        out: &mut W,
    ) -> Result<()> {
        let prompt = match prompt {
            Some(prompt) => prompt.to_string(),
            None => std::io::read_to_string(std::io::stdin())
                .map_err(|e| file_system("<stdin>", "read", e))?
                .trim_end_matches(['\r', '\n'])
                .to_string(),
        };

        let expander = EmbedExpander::new(FileTagStore::new(&self.cli.embeds_dir));
        let mut rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        for _ in 0..count {
            writeln!(out, "{}", expander.expand(&prompt, &mut rng))?;
        }
        Ok(())
    }

    fn search<W: Write>(&self, query: &str, limit: usize, out: &mut W) -> Result<()> {
        let index = EmbedIndex::scan(&self.cli.embeds_dir);
        for entry in index.search(query, limit) {
            writeln!(out, "{}", entry.name)?;
        }
        Ok(())
    }
}
