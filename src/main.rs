//! CLI entry point for prompt embed expansion

use clap::Parser;
use promptembed::io::cli::{Cli, CommandRunner, init_tracing};

fn main() -> promptembed::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level());
    let runner = CommandRunner::new(cli);
    runner.run(&mut std::io::stdout().lock())
}
