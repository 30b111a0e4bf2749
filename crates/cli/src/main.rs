//! itemdex binary.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use itemdex_config::Config;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	match cli.command {
		Command::Build => {
			let path = cli.config.unwrap_or_else(commands::default_config_path);
			commands::build(&path).await
		}
		Command::Encode {
			catalog,
			id,
			socket_categories,
			output,
		} => commands::encode(&catalog, id, socket_categories.as_deref(), output.as_deref()),
		Command::Show { artifact, hash } => {
			let config = optional_config(cli.config.as_deref())?;
			commands::show(config.as_ref(), &artifact, hash)
		}
		Command::Sockets {
			artifact,
			hash,
			profile,
			instance,
			owner,
		} => commands::sockets(&artifact, hash, &profile, instance, owner),
		Command::Dump { artifact, output } => {
			let config = optional_config(cli.config.as_deref())?;
			commands::dump(config.as_ref(), &artifact, output.as_deref())
		}
		Command::Verify { artifact, baseline } => {
			let config = optional_config(cli.config.as_deref())?;
			commands::verify_dump(config.as_ref(), &artifact, &baseline)
		}
		Command::Manifest { remote, cached } => commands::manifest(&remote, cached.as_deref()),
	}
}

fn optional_config(path: Option<&std::path::Path>) -> Result<Option<Config>> {
	path.map(|path| Config::load(path).with_context(|| format!("loading {}", path.display())))
		.transpose()
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("itemdex=debug,info")
		} else {
			EnvFilter::new("warn,itemdex=info")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}
