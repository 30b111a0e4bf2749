use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "itemdex")]
#[command(about = "Build and inspect compact item catalogs")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Config file (defaults to ./itemdex.toml for `build`)
	#[arg(long, short = 'c', global = true, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Fetch, encode and publish every configured locale
	Build,
	/// Encode one raw catalog file into an artifact
	Encode {
		/// Raw catalog JSON
		catalog: PathBuf,
		/// Artifact id (defaults to the catalog's file stem)
		#[arg(long)]
		id: Option<String>,
		/// Socket category definitions JSON
		#[arg(long, value_name = "PATH")]
		socket_categories: Option<PathBuf>,
		/// Output file (stdout if omitted)
		#[arg(long, short = 'o', value_name = "PATH")]
		output: Option<PathBuf>,
	},
	/// Resolve one item definition
	Show {
		artifact: PathBuf,
		hash: u32,
	},
	/// Rebuild an item instance's sockets against a live profile
	Sockets {
		artifact: PathBuf,
		hash: u32,
		/// Live profile JSON
		#[arg(long, value_name = "PATH")]
		profile: PathBuf,
		/// Item instance id
		#[arg(long)]
		instance: String,
		/// Owning character id
		#[arg(long)]
		owner: Option<String>,
	},
	/// Write every resolved definition, one JSON line per item
	Dump {
		artifact: PathBuf,
		/// Output file (stdout if omitted)
		#[arg(long, short = 'o', value_name = "PATH")]
		output: Option<PathBuf>,
	},
	/// Compare an artifact's dump against a stored baseline dump
	Verify {
		artifact: PathBuf,
		baseline: PathBuf,
	},
	/// Check whether a cached artifact must be replaced
	Manifest {
		/// Remote manifest JSON
		remote: PathBuf,
		/// Cached manifest JSON
		#[arg(long, value_name = "PATH")]
		cached: Option<PathBuf>,
	},
}
