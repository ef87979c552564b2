//! Folio command line tool.
//!
//! Renders markdown files the way the editor preview does, prints table
//! skeletons and shows the effective editor configuration.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_editor::EditorConfig;
use folio_editor::insert::generate_table_with;
use folio_render::Renderer;
use tracing::{info, warn};

/// Folio command line arguments.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Markdown editor core tools")]
struct Args {
	/// Editor configuration file (TOML)
	#[arg(short, long, value_name = "PATH", global = true)]
	config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
	/// Render a markdown file to preview HTML on stdout
	Render {
		/// Markdown file to render
		file: PathBuf,
	},
	/// Print a markdown table skeleton
	Table {
		/// Number of data rows
		rows: usize,
		/// Number of columns
		cols: usize,
	},
	/// Print the effective configuration as TOML
	Config,
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if args.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::WARN
		})
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let config = match &args.config {
		Some(path) => EditorConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
		None => EditorConfig::default(),
	};

	match args.command {
		Cmd::Render { file } => {
			let source = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
			let preview = Renderer::new(config.render).render(&source);
			for diagnostic in &preview.diagnostics {
				warn!(
					index = diagnostic.index,
					source = %diagnostic.source,
					error = %diagnostic.error,
					"formula failed to render"
				);
			}
			info!(file = %file.display(), bytes = preview.html.len(), "rendered");
			print!("{}", preview.html);
		}
		Cmd::Table { rows, cols } => {
			print!("{}", generate_table_with(rows, cols, &config.table));
		}
		Cmd::Config => {
			print!("{}", config.to_toml_string()?);
		}
	}

	Ok(())
}
