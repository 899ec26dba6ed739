//! Glint relay binary.
//!
//! Runs the live value channel outside an editor:
//! - `serve` broadcasts numbers typed on stdin to connected renderers
//! - `nudge` opens a headless nudge session on a shader file and drives it
//!   with line commands

mod command;
mod nudge;
mod serve;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use glint_channel::{ChannelConfig, LiveChannel};
use glint_config::Config;
use tracing::info;

/// Relay command line arguments.
#[derive(Parser, Debug)]
#[command(name = "glint-relay")]
#[command(about = "Live value channel relay for shader renderers")]
struct Args {
	/// Configuration file (TOML)
	#[arg(short, long, value_name = "PATH", global = true)]
	config: Option<PathBuf>,

	/// Port to listen on, overriding the configuration
	#[arg(short, long, global = true)]
	port: Option<u16>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Start the channel and broadcast each number read from stdin
	Serve,
	/// Nudge the literal at a position in a file, reading commands from stdin
	Nudge(NudgeArgs),
}

#[derive(ClapArgs, Debug)]
struct NudgeArgs {
	/// Shader source file
	#[arg(short, long, value_name = "PATH")]
	file: PathBuf,

	/// 1-based line of the literal
	#[arg(short, long)]
	line: u32,

	/// 1-based UTF-16 column inside the literal
	#[arg(long)]
	column: u32,

	/// Use the slider affordance instead of the number box
	#[arg(long)]
	slider: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	setup_tracing(args.verbose);

	let mut config = Config::load_or_default(args.config.as_deref()).context("loading configuration")?;
	if let Some(port) = args.port {
		config.channel.port = port;
	}

	let channel = LiveChannel::new(ChannelConfig {
		addr: config.channel.socket_addr()?,
		start_timeout: config.channel.start_timeout(),
		stop_timeout: config.channel.stop_timeout(),
	});
	info!(addr = %channel.config().addr, "starting glint-relay");

	match args.command {
		Command::Serve => serve::run(channel).await,
		Command::Nudge(nudge) => nudge::run(channel, &config, nudge).await,
	}
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_env("GLINT_LOG")
			.or_else(|_| EnvFilter::try_from_default_env())
			.unwrap_or_else(|_| {
				if verbose {
					EnvFilter::new("glint_relay=trace,debug")
				} else {
					EnvFilter::new("info")
				}
			})
	};

	// GLINT_LOG_DIR sends logs to a per-process file instead of stderr
	if let Some(log_dir) = std::env::var("GLINT_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("glint-relay.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);

			tracing_subscriber::registry()
				.with(filter())
				.with(file_layer)
				.init();

			tracing::info!(path = ?log_path, "Relay tracing initialized");
			return;
		}
	}

	tracing_subscriber::fmt()
		.with_env_filter(filter())
		.with_writer(std::io::stderr)
		.init();
}
