//! Headless nudge session driven by stdin.

use std::sync::Arc;

use anyhow::{Context, bail};
use glint_channel::LiveChannel;
use glint_config::Config;
use glint_nudge::{
	Affordance, FsFileStore, NudgeMachine, NudgeOutcome, NudgeState, NumberBoxAffordance, SliderAffordance, StepLadder,
};
use glint_placeholder::Placeholder;
use glint_primitives::{RopeBuffer, TextPosition};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::NudgeArgs;
use crate::command::Command;

/// An affordance the relay can drive from text commands.
trait Gauge: Affordance {
	/// Value for a slider drag to `fraction`, if this affordance is a slider.
	fn drag(&self, _fraction: f64) -> Option<f64> {
		None
	}
}

impl Gauge for NumberBoxAffordance {}

impl Gauge for SliderAffordance {
	fn drag(&self, fraction: f64) -> Option<f64> {
		self.value_at(fraction)
	}
}

pub async fn run(channel: LiveChannel, config: &Config, args: NudgeArgs) -> anyhow::Result<()> {
	if args.slider {
		session(channel, config, args, SliderAffordance::new()).await
	} else {
		session(channel, config, args, NumberBoxAffordance::new()).await
	}
}

async fn session<A: Gauge>(channel: LiveChannel, config: &Config, args: NudgeArgs, affordance: A) -> anyhow::Result<()> {
	let text = tokio::fs::read_to_string(&args.file)
		.await
		.with_context(|| format!("reading {}", args.file.display()))?;
	let placeholder = Placeholder::new(config.nudge.placeholder.clone())?;
	let ladder = StepLadder::new(config.nudge.step_ladder.clone())?;

	// A missing renderer link must not prevent editing.
	if let Err(e) = channel.start().await {
		tracing::warn!(error = %e, "Live value channel unavailable; values will not be streamed");
	}

	let host = RopeBuffer::new(&text).with_cursor(TextPosition::new(args.line, args.column));
	let mut machine = NudgeMachine::new(host, affordance, Arc::new(channel.clone()), Arc::new(FsFileStore))
		.with_path(&args.file)
		.with_placeholder(placeholder)
		.with_ladder(ladder)
		.with_save_on_finish(config.nudge.save_on_finish);

	let opened = machine.trigger().await;
	report(&opened);
	if machine.state() != NudgeState::Staged {
		channel.stop().await;
		match opened {
			NudgeOutcome::Aborted(e) => return Err(e.into()),
			_ => bail!("no numeric literal at {}:{}", args.line, args.column),
		}
	}

	let mut lines = BufReader::new(tokio::io::stdin()).lines();
	while machine.state() == NudgeState::Staged {
		let Some(line) = lines.next_line().await? else {
			tracing::info!("stdin closed; cancelling");
			report(&machine.cancel().await);
			break;
		};
		if line.trim().is_empty() {
			continue;
		}
		let command = match line.parse::<Command>() {
			Ok(command) => command,
			Err(e) => {
				tracing::warn!(error = %e, "Ignoring input");
				continue;
			}
		};
		let outcome = match command {
			Command::Set(value) => machine.value_changed(value),
			Command::Step(direction, modifiers) => machine.step(direction, modifiers),
			Command::Drag(fraction) => match machine.affordance().drag(fraction) {
				Some(value) => machine.value_changed(value),
				None => {
					tracing::warn!("drag needs --slider");
					continue;
				}
			},
			Command::Commit => machine.confirm(None).await,
			Command::Cancel => machine.cancel().await,
			Command::Toggle => machine.trigger().await,
		};
		report(&outcome);
	}

	channel.stop().await;
	Ok(())
}

fn report(outcome: &NudgeOutcome) {
	match outcome {
		NudgeOutcome::NoMatch => tracing::warn!("No numeric literal under the caret"),
		NudgeOutcome::Opened { range, value } => tracing::info!(?range, value, "Nudging literal"),
		NudgeOutcome::Updated { value, reached } => tracing::info!(value, reached, "Value"),
		NudgeOutcome::Committed { text, .. } => tracing::info!(%text, "Committed"),
		NudgeOutcome::Cancelled => tracing::info!("Cancelled; original literal restored"),
		NudgeOutcome::Aborted(e) => tracing::error!(error = %e, "Nudge aborted"),
		NudgeOutcome::Ignored => tracing::debug!("Ignored"),
	}
}
