//! The nudge session state machine.
//!
//! ```text
//! Idle -> Scanning -> Staged -> Committing -> Idle
//!                            \-> Cancelling -> Idle
//! ```
//!
//! Every transition takes `&mut self`, so one machine never runs two
//! transitions at once. Failures are logged, force the machine back to
//! `Idle`, and come back as [`NudgeOutcome::Aborted`]; nothing panics or
//! returns an error out of the machine.

use std::path::PathBuf;
use std::sync::Arc;

use glint_placeholder::{Placeholder, PlaceholderError};
use glint_primitives::{Modifiers, TextHost, TextRange};
use glint_scanner::scan_at_position_or_selection;
use thiserror::Error;

use crate::affordance::Affordance;
use crate::persist::{FileStore, SaveOutcome};
use crate::session::EditSession;
use crate::sink::ValueSink;
use crate::stepping::{StepDirection, StepLadder};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeState {
	Idle,
	Scanning,
	Staged,
	Committing,
	Cancelling,
}

/// A transition failed; the machine is back to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NudgeError {
	#[error("failed to stage literal: {0}")]
	Stage(#[source] PlaceholderError),
	#[error("failed to commit value: {0}")]
	Commit(#[source] PlaceholderError),
	#[error("failed to restore literal: {0}")]
	Cancel(#[source] PlaceholderError),
}

/// What a transition did.
#[derive(Debug, Clone, PartialEq)]
pub enum NudgeOutcome {
	/// Nothing numeric under the caret or selection.
	NoMatch,
	/// A session opened on the literal at `range` with `value`.
	Opened { range: TextRange, value: f64 },
	/// The live value changed and was broadcast to `reached` receivers.
	Updated { value: f64, reached: usize },
	/// The session ended with `text` written in place of the literal.
	Committed { text: String, value: f64 },
	/// The session ended with the original literal restored.
	Cancelled,
	/// A transition failed.
	Aborted(NudgeError),
	/// The input does not apply in the current state.
	Ignored,
}

/// Drives one editor's nudge sessions.
///
/// `H` is the text being edited and `A` the affordance strategy. The value
/// sink and file store are shared collaborators.
pub struct NudgeMachine<H, A> {
	host: H,
	affordance: A,
	sink: Arc<dyn ValueSink>,
	store: Arc<dyn FileStore>,
	path: Option<PathBuf>,
	placeholder: Placeholder,
	ladder: StepLadder,
	save_on_finish: bool,
	state: NudgeState,
	session: Option<EditSession>,
}

impl<H, A> NudgeMachine<H, A>
where
	H: TextHost,
	A: Affordance,
{
	pub fn new(host: H, affordance: A, sink: Arc<dyn ValueSink>, store: Arc<dyn FileStore>) -> Self {
		Self {
			host,
			affordance,
			sink,
			store,
			path: None,
			placeholder: Placeholder::default(),
			ladder: StepLadder::default(),
			save_on_finish: true,
			state: NudgeState::Idle,
			session: None,
		}
	}

	/// Sets the document's backing file. Without one, sessions never save.
	pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.path = Some(path.into());
		self
	}

	pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
		self.placeholder = placeholder;
		self
	}

	pub fn with_ladder(mut self, ladder: StepLadder) -> Self {
		self.ladder = ladder;
		self
	}

	pub fn with_save_on_finish(mut self, save: bool) -> Self {
		self.save_on_finish = save;
		self
	}

	pub fn state(&self) -> NudgeState {
		self.state
	}

	pub fn session(&self) -> Option<&EditSession> {
		self.session.as_ref()
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	/// Mutable access to the text, for edits made outside a session.
	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	pub fn affordance(&self) -> &A {
		&self.affordance
	}

	/// The trigger gesture: opens a session on the literal under the caret or
	/// selection, or commits the open one.
	pub async fn trigger(&mut self) -> NudgeOutcome {
		match self.state {
			NudgeState::Idle => self.open(),
			NudgeState::Staged => self.commit().await,
			_ => NudgeOutcome::Ignored,
		}
	}

	fn open(&mut self) -> NudgeOutcome {
		self.state = NudgeState::Scanning;
		let cursor = self.host.cursor();
		let selection = self.host.selection();
		let Some(found) = scan_at_position_or_selection(&self.host, cursor, selection) else {
			tracing::debug!(?cursor, "No literal under caret");
			self.state = NudgeState::Idle;
			return NudgeOutcome::NoMatch;
		};

		let staged = match self.placeholder.stage(&mut self.host, &found) {
			Ok(staged) => staged,
			Err(e) => return self.abort(NudgeError::Stage(e)),
		};

		let session = EditSession::new(found, staged);
		let value = session.original_value;
		self.affordance.open(session.anchor.range, value);
		let reached = self.sink.send_value(value);
		tracing::debug!(
			range = ?session.anchor.range,
			original = %session.original_text,
			value,
			reached,
			"Nudge session opened"
		);
		self.session = Some(session);
		self.state = NudgeState::Staged;
		NudgeOutcome::Opened { range: staged, value }
	}

	/// Sets the live value and broadcasts it. Non-finite values are ignored.
	pub fn value_changed(&mut self, value: f64) -> NudgeOutcome {
		if !value.is_finite() {
			tracing::trace!(value, "Ignoring non-finite value");
			return NudgeOutcome::Ignored;
		}
		if self.state != NudgeState::Staged {
			return NudgeOutcome::Ignored;
		}
		let Some(session) = self.session.as_mut() else {
			return NudgeOutcome::Ignored;
		};
		session.current_value = value;
		self.affordance.show_value(value);
		let reached = self.sink.send_value(value);
		tracing::trace!(value, reached, "Live value changed");
		NudgeOutcome::Updated { value, reached }
	}

	/// Moves the live value one rung of the step ladder.
	pub fn step(&mut self, direction: StepDirection, modifiers: Modifiers) -> NudgeOutcome {
		let Some(current) = self.session.as_ref().map(|s| s.current_value) else {
			return NudgeOutcome::Ignored;
		};
		let next = self.ladder.apply(current, direction, modifiers);
		self.value_changed(next)
	}

	/// Applies an optional final value, then commits.
	pub async fn confirm(&mut self, value: Option<f64>) -> NudgeOutcome {
		if self.state != NudgeState::Staged {
			return NudgeOutcome::Ignored;
		}
		if let Some(value) = value {
			self.value_changed(value);
		}
		self.commit().await
	}

	/// Writes the live value over the placeholder and ends the session.
	pub async fn commit(&mut self) -> NudgeOutcome {
		let Some(session) = self.take_session(NudgeState::Committing) else {
			return NudgeOutcome::Ignored;
		};

		let text = match self.placeholder.commit(
			&mut self.host,
			session.staged_range,
			session.current_value,
			session.preceding_operator(),
		) {
			Ok(text) => text,
			Err(e) => return self.abort(NudgeError::Commit(e)),
		};

		self.persist().await;
		let written = TextRange::spanning_text(session.staged_range.start(), &text);
		self.host.set_cursor(written.end());
		self.finish();
		tracing::debug!(%text, value = session.current_value, "Nudge session committed");
		NudgeOutcome::Committed {
			text,
			value: session.current_value,
		}
	}

	/// Restores the original literal and ends the session. A no-op when idle.
	pub async fn cancel(&mut self) -> NudgeOutcome {
		let Some(session) = self.take_session(NudgeState::Cancelling) else {
			return NudgeOutcome::Ignored;
		};

		if let Err(e) = self
			.placeholder
			.cancel(&mut self.host, session.staged_range, &session.original_text)
		{
			return self.abort(NudgeError::Cancel(e));
		}

		self.sink.send_value(session.original_value);
		self.persist().await;
		let restored = TextRange::spanning_text(session.staged_range.start(), &session.original_text);
		self.host.set_cursor(restored.end());
		self.finish();
		tracing::debug!(original = %session.original_text, "Nudge session cancelled");
		NudgeOutcome::Cancelled
	}

	/// Cancels any open session; call when the editor goes away.
	pub async fn teardown(&mut self) -> NudgeOutcome {
		self.cancel().await
	}

	fn take_session(&mut self, next: NudgeState) -> Option<EditSession> {
		if self.state != NudgeState::Staged {
			return None;
		}
		let session = self.session.take()?;
		self.state = next;
		Some(session)
	}

	fn finish(&mut self) {
		self.affordance.close();
		self.session = None;
		self.state = NudgeState::Idle;
	}

	fn abort(&mut self, error: NudgeError) -> NudgeOutcome {
		tracing::warn!(state = ?self.state, %error, "Nudge transition failed");
		self.finish();
		NudgeOutcome::Aborted(error)
	}

	async fn persist(&mut self) {
		if !self.save_on_finish {
			return;
		}
		let Some(path) = self.path.clone() else {
			tracing::debug!("Document has no path; skipping save");
			return;
		};
		let content = self.host.text();
		match self.store.save(&path, &content).await {
			Ok(SaveOutcome {
				formatted_content: Some(formatted),
			}) if formatted != content => {
				tracing::debug!(path = %path.display(), "Applying formatted content");
				self.host.set_text(&formatted);
			}
			Ok(_) => {}
			Err(e) => {
				tracing::warn!(path = %path.display(), error = %e, "Failed to save document");
			}
		}
	}
}
