//! Nudge sessions.
//!
//! A nudge puts the numeric literal under the caret into a live-edit state:
//! the literal is swapped for a placeholder uniform, every value the user
//! picks is streamed to the renderer, and the session ends by writing the
//! final number back (commit) or restoring the original text (cancel).
//!
//! [`NudgeMachine`] owns the sequencing. Its collaborators are injected:
//! a [`TextHost`](glint_primitives::TextHost), an [`Affordance`] strategy, a
//! [`ValueSink`] and a [`FileStore`].

pub mod affordance;
mod machine;
pub mod persist;
mod session;
mod sink;
pub mod stepping;

pub use affordance::{Affordance, AffordanceKind, NumberBoxAffordance, SliderAffordance};
pub use machine::{NudgeError, NudgeMachine, NudgeOutcome, NudgeState};
pub use persist::{FileStore, FsFileStore, PersistError, SaveOutcome};
pub use session::EditSession;
pub use sink::ValueSink;
pub use stepping::{InvalidLadder, StepDirection, StepLadder};
