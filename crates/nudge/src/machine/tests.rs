use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use glint_channel::LiveChannel;
use glint_primitives::{RopeBuffer, Selection, TextPosition};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use super::*;
use crate::affordance::{NumberBoxAffordance, SliderAffordance};
use crate::persist::{FsFileStore, PersistError};

const PATH: &str = "/virtual/shader.frag";

#[derive(Default)]
struct RecordingSink {
	values: Mutex<Vec<f64>>,
}

impl RecordingSink {
	fn values(&self) -> Vec<f64> {
		self.values.lock().clone()
	}
}

impl ValueSink for RecordingSink {
	fn send_value(&self, value: f64) -> usize {
		self.values.lock().push(value);
		1
	}
}

#[derive(Default)]
struct MemoryStore {
	saves: Mutex<Vec<(PathBuf, String)>>,
	formatter: Option<fn(&str) -> String>,
	fail: bool,
}

impl MemoryStore {
	fn saves(&self) -> Vec<(PathBuf, String)> {
		self.saves.lock().clone()
	}
}

#[async_trait]
impl FileStore for MemoryStore {
	async fn save(&self, path: &Path, content: &str) -> Result<SaveOutcome, PersistError> {
		if self.fail {
			return Err(PersistError::Rejected {
				path: path.to_path_buf(),
				reason: "read-only".into(),
			});
		}
		self.saves.lock().push((path.to_path_buf(), content.to_string()));
		Ok(SaveOutcome {
			formatted_content: self.formatter.map(|f| f(content)),
		})
	}
}

struct Fixture<A> {
	machine: NudgeMachine<RopeBuffer, A>,
	sink: Arc<RecordingSink>,
	store: Arc<MemoryStore>,
}

fn fixture_with<A: Affordance>(host: RopeBuffer, affordance: A, store: MemoryStore) -> Fixture<A> {
	let sink = Arc::new(RecordingSink::default());
	let store = Arc::new(store);
	let machine = NudgeMachine::new(host, affordance, sink.clone(), store.clone()).with_path(PATH);
	Fixture { machine, sink, store }
}

fn fixture(text: &str, line: u32, column: u32) -> Fixture<NumberBoxAffordance> {
	let host = RopeBuffer::new(text).with_cursor(TextPosition::new(line, column));
	fixture_with(host, NumberBoxAffordance::new(), MemoryStore::default())
}

fn saved(content: &str) -> Vec<(PathBuf, String)> {
	vec![(PathBuf::from(PATH), content.to_string())]
}

#[tokio::test]
async fn trigger_stages_and_broadcasts_original() {
	let mut f = fixture("x - 1.0f;", 1, 5);
	let outcome = f.machine.trigger().await;
	assert_eq!(
		outcome,
		NudgeOutcome::Opened {
			range: TextRange::on_line(1, 5, 10),
			value: 1.0,
		}
	);
	assert_eq!(f.machine.state(), NudgeState::Staged);
	assert_eq!(f.machine.host().text(), "x - u_inline1f;");
	assert_eq!(f.sink.values(), vec![1.0]);

	let affordance = f.machine.affordance();
	assert!(affordance.is_open());
	assert_eq!(affordance.anchor(), Some(TextRange::on_line(1, 5, 4)));
	assert_eq!(affordance.text(), "1");

	let session = f.machine.session().unwrap();
	assert_eq!(session.original_text, "1.0f");
	assert_eq!(session.preceding_operator(), Some("-"));
}

#[tokio::test]
async fn trigger_without_literal_stays_idle() {
	let mut f = fixture("float x;", 1, 3);
	assert_eq!(f.machine.trigger().await, NudgeOutcome::NoMatch);
	assert_eq!(f.machine.state(), NudgeState::Idle);
	assert!(f.machine.session().is_none());
	assert!(f.sink.values().is_empty());
	assert!(f.store.saves().is_empty());
	assert_eq!(f.machine.host().text(), "float x;");
}

#[tokio::test]
async fn live_values_are_broadcast_and_non_finite_ignored() {
	let mut f = fixture("k = 1.0;", 1, 5);
	f.machine.trigger().await;
	assert_eq!(
		f.machine.value_changed(0.5),
		NudgeOutcome::Updated { value: 0.5, reached: 1 }
	);
	assert_eq!(f.machine.value_changed(f64::NAN), NudgeOutcome::Ignored);
	assert_eq!(f.machine.value_changed(f64::INFINITY), NudgeOutcome::Ignored);
	f.machine.value_changed(0.75);

	assert_eq!(f.sink.values(), vec![1.0, 0.5, 0.75]);
	assert_eq!(f.machine.session().unwrap().current_value, 0.75);
	assert_eq!(f.machine.affordance().text(), "0.75");
}

#[tokio::test]
async fn value_change_while_idle_is_ignored() {
	let mut f = fixture("k = 1.0;", 1, 5);
	assert_eq!(f.machine.value_changed(2.0), NudgeOutcome::Ignored);
	assert!(f.sink.values().is_empty());
}

#[tokio::test]
async fn commit_parenthesizes_negative_after_minus() {
	let mut f = fixture("x - 1.0f;", 1, 5);
	f.machine.trigger().await;
	f.machine.value_changed(-2.5);
	let outcome = f.machine.commit().await;

	assert_eq!(
		outcome,
		NudgeOutcome::Committed {
			text: "(-2.5)".into(),
			value: -2.5,
		}
	);
	assert_eq!(f.machine.host().text(), "x - (-2.5);");
	assert_eq!(f.machine.host().cursor(), TextPosition::new(1, 11));
	assert_eq!(f.store.saves(), saved("x - (-2.5);"));
	assert!(!f.machine.affordance().is_open());
	assert_eq!(f.machine.state(), NudgeState::Idle);
	assert!(f.machine.session().is_none());
}

#[tokio::test]
async fn commit_keeps_bare_negative_after_plus() {
	let mut f = fixture("x + 1.0f", 1, 5);
	f.machine.trigger().await;
	f.machine.value_changed(-2.5);
	f.machine.commit().await;
	assert_eq!(f.machine.host().text(), "x + -2.5");
}

#[tokio::test]
async fn second_trigger_commits_open_session() {
	let mut f = fixture("k = 1.0;", 1, 5);
	f.machine.trigger().await;
	f.machine.value_changed(2.0);
	let outcome = f.machine.trigger().await;
	assert_eq!(
		outcome,
		NudgeOutcome::Committed {
			text: "2".into(),
			value: 2.0,
		}
	);
	assert_eq!(f.machine.host().text(), "k = 2;");
	assert_eq!(f.machine.state(), NudgeState::Idle);
}

#[tokio::test]
async fn cancel_restores_text_and_value() {
	let mut f = fixture("vec4(1.0f);", 1, 6);
	f.machine.trigger().await;
	f.machine.value_changed(3.0);
	assert_eq!(f.machine.cancel().await, NudgeOutcome::Cancelled);

	assert_eq!(f.machine.host().text(), "vec4(1.0f);");
	assert_eq!(f.machine.host().cursor(), TextPosition::new(1, 10));
	assert_eq!(f.sink.values(), vec![1.0, 3.0, 1.0]);
	assert_eq!(f.store.saves(), saved("vec4(1.0f);"));
	assert!(!f.machine.affordance().is_open());
	assert_eq!(f.machine.state(), NudgeState::Idle);
}

#[tokio::test]
async fn cancel_and_commit_when_idle_are_noops() {
	let mut f = fixture("k = 1.0;", 1, 5);
	assert_eq!(f.machine.cancel().await, NudgeOutcome::Ignored);
	assert_eq!(f.machine.commit().await, NudgeOutcome::Ignored);
	assert_eq!(f.machine.confirm(Some(2.0)).await, NudgeOutcome::Ignored);
	assert!(f.store.saves().is_empty());
	assert!(f.sink.values().is_empty());
	assert_eq!(f.machine.host().text(), "k = 1.0;");
}

#[tokio::test]
async fn stepping_uses_ladder_and_rounds() {
	let mut f = fixture("k = 0.2;", 1, 5);
	f.machine.trigger().await;
	assert_eq!(
		f.machine.step(StepDirection::Up, Modifiers::CTRL),
		NudgeOutcome::Updated { value: 0.3, reached: 1 }
	);
	assert_eq!(
		f.machine.step(StepDirection::Up, Modifiers::CTRL.shift()),
		NudgeOutcome::Updated { value: 0.31, reached: 1 }
	);
	assert_eq!(
		f.machine.step(StepDirection::Down, Modifiers::NONE),
		NudgeOutcome::Updated { value: -1.0, reached: 1 }
	);
	f.machine.commit().await;
	assert_eq!(f.machine.host().text(), "k = -1;");
}

#[tokio::test]
async fn step_while_idle_is_ignored() {
	let mut f = fixture("k = 0.2;", 1, 5);
	assert_eq!(f.machine.step(StepDirection::Up, Modifiers::NONE), NudgeOutcome::Ignored);
}

#[tokio::test]
async fn confirm_applies_final_value() {
	let mut f = fixture("k = 1.0;", 1, 5);
	f.machine.trigger().await;
	let outcome = f.machine.confirm(Some(4.5)).await;
	assert_eq!(
		outcome,
		NudgeOutcome::Committed {
			text: "4.5".into(),
			value: 4.5,
		}
	);
	assert_eq!(f.sink.values(), vec![1.0, 4.5]);
}

#[tokio::test]
async fn stage_failure_returns_to_idle_without_saving() {
	let mut f = fixture("float a = u_inline1f;\nfloat b = 2.0;", 2, 11);
	let outcome = f.machine.trigger().await;
	assert_eq!(
		outcome,
		NudgeOutcome::Aborted(NudgeError::Stage(PlaceholderError::Collision("u_inline1f".into())))
	);
	assert_eq!(f.machine.state(), NudgeState::Idle);
	assert!(f.sink.values().is_empty());
	assert!(f.store.saves().is_empty());
	assert!(!f.machine.affordance().is_open());
	assert_eq!(f.machine.host().text(), "float a = u_inline1f;\nfloat b = 2.0;");
}

#[tokio::test]
async fn commit_failure_after_concurrent_edit_returns_to_idle() {
	let mut f = fixture("k = 1.0;", 1, 5);
	f.machine.trigger().await;
	f.machine.host_mut().set_text("k = other_value;");

	let outcome = f.machine.commit().await;
	assert!(matches!(
		outcome,
		NudgeOutcome::Aborted(NudgeError::Commit(PlaceholderError::PlaceholderMissing { .. }))
	));
	assert_eq!(f.machine.state(), NudgeState::Idle);
	assert!(f.machine.session().is_none());
	assert!(!f.machine.affordance().is_open());
	assert!(f.store.saves().is_empty());
	assert_eq!(f.machine.host().text(), "k = other_value;");
}

#[tokio::test]
async fn cancel_failure_returns_to_idle() {
	let mut f = fixture("k = 1.0;\nm = 2.0;", 2, 5);
	f.machine.trigger().await;
	f.machine.host_mut().set_text("k = 1.0;");
	let outcome = f.machine.cancel().await;
	assert!(matches!(outcome, NudgeOutcome::Aborted(NudgeError::Cancel(_))));
	assert_eq!(f.machine.state(), NudgeState::Idle);
}

#[tokio::test]
async fn formatted_content_replaces_buffer() {
	let host = RopeBuffer::new("k = 1.0;").with_cursor(TextPosition::new(1, 5));
	let store = MemoryStore {
		formatter: Some(|content| format!("{content}\n")),
		..MemoryStore::default()
	};
	let mut f = fixture_with(host, NumberBoxAffordance::new(), store);
	f.machine.trigger().await;
	f.machine.value_changed(3.0);
	f.machine.commit().await;

	assert_eq!(f.store.saves(), saved("k = 3;"));
	assert_eq!(f.machine.host().text(), "k = 3;\n");
}

#[tokio::test]
async fn unchanged_formatting_leaves_buffer_alone() {
	let host = RopeBuffer::new("k = 1.0;").with_cursor(TextPosition::new(1, 5));
	let store = MemoryStore {
		formatter: Some(str::to_string),
		..MemoryStore::default()
	};
	let mut f = fixture_with(host, NumberBoxAffordance::new(), store);
	f.machine.trigger().await;
	f.machine.commit().await;
	assert_eq!(f.machine.host().text(), "k = 1;");
	assert_eq!(f.machine.host().cursor(), TextPosition::new(1, 6));
}

#[tokio::test]
async fn save_failure_does_not_block_idle() {
	let host = RopeBuffer::new("k = 1.0;").with_cursor(TextPosition::new(1, 5));
	let store = MemoryStore {
		fail: true,
		..MemoryStore::default()
	};
	let mut f = fixture_with(host, NumberBoxAffordance::new(), store);
	f.machine.trigger().await;
	f.machine.value_changed(7.0);
	let outcome = f.machine.commit().await;
	assert!(matches!(outcome, NudgeOutcome::Committed { .. }));
	assert_eq!(f.machine.host().text(), "k = 7;");
	assert_eq!(f.machine.state(), NudgeState::Idle);
}

#[tokio::test]
async fn no_path_or_disabled_save_skips_store() {
	let sink = Arc::new(RecordingSink::default());
	let store = Arc::new(MemoryStore::default());
	let host = RopeBuffer::new("k = 1.0;").with_cursor(TextPosition::new(1, 5));
	let mut machine = NudgeMachine::new(host, NumberBoxAffordance::new(), sink.clone(), store.clone());
	machine.trigger().await;
	machine.commit().await;
	assert!(store.saves().is_empty());

	let host = RopeBuffer::new("k = 1.0;").with_cursor(TextPosition::new(1, 5));
	let mut machine = NudgeMachine::new(host, NumberBoxAffordance::new(), sink, store.clone())
		.with_path(PATH)
		.with_save_on_finish(false);
	machine.trigger().await;
	machine.cancel().await;
	assert!(store.saves().is_empty());
}

#[tokio::test]
async fn teardown_cancels_open_session() {
	let mut f = fixture("k = 1.0;", 1, 5);
	assert_eq!(f.machine.teardown().await, NudgeOutcome::Ignored);
	f.machine.trigger().await;
	f.machine.value_changed(9.0);
	assert_eq!(f.machine.teardown().await, NudgeOutcome::Cancelled);
	assert_eq!(f.machine.host().text(), "k = 1.0;");
}

#[tokio::test]
async fn selection_defines_the_literal() {
	let sel = Selection::new(TextPosition::new(1, 9), TextPosition::new(1, 16));
	let host = RopeBuffer::new("y = x - 2.5 * k;").with_selection(sel);
	let mut f = fixture_with(host, NumberBoxAffordance::new(), MemoryStore::default());
	assert!(matches!(f.machine.trigger().await, NudgeOutcome::Opened { value, .. } if value == 2.5));
	assert_eq!(f.machine.host().text(), "y = x - u_inline1f;");
	f.machine.confirm(Some(-1.0)).await;
	assert_eq!(f.machine.host().text(), "y = x - (-1);");
}

#[tokio::test]
async fn custom_placeholder_and_ladder() {
	let host = RopeBuffer::new("k = 1.0;").with_cursor(TextPosition::new(1, 5));
	let sink = Arc::new(RecordingSink::default());
	let mut machine = NudgeMachine::new(host, NumberBoxAffordance::new(), sink, Arc::new(MemoryStore::default()))
		.with_placeholder(Placeholder::new("u_live").unwrap())
		.with_ladder(StepLadder::new(vec![0.5]).unwrap());
	machine.trigger().await;
	assert_eq!(machine.host().text(), "k = u_live;");
	machine.step(StepDirection::Up, Modifiers::CTRL);
	machine.commit().await;
	assert_eq!(machine.host().text(), "k = 1.5;");
}

#[tokio::test]
async fn slider_drag_drives_value() {
	let host = RopeBuffer::new("k = 4.0;").with_cursor(TextPosition::new(1, 5));
	let mut f = fixture_with(host, SliderAffordance::new(), MemoryStore::default());
	f.machine.trigger().await;
	assert_eq!(f.machine.affordance().bounds(), Some((0.0, 8.0)));
	let dragged = f.machine.affordance().value_at(0.75).unwrap();
	f.machine.value_changed(dragged);
	assert_eq!(f.machine.affordance().value(), 6.0);
	f.machine.commit().await;
	assert_eq!(f.machine.host().text(), "k = 6;");
}

#[tokio::test]
async fn stopped_channel_is_a_valid_sink() {
	let host = RopeBuffer::new("k = 1.0;").with_cursor(TextPosition::new(1, 5));
	let channel = Arc::new(LiveChannel::default());
	let mut machine = NudgeMachine::new(host, NumberBoxAffordance::new(), channel, Arc::new(MemoryStore::default()));
	machine.trigger().await;
	assert_eq!(
		machine.value_changed(2.0),
		NudgeOutcome::Updated { value: 2.0, reached: 0 }
	);
	machine.commit().await;
	assert_eq!(machine.host().text(), "k = 2;");
}

#[tokio::test]
async fn fs_store_persists_committed_text() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("scene").join("main.frag");
	let host = RopeBuffer::new("float k = 0.5;\n").with_cursor(TextPosition::new(1, 11));
	let mut machine = NudgeMachine::new(
		host,
		NumberBoxAffordance::new(),
		Arc::new(RecordingSink::default()),
		Arc::new(FsFileStore),
	)
	.with_path(&path);
	machine.trigger().await;
	machine.confirm(Some(0.25)).await;
	assert_eq!(std::fs::read_to_string(&path).unwrap(), "float k = 0.25;\n");
}
