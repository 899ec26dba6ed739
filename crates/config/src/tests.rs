use std::io::Write;
use std::time::Duration;

use super::*;

#[test]
fn empty_input_yields_defaults() {
	let config = Config::parse("").unwrap();
	assert_eq!(config, Config::default());
	assert_eq!(config.channel.port, 8765);
	assert_eq!(config.channel.socket_addr().unwrap().to_string(), "127.0.0.1:8765");
	assert_eq!(config.channel.start_timeout(), Duration::from_secs(5));
	assert_eq!(config.nudge.placeholder, "u_inline1f");
	assert_eq!(config.nudge.step_ladder, vec![1.0, 0.1, 0.01, 0.001]);
	assert!(config.nudge.save_on_finish);
}

#[test]
fn partial_tables_keep_other_defaults() {
	let config = Config::parse(
		r#"
[channel]
port = 9000

[nudge]
step_ladder = [0.5, 0.05]
"#,
	)
	.unwrap();
	assert_eq!(config.channel.port, 9000);
	assert_eq!(config.channel.host, "127.0.0.1");
	assert_eq!(config.nudge.step_ladder, vec![0.5, 0.05]);
	assert_eq!(config.nudge.placeholder, "u_inline1f");
}

#[test]
fn localhost_resolves_to_loopback() {
	let config = Config::parse("[channel]\nhost = \"localhost\"\nport = 0\n").unwrap();
	assert_eq!(config.channel.socket_addr().unwrap().to_string(), "127.0.0.1:0");
}

#[test]
fn unknown_keys_are_rejected() {
	assert!(matches!(Config::parse("[channel]\nprot = 1\n"), Err(ConfigError::Toml(_))));
	assert!(matches!(Config::parse("[renderer]\n"), Err(ConfigError::Toml(_))));
}

#[test]
fn invalid_values_are_rejected() {
	let cases = [
		("[channel]\nhost = \"not-an-ip\"\n", "channel.host"),
		("[channel]\nstart_timeout_ms = 0\n", "channel.start_timeout_ms"),
		("[channel]\nstop_timeout_ms = 0\n", "channel.stop_timeout_ms"),
		("[nudge]\nplaceholder = \"  \"\n", "nudge.placeholder"),
		("[nudge]\nplaceholder = \"1abc\"\n", "nudge.placeholder"),
		("[nudge]\nplaceholder = \"gl_live\"\n", "nudge.placeholder"),
		("[nudge]\nplaceholder = \"u-live\"\n", "nudge.placeholder"),
		("[nudge]\nstep_ladder = []\n", "nudge.step_ladder"),
		("[nudge]\nstep_ladder = [1.0, -0.1]\n", "nudge.step_ladder"),
		("[nudge]\nstep_ladder = [0.1, 1.0]\n", "nudge.step_ladder"),
		("[nudge]\nstep_ladder = [1.0, 1.0]\n", "nudge.step_ladder"),
		("[nudge]\nstep_ladder = [inf, 1.0]\n", "nudge.step_ladder"),
	];
	for (input, expected) in cases {
		match Config::parse(input) {
			Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected, "{input}"),
			other => panic!("{input}: expected invalid {expected}, got {other:?}"),
		}
	}
}

#[test]
fn load_reads_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(file, "[nudge]\nsave_on_finish = false").unwrap();
	let config = Config::load(file.path()).unwrap();
	assert!(!config.nudge.save_on_finish);

	let explicit = Config::load_or_default(Some(file.path())).unwrap();
	assert_eq!(explicit, config);
}

#[test]
fn explicit_missing_file_is_an_error() {
	let dir = tempfile::tempdir().unwrap();
	let missing = dir.path().join("nope.toml");
	let err = Config::load_or_default(Some(&missing)).unwrap_err();
	assert!(matches!(err, ConfigError::Io { ref path, .. } if *path == missing));
}
