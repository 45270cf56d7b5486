//! Unit tests for token configuration parsing.

use std::collections::HashMap;
use std::io::Write;

use mockable::MockEnv;
use rstest::rstest;
use tempfile::NamedTempFile;

use super::*;

const GOOD_SECRET: &str = "0123456789abcdef0123456789abcdef";

fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn key_file(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents).expect("write key");
    file
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_str().expect("utf-8 temp path").to_owned()
}

#[rstest]
fn inline_secret_is_used_with_default_ttl() {
    let env = mock_env(&[(SECRET_ENV, GOOD_SECRET)]);
    let settings = token_settings_from_env(&env, BuildMode::Release).expect("settings");

    assert_eq!(settings.secret.as_slice(), GOOD_SECRET.as_bytes());
    assert_eq!(settings.ttl.num_seconds(), DEFAULT_TOKEN_TTL_SECONDS);
    assert!(!settings.ephemeral);
}

#[rstest]
fn inline_secret_wins_over_file() {
    let file = key_file(&[b'f'; 40]);
    let path = path_of(&file);
    let env = mock_env(&[(SECRET_ENV, GOOD_SECRET), (SECRET_FILE_ENV, &path)]);

    let settings = token_settings_from_env(&env, BuildMode::Release).expect("settings");
    assert_eq!(settings.secret.as_slice(), GOOD_SECRET.as_bytes());
}

#[rstest]
fn file_secret_drops_trailing_newline() {
    let file = key_file(format!("{GOOD_SECRET}\n").as_bytes());
    let path = path_of(&file);
    let env = mock_env(&[(SECRET_FILE_ENV, &path)]);

    let settings = token_settings_from_env(&env, BuildMode::Release).expect("settings");
    assert_eq!(settings.secret.as_slice(), GOOD_SECRET.as_bytes());
}

#[rstest]
fn unreadable_key_file_is_an_error() {
    let env = mock_env(&[(SECRET_FILE_ENV, "/nonexistent/jwt-secret")]);
    let err = token_settings_from_env(&env, BuildMode::Debug).expect_err("missing file");
    assert!(matches!(err, TokenConfigError::KeyRead { .. }));
}

#[rstest]
fn release_rejects_short_secret() {
    let env = mock_env(&[(SECRET_ENV, "short")]);
    let err = token_settings_from_env(&env, BuildMode::Release).expect_err("short secret");
    assert!(matches!(
        err,
        TokenConfigError::KeyTooShort {
            length: 5,
            min_len: SECRET_MIN_LEN
        }
    ));
}

#[rstest]
fn debug_accepts_short_secret() {
    let env = mock_env(&[(SECRET_ENV, "short")]);
    let settings = token_settings_from_env(&env, BuildMode::Debug).expect("settings");
    assert_eq!(settings.secret.as_slice(), b"short");
}

#[rstest]
fn release_requires_a_secret() {
    let env = mock_env(&[]);
    let err = token_settings_from_env(&env, BuildMode::Release).expect_err("no secret");
    assert!(matches!(err, TokenConfigError::MissingKey));
}

#[rstest]
fn release_refuses_ephemeral_keys() {
    let env = mock_env(&[(SECRET_ENV, GOOD_SECRET), (ALLOW_EPHEMERAL_ENV, "1")]);
    let err = token_settings_from_env(&env, BuildMode::Release).expect_err("ephemeral");
    assert!(matches!(err, TokenConfigError::EphemeralNotAllowed));
}

#[rstest]
fn debug_generates_ephemeral_secret() {
    let env = mock_env(&[]);
    let first = token_settings_from_env(&env, BuildMode::Debug).expect("settings");
    let second = token_settings_from_env(&env, BuildMode::Debug).expect("settings");

    assert!(first.ephemeral);
    assert_eq!(first.secret.len(), 32);
    assert_ne!(first.fingerprint(), second.fingerprint());
}

#[rstest]
fn debug_can_opt_out_of_ephemeral_secret() {
    let env = mock_env(&[(ALLOW_EPHEMERAL_ENV, "no")]);
    let err = token_settings_from_env(&env, BuildMode::Debug).expect_err("opted out");
    assert!(matches!(err, TokenConfigError::MissingKey));
}

#[rstest]
#[case("3600", 3600)]
#[case(" 60 ", 60)]
#[case("315360000", TTL_MAX_SECONDS)]
fn ttl_is_read_from_env(#[case] raw: &str, #[case] expected: i64) {
    let env = mock_env(&[(SECRET_ENV, GOOD_SECRET), (TTL_ENV, raw)]);
    let settings = token_settings_from_env(&env, BuildMode::Release).expect("settings");
    assert_eq!(settings.ttl.num_seconds(), expected);
}

#[rstest]
#[case("0")]
#[case("-5")]
#[case("soon")]
#[case("315360001")]
#[case("9000000000000")]
#[case("9223372036854775807")]
fn release_rejects_bad_ttl(#[case] raw: &str) {
    let env = mock_env(&[(SECRET_ENV, GOOD_SECRET), (TTL_ENV, raw)]);
    let err = token_settings_from_env(&env, BuildMode::Release).expect_err("bad ttl");
    assert!(matches!(
        err,
        TokenConfigError::InvalidEnv { name: TTL_ENV, .. }
    ));
}

#[rstest]
#[case("soon")]
#[case("9223372036854775807")]
fn debug_falls_back_to_default_ttl(#[case] raw: &str) {
    let env = mock_env(&[(SECRET_ENV, GOOD_SECRET), (TTL_ENV, raw)]);
    let settings = token_settings_from_env(&env, BuildMode::Debug).expect("settings");
    assert_eq!(settings.ttl.num_seconds(), DEFAULT_TOKEN_TTL_SECONDS);
}

#[rstest]
fn debug_output_hides_secret() {
    let env = mock_env(&[(SECRET_ENV, GOOD_SECRET)]);
    let settings = token_settings_from_env(&env, BuildMode::Release).expect("settings");
    let rendered = format!("{settings:?}");
    assert!(!rendered.contains(GOOD_SECRET));
    assert!(rendered.contains("<redacted>"));
}
