use super::*;

use std::{
    env, fs,
    sync::Mutex,
    time::{SystemTime, UNIX_EPOCH},
};

// load_settings_from reads process-global env vars; serialize the tests
// that call it.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn unique_settings_path(tag: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("support_settings_{tag}_{suffix}.toml"))
}

#[test]
fn defaults_keep_gateway_unconfigured() {
    let settings = Settings::default();
    assert_eq!(settings.target_count, 1);
    assert!(!settings.emailjs().is_configured());
}

#[test]
fn toml_file_overrides_defaults() {
    let _guard = ENV_LOCK.lock().expect("env lock");

    let path = unique_settings_path("overrides");
    fs::write(
        &path,
        concat!(
            "target_count = \"25\"\n",
            "notify_recipient = \"owner@example.org\"\n",
            "emailjs_service_id = \"service_live\"\n",
            "emailjs_template_id = \"template_live\"\n",
            "emailjs_public_key = \"pk_live\"\n",
        ),
    )
    .expect("write settings file");

    let settings = load_settings_from(&path);
    assert_eq!(settings.target_count, 25);
    assert_eq!(settings.notify_recipient, "owner@example.org");
    assert!(settings.emailjs().is_configured());
    assert_eq!(settings.emailjs().template_id, "template_live");

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn zero_or_unparsable_target_count_is_ignored() {
    let _guard = ENV_LOCK.lock().expect("env lock");

    let path = unique_settings_path("bad_target");
    fs::write(&path, "target_count = \"0\"\n").expect("write settings file");
    assert_eq!(load_settings_from(&path).target_count, 1);

    fs::write(&path, "target_count = \"plenty\"\n").expect("write settings file");
    assert_eq!(load_settings_from(&path).target_count, 1);

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn env_overrides_file_values() {
    let _guard = ENV_LOCK.lock().expect("env lock");

    let path = unique_settings_path("env");
    fs::write(
        &path,
        "target_count = \"5\"\nnotify_recipient = \"file@example.org\"\n",
    )
    .expect("write settings file");

    env::set_var("APP__TARGET_COUNT", "9");
    env::set_var("NOTIFY_RECIPIENT", "env@example.org");

    let settings = load_settings_from(&path);
    assert_eq!(settings.target_count, 9);
    assert_eq!(settings.notify_recipient, "env@example.org");

    env::remove_var("APP__TARGET_COUNT");
    env::remove_var("NOTIFY_RECIPIENT");
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let _guard = ENV_LOCK.lock().expect("env lock");

    let settings = load_settings_from(&unique_settings_path("missing"));
    assert_eq!(settings.target_count, Settings::default().target_count);
    assert_eq!(
        settings.notify_recipient,
        Settings::default().notify_recipient
    );
}
