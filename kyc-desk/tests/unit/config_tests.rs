use kyc_desk::config::{ConfigScope, ConfigStore};
use kyc_desk::domain::{BackendConfig, DEFAULT_API_URL, RootConfig, WorkflowSettings};
use std::fs;
use tempfile::{TempDir, tempdir};

fn store_in(tmp: &TempDir) -> ConfigStore {
    ConfigStore::with_roots(tmp.path().join("local"), Some(tmp.path().join("global")))
}

fn backend(url: &str) -> BackendConfig {
    BackendConfig {
        url: url.to_string(),
        ..BackendConfig::default()
    }
}

#[test]
fn resolves_builtin_default_without_profiles() {
    let tmp = tempdir().unwrap();
    let store = store_in(&tmp);

    let resolved = store.resolve_backend(None, None, None).unwrap();
    assert!(resolved.name.is_none());
    assert_eq!(resolved.config.url, DEFAULT_API_URL);
    assert_eq!(resolved.config.timeout_secs, 120);
}

#[test]
fn saved_backend_is_normalized_and_loadable() {
    let tmp = tempdir().unwrap();
    let store = store_in(&tmp);

    store
        .save_profile(ConfigScope::Local, "staging", &backend("  https://kyc.staging/ "))
        .unwrap();

    let profile = store.profile("staging", None).unwrap().unwrap();
    assert_eq!(profile.scope, ConfigScope::Local);
    assert_eq!(profile.config.url, "https://kyc.staging");

    let raw = fs::read_to_string(tmp.path().join("local/backends/staging.toml")).unwrap();
    assert!(raw.contains("url = \"https://kyc.staging\""));
}

#[test]
fn local_profile_shadows_global_profile() {
    let tmp = tempdir().unwrap();
    let store = store_in(&tmp);

    store
        .save_profile(ConfigScope::Global, "prod", &backend("https://global.prod"))
        .unwrap();
    store
        .save_profile(ConfigScope::Global, "shared", &backend("https://shared"))
        .unwrap();
    store
        .save_profile(ConfigScope::Local, "prod", &backend("https://local.prod"))
        .unwrap();

    let profiles = store.profiles().unwrap();
    let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["prod", "shared"]);
    assert_eq!(profiles[0].scope, ConfigScope::Local);
    assert_eq!(profiles[0].config.url, "https://local.prod");
    assert_eq!(profiles[1].scope, ConfigScope::Global);

    let global = store
        .profile("prod", Some(ConfigScope::Global))
        .unwrap()
        .unwrap();
    assert_eq!(global.config.url, "https://global.prod");
    assert!(
        store
            .profile("shared", Some(ConfigScope::Local))
            .unwrap()
            .is_none()
    );
}

#[test]
fn active_backend_comes_from_root_config() {
    let tmp = tempdir().unwrap();
    let store = store_in(&tmp);

    store
        .save_profile(ConfigScope::Local, "staging", &backend("https://kyc.staging"))
        .unwrap();
    store
        .save_settings(
            ConfigScope::Local,
            &RootConfig {
                current_backend: Some("staging".to_string()),
                ..RootConfig::default()
            },
        )
        .unwrap();

    let resolved = store.resolve_backend(None, None, None).unwrap();
    assert_eq!(resolved.name.as_deref(), Some("staging"));
    assert_eq!(resolved.config.url, "https://kyc.staging");
}

#[test]
fn missing_active_backend_is_an_error() {
    let tmp = tempdir().unwrap();
    let store = store_in(&tmp);

    store
        .save_settings(
            ConfigScope::Global,
            &RootConfig {
                current_backend: Some("gone".to_string()),
                ..RootConfig::default()
            },
        )
        .unwrap();

    let err = store.resolve_backend(None, None, None).unwrap_err();
    assert!(err.to_string().contains("gone"));
}

#[test]
fn url_override_beats_environment_and_profile() {
    let tmp = tempdir().unwrap();
    let store = store_in(&tmp);
    store
        .save_profile(ConfigScope::Local, "staging", &backend("https://kyc.staging"))
        .unwrap();

    let from_env = store
        .resolve_backend(
            Some("staging".to_string()),
            None,
            Some("http://env:8000/".to_string()),
        )
        .unwrap();
    assert_eq!(from_env.config.url, "http://env:8000");
    assert_eq!(from_env.name.as_deref(), Some("staging"));

    let from_flag = store
        .resolve_backend(
            Some("staging".to_string()),
            Some("http://flag:9000".to_string()),
            Some("http://env:8000".to_string()),
        )
        .unwrap();
    assert_eq!(from_flag.config.url, "http://flag:9000");

    let blank_flag = store
        .resolve_backend(None, Some("   ".to_string()), None)
        .unwrap();
    assert_eq!(blank_flag.config.url, DEFAULT_API_URL);
}

#[test]
fn unknown_requested_backend_is_an_error() {
    let tmp = tempdir().unwrap();
    let store = store_in(&tmp);

    let err = store
        .resolve_backend(Some("nope".to_string()), None, None)
        .unwrap_err();
    assert!(err.to_string().contains("nope"));
}

#[test]
fn remove_only_touches_the_given_scope() {
    let tmp = tempdir().unwrap();
    let store = store_in(&tmp);

    store
        .save_profile(ConfigScope::Global, "prod", &backend("https://prod"))
        .unwrap();
    assert!(store.remove_profile(ConfigScope::Local, "prod").is_err());
    assert!(
        store
            .profile("prod", Some(ConfigScope::Global))
            .unwrap()
            .is_some()
    );

    store.remove_profile(ConfigScope::Global, "prod").unwrap();
    assert!(store.profile("prod", None).unwrap().is_none());
}

#[test]
fn local_root_settings_override_global() {
    let tmp = tempdir().unwrap();
    let store = store_in(&tmp);

    fs::create_dir_all(tmp.path().join("global")).unwrap();
    fs::write(
        tmp.path().join("global/config.toml"),
        "current_backend = \"prod\"\n\n[workflow]\nphase_interval_ms = 500\nrequest_timeout_secs = 30\n",
    )
    .unwrap();
    fs::create_dir_all(tmp.path().join("local")).unwrap();
    fs::write(
        tmp.path().join("local/config.toml"),
        "[workflow]\nphase_interval_ms = 250\n",
    )
    .unwrap();

    let cfg = store.settings().unwrap();
    assert_eq!(cfg.current_backend.as_deref(), Some("prod"));
    assert_eq!(
        cfg.workflow,
        WorkflowSettings {
            phase_interval_ms: Some(250),
            reveal_interval_ms: None,
            request_timeout_secs: Some(30),
        }
    );

    let local_only = store.scope_settings(ConfigScope::Local).unwrap();
    assert!(local_only.current_backend.is_none());
}

#[test]
fn malformed_profile_reports_the_path() {
    let tmp = tempdir().unwrap();
    let store = store_in(&tmp);

    fs::create_dir_all(tmp.path().join("local/backends")).unwrap();
    fs::write(tmp.path().join("local/backends/bad.toml"), "url = [").unwrap();

    let err = store.profile("bad", None).unwrap_err();
    assert!(format!("{err:#}").contains("bad.toml"));
}

#[test]
fn invalid_names_are_rejected() {
    let tmp = tempdir().unwrap();
    let store = store_in(&tmp);

    assert!(
        store
            .save_profile(ConfigScope::Local, "a/b", &BackendConfig::default())
            .is_err()
    );
    assert!(store.profile("..", None).is_err());
    assert!(store.profile("", None).is_err());
}

#[test]
fn global_scope_requires_a_global_root() {
    let tmp = tempdir().unwrap();
    let store = ConfigStore::with_roots(tmp.path().join("local"), None);

    assert!(
        store
            .save_settings(ConfigScope::Global, &RootConfig::default())
            .is_err()
    );
    assert!(
        store
            .save_profile(ConfigScope::Local, "dev", &backend("http://dev:8000"))
            .is_ok()
    );
    assert_eq!(store.profiles().unwrap().len(), 1);
    assert!(store.profile("dev", Some(ConfigScope::Global)).is_err());
    assert_eq!(store.settings().unwrap(), RootConfig::default());
}

#[test]
fn profile_defaults_fill_missing_fields() {
    let tmp = tempdir().unwrap();
    let store = store_in(&tmp);

    fs::create_dir_all(tmp.path().join("local/backends")).unwrap();
    fs::write(
        tmp.path().join("local/backends/min.toml"),
        "url = \"http://10.0.0.5:8000\"\n",
    )
    .unwrap();

    let profile = store.profile("min", None).unwrap().unwrap();
    assert_eq!(profile.config.timeout_secs, 120);
    assert!(!profile.config.insecure_tls);
}

#[test]
fn stray_files_in_profile_dir_are_ignored() {
    let tmp = tempdir().unwrap();
    let store = store_in(&tmp);

    store
        .save_profile(ConfigScope::Local, "dev", &backend("http://dev:8000"))
        .unwrap();
    fs::write(tmp.path().join("local/backends/notes.txt"), "scratch").unwrap();
    fs::write(tmp.path().join("local/backends/.toml"), "url = \"x\"").unwrap();

    let names: Vec<String> = store.profiles().unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["dev"]);
}
