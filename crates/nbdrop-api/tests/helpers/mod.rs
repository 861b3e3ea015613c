//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p nbdrop-api`.

#![allow(dead_code)]

pub mod mirror;

use axum_test::TestServer;
use nbdrop_api::setup::routes;
use nbdrop_api::state::AppState;
use nbdrop_core::Config;
use nbdrop_storage::{DisabledMirror, LocalStore, Mirror};
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server plus the store behind it.
pub struct TestApp {
    pub server: TestServer,
    pub store: LocalStore,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// App with the mirror disabled, as when no credentials are configured.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_mirror(Arc::new(DisabledMirror)).await
}

/// App over a fresh temporary storage directory and the given mirror.
pub async fn setup_test_app_with_mirror(mirror: Arc<dyn Mirror>) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let save_dir = temp_dir.path().join("saved_results");

    let config = Config {
        save_dir: save_dir.clone(),
        ..Config::default()
    };

    let store = LocalStore::new(&save_dir)
        .await
        .expect("Failed to create local store");

    let state = Arc::new(AppState::new(config.clone(), store.clone(), mirror));
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        store,
        _temp_dir: temp_dir,
    }
}

/// Check `{participant}_{YYYYmmdd}_{HHMMSS}{suffix}`.
pub fn assert_timestamped_name(name: &str, participant: &str, suffix: &str) {
    let middle = name
        .strip_prefix(&format!("{}_", participant))
        .and_then(|rest| rest.strip_suffix(suffix))
        .unwrap_or_else(|| panic!("unexpected stored name {:?}", name));

    assert_eq!(middle.len(), 15, "timestamp part of {:?}", name);
    for (i, c) in middle.chars().enumerate() {
        if i == 8 {
            assert_eq!(c, '_', "timestamp part of {:?}", name);
        } else {
            assert!(c.is_ascii_digit(), "timestamp part of {:?}", name);
        }
    }
}
