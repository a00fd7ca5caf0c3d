#![allow(dead_code)]

pub mod mock_data;
pub mod mock_service;

use std::path::PathBuf;
use std::process::{Command, Output};

use buzz::tui::layout::{CELL_HEIGHT, CELL_WIDTH, FOOTER_HEIGHT, HEADER_HEIGHT};
use buzz::tui::{Effect, Event, Key, SessionSettings, SessionState, Viewport, handle, initial};
use jiff::Timestamp;
use tempfile::TempDir;

pub use mock_data::GoalBuilder;
pub use mock_service::MockService;

/// Path of the compiled `buzz` binary
pub fn buzz_binary() -> &'static str {
    env!("CARGO_BIN_EXE_buzz")
}

/// Runs buzz with config and data directories inside a temp directory
pub struct BuzzTest {
    pub temp_dir: TempDir,
}

impl BuzzTest {
    pub fn new() -> Self {
        BuzzTest {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.temp_dir.path().join("config").join("buzz")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.temp_dir.path().join("data").join("buzz")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let root = self.temp_dir.path();
        Command::new(buzz_binary())
            .args(args)
            .current_dir(root)
            .env("HOME", root)
            .env("XDG_CONFIG_HOME", root.join("config"))
            .env("XDG_DATA_HOME", root.join("data"))
            .env_remove("BEEMINDER_USERNAME")
            .env_remove("BEEMINDER_AUTH_TOKEN")
            .env_remove("BUZZ_LOG")
            .output()
            .expect("Failed to execute buzz command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}

/// A fixed instant: 2026-03-10T00:00:00Z plus `secs`
pub fn at(secs: i64) -> Timestamp {
    Timestamp::from_second(1_773_100_800 + secs).expect("test timestamp should be valid")
}

/// Viewport that fits exactly `columns` x `rows` goal cells
pub fn viewport(columns: u16, rows: u16) -> Viewport {
    Viewport {
        width: columns * CELL_WIDTH,
        height: HEADER_HEIGHT + FOOTER_HEIGHT + rows * CELL_HEIGHT,
    }
}

pub fn settings(viewport: Viewport) -> SessionSettings {
    SessionSettings {
        viewport,
        ..SessionSettings::default()
    }
}

/// Start a session and deliver `goals` as the first list response
pub fn session_with(goals: Vec<buzz::Goal>, viewport: Viewport) -> SessionState {
    let (state, effects) = initial(settings(viewport));
    let request = effects
        .iter()
        .find_map(|e| match e {
            Effect::FetchGoals { request } => Some(*request),
            _ => None,
        })
        .expect("session should fetch goals on start");
    let (state, _) = handle(
        state,
        Event::GoalsLoaded {
            request,
            result: Ok(goals),
        },
    );
    state
}

pub fn press(state: SessionState, key: Key) -> (SessionState, Vec<Effect>) {
    handle(state, Event::Key { key, at: at(0) })
}

pub fn press_all(mut state: SessionState, keys: &[Key]) -> SessionState {
    for key in keys {
        state = press(state, *key).0;
    }
    state
}

pub fn type_text(state: SessionState, text: &str) -> SessionState {
    let keys: Vec<Key> = text.chars().map(Key::Char).collect();
    press_all(state, &keys)
}
