use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use kibitz_analysis::records_from_san;
use kibitz_core::{Evaluation, MoveRecord, PositionEvaluator};

pub fn game(sans: &[&str]) -> Vec<MoveRecord> {
    records_from_san(sans).expect("valid test game")
}

pub const RUY_LOPEZ: [&str; 5] = ["e4", "e5", "Nf3", "Nc6", "Bb5"];

pub const ITALIAN: [&str; 12] = [
    "e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "c3", "Nf6", "d4", "exd4", "cxd4", "Bb4+",
];

/// Hands out queued answers in call order; `None` once the queue runs dry.
#[derive(Default)]
pub struct ScriptedEvaluator {
    answers: Mutex<VecDeque<Option<Evaluation>>>,
    requested: Mutex<Vec<String>>,
    disposed: AtomicBool,
}

impl ScriptedEvaluator {
    pub fn new(answers: Vec<Option<Evaluation>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            ..Self::default()
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PositionEvaluator for ScriptedEvaluator {
    async fn evaluate(&self, fen: &str, _depth: u8) -> Option<Evaluation> {
        self.requested.lock().unwrap().push(fen.to_string());
        self.answers.lock().unwrap().pop_front().flatten()
    }

    async fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    fn is_available(&self) -> bool {
        !self.disposed()
    }
}

/// An engine that is never there.
#[derive(Default)]
pub struct NullEvaluator {
    pub calls: AtomicUsize,
}

#[async_trait]
impl PositionEvaluator for NullEvaluator {
    async fn evaluate(&self, _fen: &str, _depth: u8) -> Option<Evaluation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        None
    }

    async fn dispose(&self) {}

    fn is_available(&self) -> bool {
        false
    }
}

/// Takes far longer than any test is willing to wait.
#[derive(Default)]
pub struct StalledEvaluator {
    pub started: AtomicUsize,
    pub disposed: AtomicBool,
}

#[async_trait]
impl PositionEvaluator for StalledEvaluator {
    async fn evaluate(&self, _fen: &str, _depth: u8) -> Option<Evaluation> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(300)).await;
        Some(Evaluation::new(0, "e2e4"))
    }

    async fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Writes an executable shell script that speaks just enough UCI.
/// `on_go` and `on_stop` are shell snippets run for those commands.
#[cfg(unix)]
pub fn write_fake_engine(dir: &Path, name: &str, on_go: &str, on_stop: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        r#"#!/bin/sh
while IFS= read -r line; do
  case "$line" in
    uci) echo "id name FakeFish"; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) {on_go} ;;
    stop) {on_stop} ;;
    quit) exit 0 ;;
  esac
done
"#
    );
    let path = dir.join(name);
    std::fs::write(&path, script).expect("write fake engine");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod fake engine");
    path
}
