use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, trace};

use kibitz_core::{EngineScore, Error, Result};

/// A UCI engine child process. Owned by exactly one evaluator at a time, so
/// every method takes `&mut self` and no two searches can overlap.
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    binary_path: String,
}

impl StockfishEngine {
    /// Spawns the binary and completes the `uci`/`isready` handshake within
    /// `handshake_timeout`.
    pub async fn spawn(binary_path: &str, handshake_timeout: Duration) -> Result<Self> {
        let mut process = Command::new(binary_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Engine(format!("failed to spawn {}: {}", binary_path, e)))?;
        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| Error::Engine("failed to get stdin".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| Error::Engine("failed to get stdout".into()))?;
        let mut engine = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            binary_path: binary_path.to_string(),
        };
        timeout(handshake_timeout, engine.handshake())
            .await
            .map_err(|_| Error::Engine("engine did not answer the uci handshake".into()))??;
        Ok(engine)
    }

    async fn handshake(&mut self) -> Result<()> {
        self.send_command("uci").await?;
        self.wait_for("uciok").await?;
        self.ensure_ready().await?;
        debug!(binary = %self.binary_path, "engine initialized");
        Ok(())
    }

    pub async fn send_command(&mut self, cmd: &str) -> Result<()> {
        trace!("sending command: {}", cmd);
        self.stdin
            .write_all(format!("{}\n", cmd).as_bytes())
            .await
            .map_err(|e| Error::Engine(format!("write failed: {}", e)))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| Error::Engine(format!("flush failed: {}", e)))?;
        Ok(())
    }

    /// Reads one line of engine output. End of stream means the process is
    /// gone and is reported as an error.
    pub async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .stdout
            .read_line(&mut line)
            .await
            .map_err(|e| Error::Engine(format!("read failed: {}", e)))?;
        if read == 0 {
            return Err(Error::Engine("engine closed its output".into()));
        }
        trace!("received: {}", line.trim());
        Ok(line)
    }

    async fn wait_for(&mut self, expected: &str) -> Result<()> {
        loop {
            let line = self.read_line().await?;
            if line.trim().starts_with(expected) {
                return Ok(());
            }
        }
    }

    pub async fn ensure_ready(&mut self) -> Result<()> {
        self.send_command("isready").await?;
        self.wait_for("readyok").await
    }

    pub async fn set_option(&mut self, name: &str, value: impl std::fmt::Display) -> Result<()> {
        self.send_command(&format!("setoption name {} value {}", name, value))
            .await
    }

    pub async fn new_game(&mut self) -> Result<()> {
        self.send_command("ucinewgame").await
    }

    pub async fn set_position(&mut self, fen: &str) -> Result<()> {
        self.send_command(&format!("position fen {}", fen)).await
    }

    pub async fn go_depth(&mut self, depth: u8) -> Result<()> {
        self.send_command(&format!("go depth {}", depth)).await
    }

    pub async fn stop(&mut self) -> Result<()> {
        self.send_command("stop").await
    }

    /// Stops the running search and consumes output up to its `bestmove`.
    /// Returns `None` if the engine did not settle before `deadline`, in which
    /// case its output stream can no longer be trusted.
    pub async fn stop_and_drain(&mut self, deadline: Instant) -> Option<BestMove> {
        self.stop().await.ok()?;
        let drained = timeout_at(deadline, async {
            loop {
                match self.read_line().await {
                    Ok(line) => {
                        if let Some(best) = BestMove::parse(line.trim()) {
                            return Some(best);
                        }
                    }
                    Err(_) => return None,
                }
            }
        })
        .await;
        drained.ok().flatten()
    }

    /// Asks the engine to exit, then makes sure the process is gone.
    pub async fn quit(mut self) {
        let _ = self.send_command("quit").await;
        if timeout(Duration::from_millis(500), self.process.wait())
            .await
            .is_err()
        {
            let _ = self.process.kill().await;
        }
        debug!(binary = %self.binary_path, "engine shut down");
    }
}

/// The parts of an `info` line the evaluator cares about.
#[derive(Debug, Clone, Default)]
pub struct UciInfo {
    pub depth: Option<u8>,
    pub seldepth: Option<u8>,
    pub score_cp: Option<i32>,
    pub score_mate: Option<i32>,
    pub nodes: Option<u64>,
    pub nps: Option<u64>,
    pub time: Option<u64>,
    pub pv: Vec<String>,
}

impl UciInfo {
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        if parts.next() != Some("info") {
            return None;
        }
        let mut info = Self::default();
        while let Some(token) = parts.next() {
            match token {
                "depth" => info.depth = parts.next().and_then(|s| s.parse().ok()),
                "seldepth" => info.seldepth = parts.next().and_then(|s| s.parse().ok()),
                "score" => match parts.next() {
                    Some("cp") => info.score_cp = parts.next().and_then(|s| s.parse().ok()),
                    Some("mate") => info.score_mate = parts.next().and_then(|s| s.parse().ok()),
                    _ => {}
                },
                "nodes" => info.nodes = parts.next().and_then(|s| s.parse().ok()),
                "nps" => info.nps = parts.next().and_then(|s| s.parse().ok()),
                "time" => info.time = parts.next().and_then(|s| s.parse().ok()),
                "pv" => {
                    info.pv.extend(parts.map(str::to_string));
                    break;
                }
                // free text runs to the end of the line
                "string" => break,
                _ => {}
            }
        }
        Some(info)
    }

    /// Mate takes precedence over centipawns when both appear.
    pub fn score(&self) -> Option<EngineScore> {
        match (self.score_mate, self.score_cp) {
            (Some(mate), _) => Some(EngineScore::Mate(mate)),
            (None, Some(cp)) => Some(EngineScore::Centipawns(cp)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BestMove {
    /// Empty when the engine had no legal move (`bestmove (none)`).
    pub mv: String,
    pub ponder: Option<String>,
}

impl BestMove {
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        if parts.next() != Some("bestmove") {
            return None;
        }
        let mv = match parts.next() {
            Some("(none)") | Some("0000") | None => String::new(),
            Some(mv) => mv.to_string(),
        };
        let ponder = match (parts.next(), parts.next()) {
            (Some("ponder"), Some(p)) => Some(p.to_string()),
            _ => None,
        };
        Some(Self { mv, ponder })
    }
}
