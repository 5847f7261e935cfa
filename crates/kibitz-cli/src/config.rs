use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use kibitz_analysis::AnalyzerConfig;
use kibitz_stockfish::EvaluatorConfig;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_stockfish_path")]
    pub binary_path: String,

    #[serde(default = "default_depth")]
    pub depth: u8,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_threads")]
    pub threads: u16,

    #[serde(default = "default_hash_mb")]
    pub hash_mb: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_critical_swing")]
    pub critical_swing: i32,
}

fn default_stockfish_path() -> String {
    std::env::var("STOCKFISH_PATH").unwrap_or_else(|_| "/usr/local/bin/stockfish".to_string())
}

fn default_depth() -> u8 {
    16
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_threads() -> u16 {
    1
}

fn default_hash_mb() -> u32 {
    64
}

fn default_critical_swing() -> i32 {
    200
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary_path: default_stockfish_path(),
            depth: default_depth(),
            timeout_ms: default_timeout_ms(),
            threads: default_threads(),
            hash_mb: default_hash_mb(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            critical_swing: default_critical_swing(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path =
            std::env::var("KIBITZ_CONFIG").unwrap_or_else(|_| "config/kibitz.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_path(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig::new(self.engine.binary_path.clone())
            .with_timeout(Duration::from_millis(self.engine.timeout_ms))
            .with_threads(self.engine.threads)
            .with_hash_mb(self.engine.hash_mb)
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig::default()
            .with_depth(self.engine.depth)
            .with_critical_swing(self.analysis.critical_swing)
    }
}
