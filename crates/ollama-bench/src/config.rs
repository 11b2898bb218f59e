//! Configuration loading for ollama-bench.

use crate::error::{BenchError, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default per-model timeout (5 minutes)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

pub const DEFAULT_PROMPT: &str = "Explain the concept of machine learning in 50 words.";

pub const DEFAULT_OUTPUT: &str = "ollama_benchmark_report.md";

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    pub ollama: Option<OllamaConfig>,
    pub benchmark: Option<BenchmarkConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct OllamaConfig {
    /// Path or name of the ollama binary
    pub binary: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BenchmarkConfig {
    pub prompt: Option<String>,
    pub timeout_secs: Option<u64>,
    pub output: Option<PathBuf>,
    /// Models to run when none are given on the command line
    pub models: Option<Vec<String>>,
}

impl Config {
    pub fn ollama_binary(&self) -> String {
        self.ollama
            .as_ref()
            .and_then(|o| o.binary.clone())
            .unwrap_or_else(|| "ollama".to_string())
    }

    pub fn prompt(&self) -> String {
        self.benchmark
            .as_ref()
            .and_then(|b| b.prompt.clone())
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.benchmark
                .as_ref()
                .and_then(|b| b.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn output(&self) -> PathBuf {
        self.benchmark
            .as_ref()
            .and_then(|b| b.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    pub fn models(&self) -> Vec<String> {
        self.benchmark
            .as_ref()
            .and_then(|b| b.models.clone())
            .unwrap_or_default()
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "ollama-bench")
        .ok_or_else(|| BenchError::Config("Could not determine config directory".to_string()))?;
    Ok(dirs.config_dir().join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents)
        .map_err(|e| BenchError::Config(format!("{}: {e}", path.display())))
}
