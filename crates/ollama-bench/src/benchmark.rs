//! Timing a single model
//!
//! `ollama run <model> <prompt>` is invoked once and timed from the outside.
//! Tokens are approximated by whitespace-separated words and the first-token
//! latency is a fixed fraction of the wall time, since the non-streaming CLI
//! does not expose either directly.

use crate::command::CommandRunner;
use crate::error::BenchError;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Share of the total wall time reported as first-token latency.
pub const FIRST_TOKEN_FRACTION: f64 = 0.15;

// ============================================================================
// Result types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkStatus {
    Success,
    Timeout,
    Error,
}

impl BenchmarkStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Timeout => "timeout",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for BenchmarkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurements of a successful run, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunMetrics {
    pub first_token_time_ms: f64,
    pub tokens_per_second: f64,
    pub total_time_s: f64,
    pub token_count: usize,
}

impl RunMetrics {
    /// Derive metrics from the model's reply and how long it took.
    pub fn from_response(response: &str, elapsed: Duration) -> Self {
        let total = elapsed.as_secs_f64();
        let token_count = response.split_whitespace().count();
        let tokens_per_second = if total > 0.0 {
            token_count as f64 / total
        } else {
            0.0
        };
        Self {
            first_token_time_ms: round2(total * FIRST_TOKEN_FRACTION * 1000.0),
            tokens_per_second: round2(tokens_per_second),
            total_time_s: round2(total),
            token_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub model: String,
    pub status: BenchmarkStatus,
    pub metrics: Option<RunMetrics>,
    pub error: Option<String>,
}

impl BenchmarkResult {
    pub fn success(model: &str, metrics: RunMetrics) -> Self {
        Self {
            model: model.to_string(),
            status: BenchmarkStatus::Success,
            metrics: Some(metrics),
            error: None,
        }
    }

    pub fn failure(model: &str, status: BenchmarkStatus, error: impl Into<String>) -> Self {
        Self {
            model: model.to_string(),
            status,
            metrics: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == BenchmarkStatus::Success
    }
}

// ============================================================================
// Benchmark
// ============================================================================

/// Run one prompt against one model.
///
/// Failures are captured in the result rather than returned, so one broken
/// model never stops the rest of the run.
pub fn benchmark_model(
    runner: &dyn CommandRunner,
    ollama: &str,
    model: &str,
    prompt: &str,
    timeout: Duration,
) -> BenchmarkResult {
    let start = Instant::now();
    let outcome = runner
        .run(ollama, &["run", model, prompt], Some(timeout))
        .and_then(|out| out.into_success(ollama));
    let elapsed = start.elapsed();

    match outcome {
        Ok(output) => {
            let metrics = RunMetrics::from_response(&output.stdout, elapsed);
            tracing::debug!(
                "{model}: {} tokens in {}s",
                metrics.token_count,
                metrics.total_time_s
            );
            BenchmarkResult::success(model, metrics)
        }
        Err(BenchError::Timeout { .. }) => {
            BenchmarkResult::failure(model, BenchmarkStatus::Timeout, "Timeout exceeded")
        }
        Err(e) => BenchmarkResult::failure(model, BenchmarkStatus::Error, e.to_string()),
    }
}

/// Successful results ordered by first-token latency, lowest first.
pub fn fastest_by_latency(results: &[BenchmarkResult], limit: usize) -> Vec<(&str, RunMetrics)> {
    let mut ranked = successful(results);
    ranked.sort_by(|a, b| a.1.first_token_time_ms.total_cmp(&b.1.first_token_time_ms));
    ranked.truncate(limit);
    ranked
}

/// Successful results ordered by throughput, highest first.
pub fn fastest_by_throughput(
    results: &[BenchmarkResult],
    limit: usize,
) -> Vec<(&str, RunMetrics)> {
    let mut ranked = successful(results);
    ranked.sort_by(|a, b| b.1.tokens_per_second.total_cmp(&a.1.tokens_per_second));
    ranked.truncate(limit);
    ranked
}

fn successful(results: &[BenchmarkResult]) -> Vec<(&str, RunMetrics)> {
    results
        .iter()
        .filter_map(|r| r.metrics.map(|m| (r.model.as_str(), m)))
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::fake::{FakeRunner, Reply};
    use crate::command::CommandOutput;

    const PROMPT: &str = "Explain the concept of machine learning in 50 words.";

    fn metrics(first_token_ms: f64, tps: f64) -> RunMetrics {
        RunMetrics {
            first_token_time_ms: first_token_ms,
            tokens_per_second: tps,
            total_time_s: 1.0,
            token_count: 10,
        }
    }

    #[test]
    fn test_metrics_from_response() {
        let m = RunMetrics::from_response("one two  three\nfour five", Duration::from_secs(2));
        assert_eq!(m.token_count, 5);
        assert_eq!(m.total_time_s, 2.0);
        assert_eq!(m.tokens_per_second, 2.5);
        assert_eq!(m.first_token_time_ms, 300.0);
    }

    #[test]
    fn test_metrics_zero_elapsed() {
        let m = RunMetrics::from_response("a b c", Duration::ZERO);
        assert_eq!(m.tokens_per_second, 0.0);
        assert_eq!(m.first_token_time_ms, 0.0);
    }

    #[test]
    fn test_metrics_rounding() {
        let m = RunMetrics::from_response("a b c", Duration::from_millis(1234));
        assert_eq!(m.total_time_s, 1.23);
        assert_eq!(m.first_token_time_ms, 185.1);
        assert_eq!(m.tokens_per_second, 2.43);
    }

    #[test]
    fn test_benchmark_success() {
        let runner = FakeRunner::new().with_output(
            &format!("ollama run mistral:7b {PROMPT}"),
            "Machine learning lets computers learn patterns from data.",
        );
        let result = benchmark_model(&runner, "ollama", "mistral:7b", PROMPT, Duration::from_secs(5));
        assert!(result.is_success());
        assert_eq!(result.metrics.unwrap().token_count, 8);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_benchmark_timeout() {
        let runner = FakeRunner::new().with(&format!("ollama run slow {PROMPT}"), Reply::Timeout);
        let result = benchmark_model(&runner, "ollama", "slow", PROMPT, Duration::from_secs(1));
        assert_eq!(result.status, BenchmarkStatus::Timeout);
        assert_eq!(result.error.as_deref(), Some("Timeout exceeded"));
        assert!(result.metrics.is_none());
    }

    #[test]
    fn test_benchmark_error() {
        let runner = FakeRunner::new().with(
            &format!("ollama run missing {PROMPT}"),
            Reply::Output(CommandOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "Error: model 'missing' not found".to_string(),
            }),
        );
        let result = benchmark_model(&runner, "ollama", "missing", PROMPT, Duration::from_secs(1));
        assert_eq!(result.status, BenchmarkStatus::Error);
        assert!(result.error.unwrap().contains("not found"));
    }

    #[test]
    fn test_rankings() {
        let results = vec![
            BenchmarkResult::success("a", metrics(300.0, 10.0)),
            BenchmarkResult::failure("b", BenchmarkStatus::Error, "boom"),
            BenchmarkResult::success("c", metrics(100.0, 5.0)),
            BenchmarkResult::success("d", metrics(200.0, 40.0)),
        ];

        let latency: Vec<&str> = fastest_by_latency(&results, 5).iter().map(|r| r.0).collect();
        assert_eq!(latency, vec!["c", "d", "a"]);

        let throughput: Vec<&str> = fastest_by_throughput(&results, 2)
            .iter()
            .map(|r| r.0)
            .collect();
        assert_eq!(throughput, vec!["d", "a"]);
    }
}
