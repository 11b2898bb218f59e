//! GPU detection
//!
//! Two independent questions: is a GPU backend available on this machine,
//! and is ollama actually running the loaded models on it. The second comes
//! from `ollama ps`, whose layout has shifted between releases, so its
//! PROCESSOR column is located by a chain of parsers tried in order.

use crate::command::CommandRunner;
use serde::Serialize;
use std::time::Duration;

const OLLAMA_PS_TIMEOUT: Duration = Duration::from_secs(10);
const SMI_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GpuInfo {
    pub gpu_available: bool,
    pub gpu_in_use: bool,
    /// PROCESSOR column of `ollama ps`, e.g. "100% GPU" or "48%/52% CPU/GPU"
    pub gpu_layers: String,
    /// Detected backend, e.g. "Apple Silicon (Metal)"
    pub details: String,
}

impl Default for GpuInfo {
    fn default() -> Self {
        Self {
            gpu_available: false,
            gpu_in_use: false,
            gpu_layers: "N/A".to_string(),
            details: "Unknown".to_string(),
        }
    }
}

impl GpuInfo {
    /// Value for the "Ollama Using GPU" row.
    pub fn usage_label(&self) -> &'static str {
        match (self.gpu_in_use, self.gpu_available) {
            (true, _) => "Yes",
            (false, true) => "Available but not used",
            (false, false) => "No",
        }
    }

    /// Fold processor strings from `ollama ps` into this report.
    fn apply_processors(&mut self, processors: &[String]) {
        for processor in processors {
            let upper = processor.to_uppercase();
            if upper.contains("GPU") {
                self.gpu_in_use = true;
                self.gpu_layers = processor.clone();
            } else if upper.contains("CPU") {
                self.gpu_layers = processor.clone();
            }
        }
    }
}

// ============================================================================
// `ollama ps` parsing
// ============================================================================

/// Extracts the PROCESSOR value of each loaded model, or `None` when the
/// output does not have the shape this strategy expects.
type ProcessorParser = fn(&str) -> Option<Vec<String>>;

const PS_PARSERS: &[(&str, ProcessorParser)] = &[
    ("column offsets", parse_by_column_offsets),
    ("whitespace split", parse_by_whitespace),
];

/// Run the parser chain; the first strategy that applies wins.
pub fn parse_ollama_ps(output: &str) -> Vec<String> {
    let output = output.trim();
    if output.lines().count() < 2 {
        return Vec::new();
    }
    for (name, parser) in PS_PARSERS {
        if let Some(processors) = parser(output) {
            tracing::debug!("ollama ps parsed by {name}: {processors:?}");
            return processors;
        }
    }
    Vec::new()
}

/// Slice each row between the PROCESSOR and CONTEXT header offsets.
fn parse_by_column_offsets(output: &str) -> Option<Vec<String>> {
    let mut lines = output.lines();
    let header = lines.next()?;
    let start = header.find("PROCESSOR")?;
    let end = header.find("CONTEXT").filter(|&end| end > start);

    Some(
        lines
            .filter(|line| !line.trim().is_empty())
            .map(|line| slice_columns(line, start, end).trim().to_string())
            .collect(),
    )
}

/// Fourth whitespace token of each row with at least four tokens.
fn parse_by_whitespace(output: &str) -> Option<Vec<String>> {
    Some(
        output
            .lines()
            .skip(1)
            .filter_map(|line| line.split_whitespace().nth(3))
            .map(str::to_string)
            .collect(),
    )
}

/// Character-offset slice that tolerates short rows and multi-byte names.
fn slice_columns(line: &str, start: usize, end: Option<usize>) -> String {
    let chars = line.chars().skip(start);
    match end {
        Some(end) => chars.take(end - start).collect(),
        None => chars.collect(),
    }
}

// ============================================================================
// Detection
// ============================================================================

/// Query ollama and the system for GPU state. Missing tools are not errors.
pub fn detect_gpu(runner: &dyn CommandRunner, ollama: &str) -> GpuInfo {
    let mut info = GpuInfo::default();

    match runner.run(ollama, &["ps"], Some(OLLAMA_PS_TIMEOUT)) {
        Ok(output) if output.success() => {
            info.apply_processors(&parse_ollama_ps(&output.stdout));
        }
        Ok(output) => tracing::debug!("ollama ps exited with {:?}", output.code),
        Err(e) => tracing::debug!("ollama ps unavailable: {e}"),
    }

    if let Some(details) = detect_backend(runner, std::env::consts::OS, std::env::consts::ARCH) {
        info.gpu_available = true;
        info.details = details;
    }

    info
}

/// Name of the GPU backend available on `os`/`arch`, if any.
pub fn detect_backend(runner: &dyn CommandRunner, os: &str, arch: &str) -> Option<String> {
    match os {
        "macos" if arch == "aarch64" => Some("Apple Silicon (Metal)".to_string()),
        "macos" => runner
            .run("system_profiler", &["SPDisplaysDataType"], None)
            .ok()
            .filter(|out| out.stdout.contains("Metal"))
            .map(|_| "Metal supported".to_string()),
        "linux" => nvidia_backend(runner).or_else(|| rocm_backend(runner)),
        _ => None,
    }
}

fn nvidia_backend(runner: &dyn CommandRunner) -> Option<String> {
    let output = runner
        .run(
            "nvidia-smi",
            &["--query-gpu=name,memory.total", "--format=csv,noheader"],
            Some(SMI_TIMEOUT),
        )
        .ok()?;
    let stdout = output.stdout.trim();
    (output.success() && !stdout.is_empty()).then(|| format!("NVIDIA: {stdout}"))
}

fn rocm_backend(runner: &dyn CommandRunner) -> Option<String> {
    runner
        .run("rocm-smi", &["--showproductname"], Some(SMI_TIMEOUT))
        .ok()
        .filter(|out| out.success())
        .map(|_| "AMD ROCm".to_string())
}
