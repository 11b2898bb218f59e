//! Markdown and JSON reports
//!
//! [`render_markdown`] is pure: the timestamp is passed in so output is
//! reproducible. Writing to disk is a separate step.

use crate::benchmark::{fastest_by_latency, fastest_by_throughput, BenchmarkResult};
use crate::error::Result;
use crate::gpu::GpuInfo;
use crate::machine::MachineSpecs;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Rows in each ranking table.
pub const TOP_N: usize = 5;

const NA: &str = "N/A";

/// Render the full report.
pub fn render_markdown(
    results: &[BenchmarkResult],
    specs: &MachineSpecs,
    gpu: &GpuInfo,
    generated_at: &str,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, results, specs, gpu, generated_at);
    out
}

fn write_report(
    out: &mut String,
    results: &[BenchmarkResult],
    specs: &MachineSpecs,
    gpu: &GpuInfo,
    generated_at: &str,
) -> std::fmt::Result {
    writeln!(out, "# Ollama Model Benchmark Report")?;
    writeln!(out)?;
    writeln!(out, "**Generated:** {generated_at}")?;
    writeln!(out)?;

    writeln!(out, "## Machine Specifications")?;
    writeln!(out)?;
    writeln!(out, "| Spec | Value |")?;
    writeln!(out, "|------|-------|")?;
    writeln!(out, "| **OS** | {} {} |", specs.os, specs.os_release)?;
    writeln!(out, "| **CPU** | {} |", specs.cpu)?;
    writeln!(out, "| **CPU Cores** | {} |", or_na(specs.cpu_cores))?;
    writeln!(out, "| **Memory** | {} GB |", decimal(specs.memory_gb))?;
    writeln!(out, "| **GPU** | {} |", specs.gpu.as_deref().unwrap_or(NA))?;
    writeln!(out, "| **Architecture** | {} |", specs.architecture)?;
    writeln!(out, "| **Tool Version** | {} |", specs.tool_version)?;
    writeln!(out)?;

    writeln!(out, "## Ollama GPU Status")?;
    writeln!(out)?;
    writeln!(out, "| Property | Value |")?;
    writeln!(out, "|----------|-------|")?;
    writeln!(out, "| **GPU Available** | {} |", yes_no(gpu.gpu_available))?;
    writeln!(out, "| **GPU Backend** | {} |", gpu.details)?;
    writeln!(out, "| **Ollama Using GPU** | {} |", gpu.usage_label())?;
    writeln!(out, "| **GPU/CPU Split** | {} |", gpu.gpu_layers)?;
    writeln!(out)?;

    let successful = results.iter().filter(|r| r.is_success()).count();
    writeln!(out, "## Summary")?;
    writeln!(out)?;
    writeln!(out, "- **Total Models Benchmarked:** {}", results.len())?;
    writeln!(out, "- **Successful:** {successful}")?;
    writeln!(out, "- **Failed:** {}", results.len() - successful)?;
    writeln!(out)?;

    writeln!(out, "## Benchmark Results")?;
    writeln!(out)?;
    writeln!(
        out,
        "| Model | Status | First Token (ms) | Tokens/Second | Total Time (s) | Token Count |"
    )?;
    writeln!(
        out,
        "|-------|--------|------------------|---------------|----------------|-------------|"
    )?;
    for result in results {
        match &result.metrics {
            Some(m) => writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} |",
                result.model,
                result.status,
                decimal(m.first_token_time_ms),
                decimal(m.tokens_per_second),
                decimal(m.total_time_s),
                m.token_count
            )?,
            None => writeln!(
                out,
                "| {} | {} | - | - | - | Error: {} |",
                result.model,
                result.status,
                result.error.as_deref().unwrap_or("Unknown error")
            )?,
        }
    }

    if successful > 0 {
        writeln!(out)?;
        writeln!(out, "## Fastest by First Token Latency (Top {TOP_N})")?;
        writeln!(out)?;
        writeln!(out, "| Model | First Token (ms) |")?;
        writeln!(out, "|-------|------------------|")?;
        for (model, m) in fastest_by_latency(results, TOP_N) {
            writeln!(out, "| {model} | {} |", decimal(m.first_token_time_ms))?;
        }

        writeln!(out)?;
        writeln!(out, "## Fastest by Throughput (Top {TOP_N})")?;
        writeln!(out)?;
        writeln!(out, "| Model | Tokens/Second |")?;
        writeln!(out, "|-------|---------------|")?;
        for (model, m) in fastest_by_throughput(results, TOP_N) {
            writeln!(out, "| {model} | {} |", decimal(m.tokens_per_second))?;
        }
    }

    writeln!(out)?;
    writeln!(out, "## Notes")?;
    writeln!(out)?;
    writeln!(
        out,
        "- **First Token (ms):** Estimated time to first token (milliseconds)"
    )?;
    writeln!(out, "- **Tokens/Second:** Throughput in tokens per second")?;
    writeln!(out, "- **Total Time (s):** Total benchmark time in seconds")?;
    writeln!(out, "- **Token Count:** Number of tokens in response")?;
    Ok(())
}

/// Shortest round-trip form that always shows a decimal point (`375.0`, `19.2`).
pub fn decimal(value: f64) -> String {
    format!("{value:?}")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NA.to_string(), |v| v.to_string())
}

/// Render and write the markdown report.
pub fn write_markdown(
    path: &Path,
    results: &[BenchmarkResult],
    specs: &MachineSpecs,
    gpu: &GpuInfo,
    generated_at: &str,
) -> Result<()> {
    std::fs::write(path, render_markdown(results, specs, gpu, generated_at))?;
    tracing::info!("Report saved to {}", path.display());
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: &'a str,
    machine: &'a MachineSpecs,
    gpu: &'a GpuInfo,
    results: &'a [BenchmarkResult],
}

/// Write results, specs and GPU info as pretty-printed JSON.
pub fn write_json(
    path: &Path,
    results: &[BenchmarkResult],
    specs: &MachineSpecs,
    gpu: &GpuInfo,
    generated_at: &str,
) -> Result<()> {
    let report = JsonReport {
        generated_at,
        machine: specs,
        gpu,
        results,
    };
    std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
    tracing::info!("JSON results saved to {}", path.display());
    Ok(())
}
