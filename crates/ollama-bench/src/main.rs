//! ollama-bench - benchmark local Ollama models
//!
//! Usage:
//!   ollama-bench                        Benchmark all installed models
//!   ollama-bench llama2 mistral         Benchmark specific models
//!   ollama-bench -m llama2 -m mistral   Same, flag syntax
//!   ollama-bench --output report.md     Custom report path
//!   ollama-bench --gpu-check            Show GPU detection and exit

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use ollama_bench::benchmark::{fastest_by_latency, fastest_by_throughput};
use ollama_bench::config::{default_config_path, load_config, Config};
use ollama_bench::gpu::parse_ollama_ps;
use ollama_bench::report::{decimal, write_json, write_markdown};
use ollama_bench::{
    detect_gpu, list_models, CommandRunner, GpuInfo, MachineSpecs, Suite, SuiteEvent,
    SystemRunner,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "ollama-bench")]
#[command(version, about = "Benchmark Ollama models and generate a markdown report")]
struct Cli {
    /// Models to benchmark (default: all installed models)
    models: Vec<String>,

    /// Model to benchmark (repeatable)
    #[arg(short = 'm', long = "model")]
    model_list: Vec<String>,

    /// Report file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Per-model timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Prompt sent to every model
    #[arg(long)]
    prompt: Option<String>,

    /// ollama binary to run
    #[arg(long)]
    ollama: Option<String>,

    /// Also write results as JSON
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Print GPU detection details and exit
    #[arg(long)]
    gpu_check: bool,

    /// Config file (default: platform config dir, ollama-bench/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// A config named with `--config` must load. The default location is
/// optional and falls back to built-in settings with a warning.
fn load_settings(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return load_config(path).with_context(|| format!("Invalid config {}", path.display()));
    }

    let Ok(path) = default_config_path() else {
        return Ok(Config::default());
    };
    match load_config(&path) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::warn!("Ignoring config {}: {e}", path.display());
            Ok(Config::default())
        }
    }
}

/// Positional models first, then `-m` models; config models only when both are empty.
fn requested_models(cli: &Cli, config: &Config) -> Vec<String> {
    let mut models: Vec<String> = cli
        .models
        .iter()
        .chain(cli.model_list.iter())
        .cloned()
        .collect();
    if models.is_empty() {
        models = config.models();
    }
    models
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn gpu_check(runner: &dyn CommandRunner, ollama: &str) -> Result<()> {
    println!("{}", "GPU Detection".bold());
    println!("{}", "=".repeat(50));

    match runner.run(ollama, &["ps"], Some(Duration::from_secs(10))) {
        Ok(output) if output.success() => {
            println!("\nollama ps output:\n{}", output.stdout.trim_end());
            let processors = parse_ollama_ps(&output.stdout);
            if processors.is_empty() {
                println!("\nNo models currently loaded.");
            }
            for processor in processors {
                println!("  PROCESSOR: '{processor}'");
            }
        }
        Ok(output) => println!(
            "\n{} ollama ps failed: {}",
            "✗".red(),
            output.stderr.trim()
        ),
        Err(e) => println!("\n{} {e}", "✗".red()),
    }

    let info = detect_gpu(runner, ollama);
    println!("\nResults:");
    println!("  GPU Available: {}", yes_no(info.gpu_available));
    println!("  GPU Backend:   {}", info.details);
    println!("  GPU In Use:    {}", yes_no(info.gpu_in_use));
    println!("  GPU Layers:    {}", info.gpu_layers);
    Ok(())
}

fn print_specs(specs: &MachineSpecs) {
    println!("  OS: {} {}", specs.os, specs.os_release);
    println!("  CPU: {}", specs.cpu);
    println!("  Memory: {} GB", decimal(specs.memory_gb));
    println!("  GPU: {}", specs.gpu.as_deref().unwrap_or("N/A"));
}

fn print_event(event: SuiteEvent<'_>) {
    match event {
        SuiteEvent::Started {
            index,
            total,
            model,
        } => {
            print!("[{index}/{total}] Benchmarking {model}... ");
            let _ = std::io::stdout().flush();
        }
        SuiteEvent::Finished { result, .. } => match &result.metrics {
            Some(m) => println!(
                "{} ({} tokens/sec)",
                "✓".green(),
                decimal(m.tokens_per_second)
            ),
            None => println!(
                "{} ({})",
                "✗".red(),
                result.error.as_deref().unwrap_or("Unknown error")
            ),
        },
        SuiteEvent::GpuRechecked(info) => {
            if info.gpu_in_use {
                println!("  -> GPU acceleration: Active ({})", info.gpu_layers);
            } else if info.gpu_available {
                println!("  -> GPU acceleration: Not used (CPU only)");
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_settings(cli.config.as_deref())?;
    let runner = SystemRunner;
    let ollama = cli.ollama.clone().unwrap_or_else(|| config.ollama_binary());

    if cli.gpu_check {
        return gpu_check(&runner, &ollama);
    }

    let output = cli.output.clone().unwrap_or_else(|| config.output());
    let timeout = cli
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.timeout());
    let prompt = cli.prompt.clone().unwrap_or_else(|| config.prompt());

    println!("{}", "Ollama Model Benchmark".bold());
    println!("{}", "=".repeat(50));

    println!("\nGathering machine specifications...");
    let specs = MachineSpecs::collect(&runner);
    print_specs(&specs);

    println!("\nChecking Ollama GPU status...");
    let initial_gpu: GpuInfo = detect_gpu(&runner, &ollama);
    println!("  GPU Available: {}", yes_no(initial_gpu.gpu_available));
    println!("  GPU Backend: {}", initial_gpu.details);

    let mut models = requested_models(&cli, &config);
    if models.is_empty() {
        println!("\nFetching available models...");
        models = list_models(&runner, &ollama);
        if models.is_empty() {
            println!("No models found. Make sure Ollama is running and has models installed.");
            return Ok(());
        }
        println!("Found {} model(s): {}", models.len(), models.join(", "));
    } else {
        println!("\nUsing specified models: {}", models.join(", "));
    }

    println!("\nBenchmarking models with prompt: \"{prompt}\"");
    println!("{}", "-".repeat(50));

    let suite = Suite::new(&runner, ollama.as_str(), prompt.as_str(), timeout);
    let outcome = suite.run(&models, initial_gpu, print_event);

    println!("\nGenerating report...");
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    write_markdown(&output, &outcome.results, &specs, &outcome.gpu, &generated_at)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;
    println!("{} Report saved to: {}", "✓".green(), output.display());

    if let Some(json) = &cli.json {
        write_json(json, &outcome.results, &specs, &outcome.gpu, &generated_at)
            .with_context(|| format!("Failed to write JSON to {}", json.display()))?;
        println!("{} JSON saved to: {}", "✓".green(), json.display());
    }

    println!("\n{}", "=".repeat(50));
    println!("{}", "Benchmark Complete!".green().bold());
    println!("{}", "=".repeat(50));

    let successful = outcome.results.iter().filter(|r| r.is_success()).count();
    println!(
        "Successfully benchmarked: {successful}/{} models",
        models.len()
    );
    if let Some((model, m)) = fastest_by_latency(&outcome.results, 1).first() {
        println!(
            "Fastest first token: {model} ({}ms)",
            decimal(m.first_token_time_ms)
        );
    }
    if let Some((model, m)) = fastest_by_throughput(&outcome.results, 1).first() {
        println!(
            "Highest throughput: {model} ({} tokens/sec)",
            decimal(m.tokens_per_second)
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_models_merge_positional_then_flags() {
        let cli = Cli::try_parse_from(["ollama-bench", "llama2", "-m", "mistral", "phi3"]).unwrap();
        assert_eq!(
            requested_models(&cli, &Config::default()),
            vec!["llama2", "phi3", "mistral"]
        );
    }

    #[test]
    fn test_config_models_used_when_none_given() {
        let cli = Cli::try_parse_from(["ollama-bench"]).unwrap();
        let config: Config = toml::from_str("[benchmark]\nmodels = [\"qwen2\"]\n").unwrap();
        assert_eq!(requested_models(&cli, &config), vec!["qwen2"]);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ollama-bench"]).unwrap();
        assert!(cli.models.is_empty());
        assert!(cli.output.is_none());
        assert!(cli.timeout.is_none());
        assert!(!cli.gpu_check);
    }

    #[test]
    fn test_timeout_flag() {
        let cli = Cli::try_parse_from(["ollama-bench", "-t", "60", "-o", "r.md"]).unwrap();
        assert_eq!(cli.timeout, Some(60));
        assert_eq!(cli.output, Some(PathBuf::from("r.md")));
    }

    #[test]
    fn test_explicit_config_parse_error_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bench.toml");
        std::fs::write(&path, "[benchmark]\ntimeout_secs = \"soon\"\n").unwrap();

        let cli = Cli::try_parse_from(["ollama-bench", "--config", path.to_str().unwrap()]).unwrap();
        assert!(load_settings(cli.config.as_deref()).is_err());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let err = load_settings(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
