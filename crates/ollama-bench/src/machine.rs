//! Host description for the report header

use crate::command::CommandRunner;
use serde::Serialize;
use std::time::Duration;
use sysinfo::System;

const GPU_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineSpecs {
    pub os: String,
    pub os_release: String,
    pub architecture: String,
    pub cpu: String,
    pub cpu_cores: Option<usize>,
    pub memory_gb: f64,
    pub gpu: Option<String>,
    /// Version of this tool, recorded so reports can be compared across builds
    pub tool_version: String,
}

impl MachineSpecs {
    /// Collect specs for the current host.
    pub fn collect(runner: &dyn CommandRunner) -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        let cpu = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            os: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            os_release: System::os_version()
                .or_else(System::kernel_version)
                .unwrap_or_default(),
            architecture: std::env::consts::ARCH.to_string(),
            cpu,
            cpu_cores: sys.physical_core_count().or(Some(sys.cpus().len())),
            memory_gb: bytes_to_gb(sys.total_memory()),
            gpu: detect_gpu_name(runner, std::env::consts::OS),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Bytes to GiB, one decimal.
fn bytes_to_gb(bytes: u64) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0 * 1024.0) * 10.0).round() / 10.0
}

/// Marketing name of the first GPU, from platform tools.
pub fn detect_gpu_name(runner: &dyn CommandRunner, os: &str) -> Option<String> {
    match os {
        "macos" => runner
            .run("system_profiler", &["SPDisplaysDataType"], Some(GPU_QUERY_TIMEOUT))
            .ok()
            .and_then(|out| parse_display_chip(&out.stdout)),
        "linux" => runner
            .run(
                "nvidia-smi",
                &["--query-gpu=name", "--format=csv,noheader"],
                Some(GPU_QUERY_TIMEOUT),
            )
            .ok()
            .filter(|out| out.success())
            .map(|out| out.stdout.trim().to_string())
            .filter(|name| !name.is_empty()),
        _ => None,
    }
}

/// Value of the first `Chipset Model:` or `Chip...:` line.
fn parse_display_chip(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.contains("Chipset Model") || line.contains("Chip"))
        .and_then(|line| line.rsplit(':').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::fake::FakeRunner;

    #[test]
    fn test_bytes_to_gb() {
        assert_eq!(bytes_to_gb(16 * 1024 * 1024 * 1024), 16.0);
        assert_eq!(bytes_to_gb(8_500_000_000), 7.9);
        assert_eq!(bytes_to_gb(0), 0.0);
    }

    #[test]
    fn test_parse_display_chip_apple() {
        let output = "Graphics/Displays:\n\n    Apple M2 Pro:\n\n      Chipset Model: Apple M2 Pro\n      Type: GPU\n";
        assert_eq!(parse_display_chip(output).as_deref(), Some("Apple M2 Pro"));
    }

    #[test]
    fn test_parse_display_chip_missing() {
        assert!(parse_display_chip("Graphics/Displays:\n").is_none());
    }

    #[test]
    fn test_gpu_name_nvidia() {
        let runner = FakeRunner::new().with_output(
            "nvidia-smi --query-gpu=name --format=csv,noheader",
            "NVIDIA A100-SXM4-80GB\n",
        );
        assert_eq!(
            detect_gpu_name(&runner, "linux").as_deref(),
            Some("NVIDIA A100-SXM4-80GB")
        );
        assert!(detect_gpu_name(&FakeRunner::new(), "linux").is_none());
    }

    #[test]
    fn test_collect_fills_basics() {
        let specs = MachineSpecs::collect(&FakeRunner::new());
        assert_eq!(specs.architecture, std::env::consts::ARCH);
        assert!(!specs.os.is_empty());
        assert!(!specs.tool_version.is_empty());
    }
}
