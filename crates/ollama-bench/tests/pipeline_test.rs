//! End-to-end pipeline against a scripted ollama
//!
//! discover -> benchmark -> re-check GPU -> render, with every external
//! command answered from canned output.

use ollama_bench::report::{render_markdown, write_markdown};
use ollama_bench::{
    list_models, BenchError, BenchmarkStatus, CommandOutput, CommandRunner, GpuInfo,
    MachineSpecs, Result, Suite,
};
use std::cell::RefCell;
use std::time::Duration;
use tempfile::TempDir;

const LS: &str = "\
NAME            ID              SIZE      MODIFIED
mistral:7b      6577803aa9a0    4.4 GB    2 days ago
gpt-oss:20b     17052f91a42e    13 GB     3 weeks ago
broken:1b       000000000000    1.0 GB    1 hour ago
";

const PS: &str = "\
NAME            ID              SIZE      PROCESSOR    CONTEXT    UNTIL
mistral:7b      6577803aa9a0    5.1 GB    100% GPU     4096       24 hours from now";

/// Answers like a machine with two working models and one that hangs.
#[derive(Default)]
struct ScriptedOllama {
    calls: RefCell<Vec<String>>,
}

impl CommandRunner for ScriptedOllama {
    fn run(&self, program: &str, args: &[&str], timeout: Option<Duration>) -> Result<CommandOutput> {
        self.calls
            .borrow_mut()
            .push(format!("{program} {}", args.join(" ")));
        match (program, args) {
            ("ollama", ["ls"]) => Ok(CommandOutput::ok(LS)),
            ("ollama", ["ps"]) => Ok(CommandOutput::ok(PS)),
            ("ollama", ["run", "broken:1b", _]) => Err(BenchError::Timeout {
                program: program.to_string(),
                after: timeout.unwrap_or_default(),
            }),
            ("ollama", ["run", _, _]) => Ok(CommandOutput::ok(
                "Machine learning is a field of AI where systems learn from data.",
            )),
            _ => Err(BenchError::CommandNotFound(program.to_string())),
        }
    }
}

fn specs() -> MachineSpecs {
    MachineSpecs {
        os: "Linux".to_string(),
        os_release: "6.8".to_string(),
        architecture: "x86_64".to_string(),
        cpu: "AMD Ryzen 9 7950X".to_string(),
        cpu_cores: Some(16),
        memory_gb: 62.7,
        gpu: None,
        tool_version: "0.3.0".to_string(),
    }
}

#[test]
fn test_full_pipeline() {
    let runner = ScriptedOllama::default();

    let models = list_models(&runner, "ollama");
    assert_eq!(models, vec!["mistral:7b", "gpt-oss:20b", "broken:1b"]);

    let suite = Suite::new(&runner, "ollama", "Say hi", Duration::from_secs(30));
    let outcome = suite.run(&models, GpuInfo::default(), |_| {});

    let statuses: Vec<BenchmarkStatus> = outcome.results.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            BenchmarkStatus::Success,
            BenchmarkStatus::Success,
            BenchmarkStatus::Timeout
        ]
    );
    assert!(outcome.gpu.gpu_in_use);

    // ls, run x3, ps after the first success, ps at the end
    let calls = runner.calls.borrow();
    let ps_calls = calls.iter().filter(|c| c.as_str() == "ollama ps").count();
    assert_eq!(ps_calls, 2);
    assert!(calls.contains(&"ollama run mistral:7b Say hi".to_string()));

    let md = render_markdown(&outcome.results, &specs(), &outcome.gpu, "2026-10-19 12:00:00");
    assert!(md.contains("| **Ollama Using GPU** | Yes |"));
    assert!(md.contains("| **GPU** | N/A |"));
    assert!(md.contains("- **Successful:** 2"));
    assert!(md.contains("| broken:1b | timeout | - | - | - | Error: Timeout exceeded |"));
    assert!(md.contains("## Fastest by Throughput (Top 5)"));
}

#[test]
fn test_report_written_to_disk() {
    let runner = ScriptedOllama::default();
    let suite = Suite::new(&runner, "ollama", "Say hi", Duration::from_secs(30));
    let outcome = suite.run(&["mistral:7b".to_string()], GpuInfo::default(), |_| {});

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ollama_benchmark_report.md");
    write_markdown(&path, &outcome.results, &specs(), &outcome.gpu, "now").unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("| mistral:7b | success |"));
}
