//! # ollama-bench
//!
//! Benchmark every model a local Ollama install knows about and summarize
//! first-token latency and throughput in a markdown report.
//!
//! The pipeline is `discover models -> run each with a timeout -> parse ->
//! aggregate -> render`. All process execution goes through
//! [`CommandRunner`], so the parsing and reporting logic is tested against
//! captured output without ollama installed.

pub mod benchmark;
pub mod command;
pub mod config;
mod error;
pub mod gpu;
pub mod machine;
pub mod models;
pub mod report;
pub mod suite;

pub use benchmark::{benchmark_model, BenchmarkResult, BenchmarkStatus, RunMetrics};
pub use command::{CommandOutput, CommandRunner, SystemRunner};
pub use error::{BenchError, Result};
pub use gpu::{detect_gpu, GpuInfo};
pub use machine::MachineSpecs;
pub use models::list_models;
pub use suite::{Suite, SuiteEvent, SuiteOutcome};
