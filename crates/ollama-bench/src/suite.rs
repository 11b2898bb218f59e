//! Benchmark pipeline: run every model, re-checking GPU use along the way.
//!
//! `ollama ps` only reports models that are loaded, so the GPU status taken
//! before any run is often incomplete. It is queried again after the first
//! successful model and once more at the end.

use crate::benchmark::{benchmark_model, BenchmarkResult};
use crate::command::CommandRunner;
use crate::gpu::{detect_gpu, GpuInfo};
use std::time::Duration;

/// Progress notifications for the caller's UI.
#[derive(Debug)]
pub enum SuiteEvent<'a> {
    Started {
        index: usize,
        total: usize,
        model: &'a str,
    },
    Finished {
        index: usize,
        total: usize,
        result: &'a BenchmarkResult,
    },
    /// GPU status after the first model loaded
    GpuRechecked(&'a GpuInfo),
}

#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    pub results: Vec<BenchmarkResult>,
    /// Best GPU status seen during the run
    pub gpu: GpuInfo,
}

pub struct Suite<'r> {
    runner: &'r dyn CommandRunner,
    ollama: String,
    prompt: String,
    timeout: Duration,
}

impl<'r> Suite<'r> {
    pub fn new(
        runner: &'r dyn CommandRunner,
        ollama: impl Into<String>,
        prompt: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            ollama: ollama.into(),
            prompt: prompt.into(),
            timeout,
        }
    }

    /// Benchmark `models` in order, starting from the `initial` GPU status.
    pub fn run(
        &self,
        models: &[String],
        initial: GpuInfo,
        mut on_event: impl FnMut(SuiteEvent<'_>),
    ) -> SuiteOutcome {
        let total = models.len();
        let mut gpu = initial;
        let mut results = Vec::with_capacity(total);

        for (i, model) in models.iter().enumerate() {
            let index = i + 1;
            on_event(SuiteEvent::Started {
                index,
                total,
                model: model.as_str(),
            });
            let result =
                benchmark_model(self.runner, &self.ollama, model, &self.prompt, self.timeout);
            on_event(SuiteEvent::Finished {
                index,
                total,
                result: &result,
            });

            if index == 1 && result.is_success() {
                gpu = detect_gpu(self.runner, &self.ollama);
                on_event(SuiteEvent::GpuRechecked(&gpu));
            }
            results.push(result);
        }

        let last = detect_gpu(self.runner, &self.ollama);
        if last.gpu_in_use {
            tracing::debug!("Final GPU check: {}", last.gpu_layers);
            gpu = last;
        }

        SuiteOutcome { results, gpu }
    }
}
