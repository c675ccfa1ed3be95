//! Pipeline Runner: times the named stages of a conversion
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub id: String,
    pub latency_ms: u64,
}

/// Outcome of a successful conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub pipeline_id: String,
    pub stages: Vec<StageReport>,
    /// `blake3:<hex>` of the written document
    pub artifact_hash: String,
    /// Path of the written document
    pub output: PathBuf,
    pub warnings: Vec<String>,
}

#[derive(Debug, Default)]
pub struct PipelineRunner {
    stages: Vec<StageReport>,
}

impl PipelineRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one stage; the first failing stage aborts the pipeline
    pub fn stage<T>(&mut self, id: &str, run: impl FnOnce() -> Result<T>) -> Result<T> {
        let span = tracing::info_span!("stage", id);
        let _entered = span.enter();

        let start = Instant::now();
        let output = run();
        let latency_ms = start.elapsed().as_millis() as u64;

        match &output {
            Ok(_) => tracing::info!(latency_ms, "stage {} finished", id),
            Err(e) => tracing::error!(latency_ms, error = %e, "stage {} failed", id),
        }
        self.stages.push(StageReport { id: id.to_string(), latency_ms });
        output
    }

    /// Stage ids joined in run order, e.g. `unpack→parse→copy`
    pub fn pipeline_id(&self) -> String {
        self.stages
            .iter()
            .map(|s| s.id.as_str())
            .collect::<Vec<_>>()
            .join("→")
    }

    pub fn stages(&self) -> &[StageReport] {
        &self.stages
    }

    pub fn into_stages(self) -> Vec<StageReport> {
        self.stages
    }
}

pub fn hash_bytes(data: &[u8]) -> String {
    format!("blake3:{}", blake3::hash(data))
}
