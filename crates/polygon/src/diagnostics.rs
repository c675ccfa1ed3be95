//! Non-fatal findings collected while a package is converted.
//!
//! Every warning is logged through `tracing` as it is raised and kept so the
//! run report can list it afterwards.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and emit it on the `tracing` warn level
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Consume the collector, keeping only the messages
    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}
