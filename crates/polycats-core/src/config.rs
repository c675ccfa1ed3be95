//! Conversion configuration, loaded from YAML
use crate::error::{ConvertError, Result};
use cats::SampleMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Polygon files that never become CATS modules
pub const SERVICE_FILES: &[&str] = &[
    "files/olymp.sty",
    "files/problem.tex",
    "files/statements.ftl",
    "files/testlib.h",
    "files/tutorial.tex",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// `version` attribute of the `<CATS>` root
    pub cats_version: String,
    /// File name of the written document inside the output directory
    pub output_name: String,
    /// Value of the three `save*Prefix` problem attributes
    pub save_prefix: String,
    pub samples: SampleMode,
    pub import_testlib: bool,
    /// Use the first testset when a package declares several
    pub allow_extra_testsets: bool,
    pub folders: Folders,
    pub service_files: Vec<String>,
}

/// Target folders, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Folders {
    pub solutions: String,
    pub generators: String,
    pub tests: String,
    pub samples: String,
    pub files: String,
}

impl Default for Folders {
    fn default() -> Self {
        Self {
            solutions: "solutions".to_string(),
            generators: "generators".to_string(),
            tests: "tests".to_string(),
            samples: "samples".to_string(),
            files: "files".to_string(),
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            cats_version: "1.11".to_string(),
            output_name: "problem.xml".to_string(),
            save_prefix: "255B".to_string(),
            samples: SampleMode::Files,
            import_testlib: true,
            allow_extra_testsets: false,
            folders: Folders::default(),
            service_files: SERVICE_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ConvertConfig {
    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ConvertError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConvertError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}
