//! Statement properties (`problem-properties.json`) and statement resources.

use crate::error::PolygonError;
use crate::model::{Resource, SourceAsset, TexDocument};
use encoding_rs::Encoding;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const PROPERTIES_FILE: &str = "problem-properties.json";

lazy_static! {
    /// Sample files Polygon keeps next to the statement (`example.01`, `example.01.a`)
    static ref SAMPLE_FILE: Regex = Regex::new(r"^example\.\d+(\.a)?$").unwrap();
}

/// Contents of `statements/<language>/problem-properties.json`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementProperties {
    pub name: Option<String>,
    pub legend: Option<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub notes: Option<String>,
    pub tutorial: Option<String>,
    pub interaction: Option<String>,
    pub scoring: Option<String>,
    pub author_name: Option<String>,
    pub author_left: Option<String>,
    pub input_file: Option<String>,
    pub output_file: Option<String>,
    pub time_limit: Option<u64>,
    pub memory_limit: Option<u64>,
    pub language: Option<String>,
    #[serde(default)]
    pub sample_tests: Vec<SampleTest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleTest {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
    pub input_file: Option<String>,
    pub output_file: Option<String>,
}

impl SampleTest {
    /// Input file name, defaulting to Polygon's `example.NN`
    pub fn input_file_name(&self, rank: usize) -> String {
        self.input_file
            .clone()
            .unwrap_or_else(|| format!("example.{:02}", rank))
    }

    /// Answer file name, defaulting to Polygon's `example.NN.a`
    pub fn output_file_name(&self, rank: usize) -> String {
        self.output_file
            .clone()
            .unwrap_or_else(|| format!("example.{:02}.a", rank))
    }
}

/// One statement language of the package
#[derive(Debug, Clone)]
pub struct Statement {
    /// Polygon language name, e.g. `english`
    pub language: String,
    /// Statement directory relative to the package root
    pub dir: PathBuf,
    pub properties: StatementProperties,
}

impl Statement {
    /// Load the properties document that sits next to a TeX statement
    pub fn load(root: &Path, document: &TexDocument) -> Result<Self, PolygonError> {
        let dir = document
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let path = root.join(&dir).join(PROPERTIES_FILE);
        let bytes = std::fs::read(&path).map_err(|source| PolygonError::Io {
            path: path.clone(),
            source,
        })?;
        let content = decode(&bytes, document.charset.as_deref(), &path)?;
        let properties = parse_properties(&content, &path)?;
        Ok(Self { language: document.language.clone(), dir, properties })
    }

    /// Files in the statement directory that are neither service files nor samples
    pub fn resources(&self, root: &Path) -> Result<Vec<Resource>, PolygonError> {
        let full = root.join(&self.dir);
        let entries = std::fs::read_dir(&full).map_err(|source| PolygonError::Io {
            path: full.clone(),
            source,
        })?;

        let mut resources = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PolygonError::Io { path: full.clone(), source })?;
            if !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_service_file(&name) {
                continue;
            }
            resources.push(Resource { source: SourceAsset::new(self.dir.join(&name), None) });
        }
        resources.sort_by(|a, b| a.source.path.cmp(&b.source.path));
        Ok(resources)
    }
}

pub fn parse_properties(content: &str, origin: &Path) -> Result<StatementProperties, PolygonError> {
    serde_json::from_str(content).map_err(|e| PolygonError::Json {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })
}

/// Decode `bytes` in the statement's declared charset, UTF-8 when undeclared
pub fn decode(bytes: &[u8], charset: Option<&str>, origin: &Path) -> Result<String, PolygonError> {
    let label = charset.unwrap_or("UTF-8");
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| PolygonError::UnknownCharset(label.to_string()))?;
    let (content, _, malformed) = encoding.decode(bytes);
    if malformed {
        return Err(PolygonError::Json {
            path: origin.to_path_buf(),
            message: format!("content is not valid {}", encoding.name()),
        });
    }
    Ok(content.into_owned())
}

fn is_service_file(name: &str) -> bool {
    name == PROPERTIES_FILE || name.ends_with(".tex") || SAMPLE_FILE.is_match(name)
}
