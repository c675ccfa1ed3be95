//! Source model of a Polygon package.
//!
//! Built once by [`crate::reader`] and read-only afterwards. Assets are
//! relocated by producing new records through [`SourceAsset::relocated`].

use crate::compiler::Compiler;
use crate::error::PolygonError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Extensions of statement resources that render as pictures
const PICTURE_SUFFIXES: &[&str] = &["img", "png", "jpeg", "jpg", "gif", "svg", "webp"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemName {
    pub language: String,
    pub value: String,
}

/// A TeX statement or tutorial descriptor from `problem.xml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TexDocument {
    pub language: String,
    pub path: PathBuf,
    pub charset: Option<String>,
    pub mathjax: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestMethod {
    Manual,
    Generated,
}

impl FromStr for TestMethod {
    type Err = PolygonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(TestMethod::Manual),
            "generated" => Ok(TestMethod::Generated),
            other => Err(PolygonError::UnhandledMethod(other.to_string())),
        }
    }
}

impl fmt::Display for TestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestMethod::Manual => f.write_str("manual"),
            TestMethod::Generated => f.write_str("generated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Test {
    pub method: TestMethod,
    pub sample: bool,
    pub cmd: Option<String>,
    pub points: Option<i64>,
    pub group: Option<String>,
    pub description: Option<String>,
    pub from_file: Option<String>,
}

impl Test {
    pub fn manual() -> Self {
        Self {
            method: TestMethod::Manual,
            sample: false,
            cmd: None,
            points: None,
            group: None,
            description: None,
            from_file: None,
        }
    }

    pub fn generated(cmd: impl Into<String>) -> Self {
        Self {
            method: TestMethod::Generated,
            cmd: Some(cmd.into()),
            ..Self::manual()
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_points(mut self, points: i64) -> Self {
        self.points = Some(points);
        self
    }

    pub fn is_generated(&self) -> bool {
        self.method == TestMethod::Generated
    }

    /// First whitespace-delimited token of `cmd`
    pub fn generator(&self) -> Option<&str> {
        self.cmd.as_deref().and_then(|cmd| cmd.split_whitespace().next())
    }

    /// Remaining tokens of `cmd`, joined by single spaces
    pub fn params(&self) -> Option<String> {
        self.cmd
            .as_deref()
            .map(|cmd| cmd.split_whitespace().skip(1).collect::<Vec<_>>().join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub name: String,
    pub feedback_policy: String,
    pub points_policy: String,
    pub points: Option<i64>,
    pub dependencies: Vec<String>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            feedback_policy: "complete".to_string(),
            points_policy: "each-test".to_string(),
            points: None,
            dependencies: Vec::new(),
        }
    }
}

/// Memory limit in bytes; Polygon writes it bare or with a `B` suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryLimit(pub u64);

impl MemoryLimit {
    pub fn bytes(self) -> u64 {
        self.0
    }
}

impl FromStr for MemoryLimit {
    type Err = PolygonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('B').unwrap_or(trimmed);
        digits
            .parse::<u64>()
            .map(MemoryLimit)
            .map_err(|_| PolygonError::InvalidValue {
                field: "memory-limit".to_string(),
                value: s.to_string(),
            })
    }
}

impl fmt::Display for MemoryLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}B", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestSet {
    pub name: String,
    /// Milliseconds
    pub time_limit: u64,
    pub memory_limit: MemoryLimit,
    pub test_count: usize,
    pub input_path_pattern: String,
    pub output_path_pattern: Option<String>,
    pub answer_path_pattern: String,
    pub tests: Vec<Test>,
    pub groups: Vec<Group>,
}

impl TestSet {
    /// Tests paired with their 1-based rank
    pub fn ranked_tests(&self) -> impl Iterator<Item = (usize, &Test)> {
        self.tests.iter().enumerate().map(|(i, test)| (i + 1, test))
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn has_groups(&self) -> bool {
        !self.groups.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Judging {
    pub cpu_name: Option<String>,
    pub cpu_speed: Option<u32>,
    /// Empty means standard input
    pub input_file: String,
    /// Empty means standard output
    pub output_file: String,
    pub run_count: Option<u32>,
    pub test_sets: Vec<TestSet>,
}

/// A file referenced by the package together with its resolved compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceAsset {
    pub path: PathBuf,
    /// `None` when the package declares no type for the file
    pub compiler: Option<Compiler>,
}

impl SourceAsset {
    pub fn new(path: impl Into<PathBuf>, compiler: Option<Compiler>) -> Self {
        Self { path: path.into(), compiler }
    }

    /// Same asset at a new, package-relative location
    pub fn relocated(&self, path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), compiler: self.compiler }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name without its final suffix
    pub fn stem(&self) -> String {
        file_stem(&self.path)
    }

    /// Path with forward slashes regardless of platform
    pub fn posix_path(&self) -> String {
        posix(&self.path)
    }
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checker {
    pub name: Option<String>,
    /// `testlib` for testlib checkers
    pub checker_type: String,
    pub source: SourceAsset,
}

impl Checker {
    pub fn is_testlib(&self) -> bool {
        self.checker_type == "testlib"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interactor {
    pub source: SourceAsset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validator {
    pub source: SourceAsset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    /// e.g. `main`, `wrong-answer`, `time-limit-exceeded`
    pub tag: String,
    pub source: SourceAsset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Executable {
    pub source: SourceAsset,
}

impl Executable {
    pub fn stem(&self) -> String {
        self.source.stem()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub source: SourceAsset,
}

impl Resource {
    pub fn is_picture(&self) -> bool {
        self.source
            .path
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                PICTURE_SUFFIXES.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Files {
    pub resources: Vec<Resource>,
    pub executables: Vec<Executable>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assets {
    pub checker: Option<Checker>,
    pub interactor: Option<Interactor>,
    pub validators: Vec<Validator>,
    pub solutions: Vec<Solution>,
}

/// Parsed `problem.xml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub short_name: Option<String>,
    pub revision: Option<String>,
    pub names: Vec<ProblemName>,
    pub statements: Vec<TexDocument>,
    pub tutorials: Vec<TexDocument>,
    pub judging: Judging,
    pub files: Files,
    pub assets: Assets,
    pub tags: Vec<String>,
}

impl Problem {
    /// Canonical name: the first declared one
    pub fn title(&self) -> Option<&ProblemName> {
        self.names.first()
    }
}
