//! Package input: a package directory or a `.zip` archive of one.
//!
//! Archives are expanded into a temporary directory that lives as long as
//! the returned [`Package`].

use crate::error::{ConvertError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PROBLEM_FILE: &str = "problem.xml";

#[derive(Debug)]
pub struct Package {
    root: PathBuf,
    unpacked: Option<TempDir>,
}

impl Package {
    /// Directory that holds `problem.xml`
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn problem_file(&self) -> PathBuf {
        self.root.join(PROBLEM_FILE)
    }

    pub fn is_unpacked(&self) -> bool {
        self.unpacked.is_some()
    }
}

pub fn open(input: &Path) -> Result<Package> {
    if !input.exists() {
        return Err(ConvertError::Input(format!("{} does not exist", input.display())));
    }

    if input.is_dir() {
        let root = locate_root(input)?;
        return Ok(Package { root, unpacked: None });
    }

    let is_zip = input
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("zip"));
    if !is_zip {
        return Err(ConvertError::Input(format!(
            "{} is neither a package directory nor a .zip archive",
            input.display()
        )));
    }

    let unpacked = tempfile::tempdir().map_err(|e| ConvertError::Archive(e.to_string()))?;
    extract(input, unpacked.path())?;
    tracing::info!(archive = %input.display(), "archive unpacked");
    let root = locate_root(unpacked.path())?;
    Ok(Package { root, unpacked: Some(unpacked) })
}

fn extract(archive: &Path, into: &Path) -> Result<()> {
    let file = File::open(archive).map_err(|e| ConvertError::Archive(format!("{}: {}", archive.display(), e)))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| ConvertError::Archive(e.to_string()))?;
    zip.extract(into).map_err(|e| ConvertError::Archive(e.to_string()))
}

/// `dir` itself when it holds `problem.xml`, else its single subdirectory that does
fn locate_root(dir: &Path) -> Result<PathBuf> {
    if dir.join(PROBLEM_FILE).is_file() {
        return Ok(dir.to_path_buf());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| ConvertError::Input(format!("{}: {}", dir.display(), e)))?;
    let subdirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();

    match subdirs.as_slice() {
        [only] if only.join(PROBLEM_FILE).is_file() => Ok(only.clone()),
        _ => Err(ConvertError::Input(format!("no {} found in {}", PROBLEM_FILE, dir.display()))),
    }
}
