//! Asset copier.
//!
//! Copies package files into the target layout and hands back relocated
//! records. The source model is never mutated: every method returns new
//! assets whose paths are relative to the output directory. Two different
//! sources relocated onto the same target path are rejected.

use crate::config::Folders;
use crate::error::{ConvertError, Result};
use polygon::{Checker, Executable, Interactor, Resource, Solution, SourceAsset, Statement};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Target path of `asset`: its file name, inside `folder` when given
pub fn relocate(asset: &SourceAsset, folder: Option<&str>) -> SourceAsset {
    let name = asset.file_name();
    let path = match folder {
        Some(folder) => Path::new(folder).join(name),
        None => PathBuf::from(name),
    };
    asset.relocated(path)
}

pub struct Copier<'a> {
    source: &'a Path,
    target: &'a Path,
    folders: &'a Folders,
    /// Target path to the source it was copied from
    claimed: HashMap<PathBuf, PathBuf>,
}

impl<'a> Copier<'a> {
    pub fn new(source: &'a Path, target: &'a Path, folders: &'a Folders) -> Result<Self> {
        std::fs::create_dir_all(target).map_err(|source| ConvertError::Copy {
            path: target.to_path_buf(),
            source,
        })?;
        Ok(Self { source, target, folders, claimed: HashMap::new() })
    }

    /// Checker goes to the package root
    pub fn checker(&mut self, checker: &Checker) -> Result<Checker> {
        Ok(Checker { source: self.copy_asset(&checker.source, None)?, ..checker.clone() })
    }

    /// Interactor goes to the package root
    pub fn interactor(&mut self, interactor: &Interactor) -> Result<Interactor> {
        Ok(Interactor { source: self.copy_asset(&interactor.source, None)? })
    }

    pub fn solutions(&mut self, solutions: &[Solution]) -> Result<Vec<Solution>> {
        let folders = self.folders;
        let folder = folders.solutions.as_str();
        solutions
            .iter()
            .map(|solution| {
                let source = self.copy_asset(&solution.source, Some(folder))?;
                Ok(Solution { tag: solution.tag.clone(), source })
            })
            .collect()
    }

    pub fn generators(&mut self, generators: &[&Executable]) -> Result<Vec<Executable>> {
        let folders = self.folders;
        let folder = folders.generators.as_str();
        generators
            .iter()
            .map(|generator| {
                let source = self.copy_asset(&generator.source, Some(folder))?;
                Ok(Executable { source })
            })
            .collect()
    }

    /// Statement resources and modules go to the files folder
    pub fn resources(&mut self, resources: &[Resource]) -> Result<Vec<Resource>> {
        let folders = self.folders;
        let folder = folders.files.as_str();
        resources
            .iter()
            .map(|resource| {
                let source = self.copy_asset(&resource.source, Some(folder))?;
                Ok(Resource { source })
            })
            .collect()
    }

    /// Copy the whole `tests/` directory; returns the number of files copied
    pub fn tests(&mut self) -> Result<usize> {
        let from = self.source.join("tests");
        if !from.is_dir() {
            tracing::debug!("package has no tests directory");
            return Ok(0);
        }
        let entries = std::fs::read_dir(&from).map_err(|source| ConvertError::Copy {
            path: from.clone(),
            source,
        })?;

        let mut copied = 0;
        for entry in entries {
            let entry = entry.map_err(|source| ConvertError::Copy { path: from.clone(), source })?;
            if !entry.path().is_file() {
                continue;
            }
            let target = Path::new(&self.folders.tests).join(entry.file_name());
            self.copy_file(&Path::new("tests").join(entry.file_name()), &target)?;
            copied += 1;
        }
        Ok(copied)
    }

    /// Copy sample files of `statement` as `example.NN` / `example.NN.a`;
    /// returns the number of samples
    pub fn samples(&mut self, statement: &Statement) -> Result<usize> {
        let folders = self.folders;
        let folder = Path::new(&folders.samples);
        let samples = &statement.properties.sample_tests;
        for (index, sample) in samples.iter().enumerate() {
            let rank = index + 1;
            self.copy_file(
                &statement.dir.join(sample.input_file_name(rank)),
                &folder.join(format!("example.{:02}", rank)),
            )?;
            self.copy_file(
                &statement.dir.join(sample.output_file_name(rank)),
                &folder.join(format!("example.{:02}.a", rank)),
            )?;
        }
        Ok(samples.len())
    }

    fn copy_asset(&mut self, asset: &SourceAsset, folder: Option<&str>) -> Result<SourceAsset> {
        let relocated = relocate(asset, folder);
        self.copy_file(&asset.path, &relocated.path)?;
        Ok(relocated)
    }

    fn copy_file(&mut self, from: &Path, to: &Path) -> Result<()> {
        if let Some(first) = self.claimed.get(to) {
            if first.as_path() == from {
                return Ok(());
            }
            return Err(ConvertError::Collision {
                target: to.to_path_buf(),
                first: first.clone(),
                second: from.to_path_buf(),
            });
        }
        self.claimed.insert(to.to_path_buf(), from.to_path_buf());
        let from = self.source.join(from);
        let to = self.target.join(to);
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConvertError::Copy {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::copy(&from, &to).map_err(|source| ConvertError::Copy { path: from.clone(), source })?;
        tracing::trace!(from = %from.display(), to = %to.display(), "copied");
        Ok(())
    }
}
