//! Building a [`Catalog`] over the text files under a set of paths.

use super::catalog::{Catalog, ItemId};
use crate::error::Result;
use crate::sets::RangedSet;
use crate::utils::progress;
use crate::utils::{CatalogConfig, is_binary};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// A catalog whose item ids index into a list of files
pub struct FileCatalog {
    catalog: Catalog,
    files: Vec<PathBuf>,
}

/// A file containing a searched sequence
#[derive(Debug, Clone)]
pub struct FileMatch<'a> {
    pub path: &'a Path,
    /// Character offsets of every occurrence
    pub positions: RangedSet,
}

impl FileCatalog {
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn path(&self, id: ItemId) -> Option<&Path> {
        self.files.get(id).map(PathBuf::as_path)
    }

    /// Files containing `sequence`, in walk order
    pub fn find(&self, sequence: &str) -> Vec<FileMatch<'_>> {
        self.catalog
            .all_containing(sequence, None)
            .iter()
            .filter_map(|id| {
                let index = self.catalog.get(id)?;
                Some(FileMatch {
                    path: self.path(id)?,
                    positions: index.occurrences(sequence),
                })
            })
            .collect()
    }
}

/// Collect the files under `paths`, honouring ignore files
pub fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in paths {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .filter_entry(|entry| {
                let name = entry.file_name().to_string_lossy();
                !matches!(name.as_ref(), ".git" | "node_modules" | "target")
            })
            .build();

        files.extend(
            walker
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .map(|entry| entry.into_path()),
        );
    }
    files
}

/// Read every text file under `paths` and index it
pub fn build_file_catalog(
    paths: &[PathBuf],
    config: &CatalogConfig,
    silent: bool,
) -> Result<FileCatalog> {
    // Phase 1: discover files
    let spinner = progress::spinner("Discovering files...", silent);
    let candidates = collect_files(paths);
    if let Some(spinner) = spinner {
        spinner.finish_with_message(format!("Found {} files", candidates.len()));
    }

    // Phase 2: read in parallel, skipping unreadable, oversized and binary files
    let pb = progress::bar(candidates.len() as u64, "Reading files...", silent);
    let unreadable = AtomicUsize::new(0);
    let max_file_size = config.max_file_size;

    let loaded: Vec<(PathBuf, String)> = candidates
        .into_par_iter()
        .filter_map(|path| {
            if let Some(ref pb) = pb {
                pb.inc(1);
            }
            let content = match fs::read(&path) {
                Ok(c) => c,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping unreadable file");
                    unreadable.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            };
            if content.len() as u64 > max_file_size || is_binary(&content) {
                return None;
            }
            let text = String::from_utf8(content).ok()?;
            Some((path, text))
        })
        .collect();

    if let Some(pb) = pb {
        pb.finish_with_message(format!("Read {} text files", loaded.len()));
    }
    let errors = unreadable.load(Ordering::Relaxed);
    if errors > 0 {
        warn!(count = errors, "files could not be read");
    }

    // Phase 3: index
    let (files, texts): (Vec<PathBuf>, Vec<String>) = loaded.into_iter().unzip();
    let catalog = Catalog::from_items_with(texts.into_iter().enumerate(), config.clone())?;
    debug!(files = files.len(), "catalog built");

    Ok(FileCatalog { catalog, files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_build_skips_binary_files() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().to_path_buf();
        fs::write(dir.join("a.txt"), "lorem ipsum dolor").unwrap();
        fs::write(dir.join("b.txt"), "dolorous").unwrap();
        fs::write(dir.join("c.bin"), [0u8; 64]).unwrap();

        let built = build_file_catalog(&[dir], &CatalogConfig::default(), true).unwrap();
        assert_eq!(built.files().len(), 2);

        let mut found: Vec<String> = built
            .find("dolor")
            .iter()
            .map(|m| m.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        found.sort();
        assert_eq!(found, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_find_reports_positions() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("one.txt");
        fs::write(&file, "abcabc").unwrap();

        let built = build_file_catalog(&[file.clone()], &CatalogConfig::default(), true).unwrap();
        let matches = built.find("bc");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, file.as_path());
        assert_eq!(matches[0].positions.iter().collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn test_oversized_files_are_skipped() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("big.txt"), "x".repeat(100)).unwrap();
        let config = CatalogConfig {
            max_file_size: 10,
            ..CatalogConfig::default()
        };
        let built = build_file_catalog(&[temp_dir.path().to_path_buf()], &config, true).unwrap();
        assert!(built.files().is_empty());
        assert!(built.catalog().is_empty());
    }
}
