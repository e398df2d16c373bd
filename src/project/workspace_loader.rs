use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};
use walkdir::WalkDir;

use super::LoadError;
use crate::base::FileId;
use crate::hir::RootId;
use crate::ide::AnalysisHost;

/// Which files count as module descriptors.
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// File names (not paths) of descriptor files.
    pub descriptor_names: Vec<String>,
    pub follow_links: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            descriptor_names: vec!["module-info.java".to_owned(), "module-info.mdesc".to_owned()],
            follow_links: false,
        }
    }
}

impl LoaderConfig {
    pub fn is_descriptor(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.descriptor_names.iter().any(|n| n == name))
    }
}

/// Loads descriptor files from disk into an [`AnalysisHost`].
#[derive(Debug, Default)]
pub struct WorkspaceLoader {
    config: LoaderConfig,
}

impl WorkspaceLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Every descriptor file below `dir`, sorted by path.
    pub fn collect_descriptor_paths(&self, dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
        if !dir.is_dir() {
            return Err(LoadError::NotADirectory(dir.to_owned()));
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(dir).follow_links(self.config.follow_links) {
            let entry = entry.map_err(|err| LoadError::Io {
                path: err.path().map(Path::to_path_buf).unwrap_or_default(),
                source: err.into(),
            })?;
            if entry.file_type().is_file() && self.config.is_descriptor(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Load every descriptor below `dir` into `root`.
    ///
    /// Files are read in parallel. Unreadable files do not stop the load; they
    /// are reported together in [`LoadError::Partial`].
    pub fn load_directory_into_host(
        &self,
        dir: impl AsRef<Path>,
        root: RootId,
        host: &mut AnalysisHost,
    ) -> Result<Vec<FileId>, LoadError> {
        let dir = dir.as_ref();
        if host.roots().root(root).is_none() {
            return Err(LoadError::UnknownRoot(root));
        }
        let paths = self.collect_descriptor_paths(dir)?;

        let results: Vec<(PathBuf, std::io::Result<String>)> = paths
            .into_par_iter()
            .map(|path| {
                let text = fs::read_to_string(&path);
                (path, text)
            })
            .collect();

        let mut loaded = Vec::new();
        let mut errors = Vec::new();
        for (path, text) in results {
            match text {
                Ok(text) => loaded.extend(host.set_file_content(root, &path, text)),
                Err(source) => {
                    warn!(path = %path.display(), error = %source, "failed to read descriptor");
                    errors.push(LoadError::Io { path, source });
                }
            }
        }

        info!(
            dir = %dir.display(),
            files = loaded.len(),
            failed = errors.len(),
            "loaded descriptors"
        );
        if errors.is_empty() {
            Ok(loaded)
        } else {
            Err(LoadError::Partial { loaded, errors })
        }
    }

    /// Load a single descriptor file into `root`.
    pub fn load_file_into_host(
        &self,
        path: impl AsRef<Path>,
        root: RootId,
        host: &mut AnalysisHost,
    ) -> Result<FileId, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        host.set_file_content(root, path, text)
            .ok_or(LoadError::UnknownRoot(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_descriptor() {
        let config = LoaderConfig::default();
        assert!(config.is_descriptor(Path::new("/a/module-info.java")));
        assert!(config.is_descriptor(Path::new("module-info.mdesc")));
        assert!(!config.is_descriptor(Path::new("/a/Main.java")));
        assert!(!config.is_descriptor(Path::new("/")));
    }

    #[test]
    fn test_missing_directory() {
        let loader = WorkspaceLoader::default();
        let err = loader
            .collect_descriptor_paths(Path::new("/definitely/not/here"))
            .unwrap_err();
        assert!(matches!(err, LoadError::NotADirectory(_)));
    }
}
