use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A fully qualified path in the file system, in POSIX form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbsoluteFsPath(String);

impl AbsoluteFsPath {
    pub fn new(path: impl Into<String>) -> Self {
        AbsoluteFsPath(normalize_separators(&path.into()))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        AbsoluteFsPath::new(path.as_ref().to_string_lossy().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether this is a declaration file (`.d.ts`), which has no emit.
    pub fn is_declaration_file(&self) -> bool {
        self.0.ends_with(".d.ts")
    }

    /// The path with its final extension replaced.
    ///
    /// `/src/app.ts` with `d.ts` becomes `/src/app.d.ts`. Declaration files
    /// (`.d.ts`) are treated as having a single `d.ts` extension.
    pub fn with_extension(&self, extension: &str) -> PathBuf {
        let stem = strip_source_extension(&self.0);
        PathBuf::from(format!("{}.{}", stem, extension.trim_start_matches('.')))
    }

    /// The path re-rooted from `root_dir` to `out_dir`.
    ///
    /// Paths outside of `root_dir` keep their full path under `out_dir`.
    pub fn rebase(&self, root_dir: &AbsoluteFsPath, out_dir: &AbsoluteFsPath) -> AbsoluteFsPath {
        let root = root_dir.0.trim_end_matches('/');
        let relative = match self.0.strip_prefix(root) {
            Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
            _ => self.0.trim_start_matches('/'),
        };
        AbsoluteFsPath::new(format!("{}/{}", out_dir.0.trim_end_matches('/'), relative))
    }
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

fn strip_source_extension(path: &str) -> &str {
    if let Some(stem) = path.strip_suffix(".d.ts") {
        return stem;
    }
    let file_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..file_start + dot],
        _ => path,
    }
}

impl AsRef<str> for AbsoluteFsPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for AbsoluteFsPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl From<&str> for AbsoluteFsPath {
    fn from(path: &str) -> Self {
        AbsoluteFsPath::new(path)
    }
}

impl std::fmt::Display for AbsoluteFsPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
