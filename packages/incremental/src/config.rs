use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ngtsc::file_system::AbsoluteFsPath;

/// Options of the incremental engine, read from the `incremental` section of
/// a JSON project file or built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncrementalOptions {
    /// Root of the source tree; artifacts mirror paths below it.
    pub root_dir: Option<AbsoluteFsPath>,
    /// Where artifacts are written. Next to the sources when absent.
    pub out_dir: Option<AbsoluteFsPath>,
    pub primary_extension: String,
    pub declaration_extension: String,
    /// Construct per-declaration symbols on the rayon thread pool.
    pub parallel_graph_construction: bool,
    /// Where the last successful generation's graph is persisted between
    /// processes.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for IncrementalOptions {
    fn default() -> Self {
        Self {
            root_dir: None,
            out_dir: None,
            primary_extension: "js".to_string(),
            declaration_extension: "d.ts".to_string(),
            parallel_graph_construction: true,
            snapshot_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProjectFile {
    #[serde(default)]
    incremental: IncrementalOptions,
}

impl IncrementalOptions {
    /// Loads options from a project file. A file without an `incremental`
    /// section yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let project: ProjectFile = serde_json::from_str(content)?;
        Ok(project.incremental)
    }

    /// The directory artifacts of `source` are placed in, as a path with the
    /// source's file name.
    pub fn output_base(&self, source: &AbsoluteFsPath) -> AbsoluteFsPath {
        match (&self.root_dir, &self.out_dir) {
            (Some(root), Some(out)) => source.rebase(root, out),
            (None, Some(out)) => source.rebase(&AbsoluteFsPath::new("/"), out),
            _ => source.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_when_section_missing() {
        let options = IncrementalOptions::from_json("{}").unwrap();
        assert_eq!(options, IncrementalOptions::default());
    }

    #[test]
    fn should_read_camel_case_section() {
        let options = IncrementalOptions::from_json(
            r#"{ "incremental": { "outDir": "/dist", "rootDir": "/src", "parallelGraphConstruction": false } }"#,
        )
        .unwrap();
        assert_eq!(options.out_dir, Some(AbsoluteFsPath::new("/dist")));
        assert!(!options.parallel_graph_construction);
        assert_eq!(options.primary_extension, "js");
    }

    #[test]
    fn should_rebase_output_under_out_dir() {
        let options = IncrementalOptions {
            root_dir: Some("/src".into()),
            out_dir: Some("/dist".into()),
            ..IncrementalOptions::default()
        };
        assert_eq!(
            options.output_base(&"/src/app/app.ts".into()).as_str(),
            "/dist/app/app.ts"
        );
    }

    #[test]
    fn should_emit_next_to_source_without_out_dir() {
        let options = IncrementalOptions::default();
        assert_eq!(options.output_base(&"/src/app.ts".into()).as_str(), "/src/app.ts");
    }
}
