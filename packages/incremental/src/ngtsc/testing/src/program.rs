// Test Program
//
// A set of source units held in memory, edited between generations the way a
// user edits files between rebuilds.

use indexmap::IndexMap;

use crate::ngtsc::file_system::AbsoluteFsPath;
use crate::ngtsc::incremental::semantic_graph::src::graph::{build_graph_with, SemanticDepGraph};
use crate::ngtsc::incremental::src::error::Result;
use crate::ngtsc::reflection::{ClassDeclaration, SourceUnit};

/// In-memory program for building synthetic generations.
#[derive(Debug, Clone, Default)]
pub struct TestProgram {
    units: IndexMap<AbsoluteFsPath, Vec<ClassDeclaration>>,
}

impl TestProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration to the unit at `path`, creating the unit if needed.
    pub fn with(mut self, path: &str, decl: ClassDeclaration) -> Self {
        self.declare(path, decl);
        self
    }

    /// Add a unit without declarations.
    pub fn with_unit(mut self, path: &str) -> Self {
        self.units.entry(AbsoluteFsPath::new(path)).or_default();
        self
    }

    pub fn declare(&mut self, path: &str, decl: ClassDeclaration) {
        self.units.entry(AbsoluteFsPath::new(path)).or_default().push(decl);
    }

    /// Replace the declaration with the same name, or add it.
    pub fn replace(&mut self, path: &str, decl: ClassDeclaration) {
        let decls = self.units.entry(AbsoluteFsPath::new(path)).or_default();
        match decls.iter_mut().find(|existing| existing.name == decl.name) {
            Some(existing) => *existing = decl,
            None => decls.push(decl),
        }
    }

    pub fn remove(&mut self, path: &str, name: &str) {
        if let Some(decls) = self.units.get_mut(&AbsoluteFsPath::new(path)) {
            decls.retain(|decl| decl.name != name);
        }
    }

    pub fn remove_unit(&mut self, path: &str) {
        self.units.shift_remove(&AbsoluteFsPath::new(path));
    }

    pub fn units(&self) -> Vec<SourceUnit> {
        self.units
            .iter()
            .map(|(path, decls)| SourceUnit {
                path: path.clone(),
                declarations: decls.clone(),
            })
            .collect()
    }

    /// Builds the graph sequentially, so test output is easy to follow.
    pub fn build(&self) -> Result<SemanticDepGraph> {
        build_graph_with(&self.units(), false)
    }
}
