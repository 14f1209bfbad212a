// Incremental API
//
// Public API types for incremental compilation.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::config::IncrementalOptions;
use crate::ngtsc::file_system::AbsoluteFsPath;
use crate::ngtsc::incremental::semantic_graph::src::api::SymbolKey;
use crate::ngtsc::incremental::semantic_graph::src::propagation::PropagationStats;

/// Everything one pass of diffing and propagation found out.
#[derive(Debug, Clone, Default)]
pub struct InvalidationResult {
    /// Units that must be re-emitted this pass.
    pub changed_units: BTreeSet<AbsoluteFsPath>,
    /// Units whose type-check blocks must be regenerated.
    pub type_check_units: BTreeSet<AbsoluteFsPath>,
    pub public_api_affected: BTreeSet<SymbolKey>,
    pub emit_affected: BTreeSet<SymbolKey>,
    pub remote_scope_fixups: BTreeSet<SymbolKey>,
    /// Set when nothing could be reused, either because no previous
    /// generation exists or because the current graph was unusable.
    pub full_rebuild: bool,
    pub stats: PropagationStats,
}

/// The output files of one re-emitted unit. Always written together.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EmitArtifactPair {
    pub source: AbsoluteFsPath,
    pub primary: PathBuf,
    pub declaration: PathBuf,
}

/// What the build driver has to re-emit for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReemitPlan {
    pub units: BTreeSet<AbsoluteFsPath>,
    pub type_check_units: BTreeSet<AbsoluteFsPath>,
    pub full_rebuild: bool,
}

impl ReemitPlan {
    pub fn needs_emit(&self, unit: &AbsoluteFsPath) -> bool {
        self.units.contains(unit)
    }

    pub fn needs_type_check(&self, unit: &AbsoluteFsPath) -> bool {
        self.type_check_units.contains(unit)
    }

    /// The artifact pairs of every unit in the plan. Declaration files are
    /// inputs only and get no pair.
    pub fn artifacts(&self, options: &IncrementalOptions) -> Vec<EmitArtifactPair> {
        self.units
            .iter()
            .filter(|source| !source.is_declaration_file())
            .map(|source| {
                let base = options.output_base(source);
                EmitArtifactPair {
                    source: source.clone(),
                    primary: base.with_extension(&options.primary_extension),
                    declaration: base.with_extension(&options.declaration_extension),
                }
            })
            .collect()
    }
}

impl From<&InvalidationResult> for ReemitPlan {
    fn from(result: &InvalidationResult) -> Self {
        Self {
            units: result.changed_units.clone(),
            type_check_units: result.type_check_units.clone(),
            full_rebuild: result.full_rebuild,
        }
    }
}
