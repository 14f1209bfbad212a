// Incremental Tests
//
// Tests for the incremental compilation module.

use super::src::*;
use std::collections::BTreeSet;

use crate::config::IncrementalOptions;
use crate::ngtsc::file_system::AbsoluteFsPath;
use crate::ngtsc::testing::{component, directive, key, matching, TestProgram};

fn paths(items: &[&str]) -> BTreeSet<AbsoluteFsPath> {
    items.iter().map(|p| AbsoluteFsPath::new(*p)).collect()
}

fn program(selector: &str) -> TestProgram {
    TestProgram::new()
        .with("/b.ts", directive("B", selector))
        .with("/a.ts", matching(component("A", "app-a"), key("/b.ts", "B")))
        .with("/c.ts", component("C", "app-c"))
}

mod diff_and_propagate_tests {
    use super::*;

    #[test]
    fn should_rebuild_everything_without_previous() {
        let graph = program("[b]").build().unwrap();
        let result = diff_and_propagate(&graph, None, &paths(&["/b.ts"]));
        assert!(result.full_rebuild);
        assert_eq!(result.changed_units, paths(&["/a.ts", "/b.ts", "/c.ts"]));
        assert_eq!(result.emit_affected.len(), 3);
    }

    #[test]
    fn should_reemit_changed_unit_only_without_api_change() {
        let current = program("[b]").build().unwrap();
        let previous = program("[b]").build().unwrap();
        let result = diff_and_propagate(&current, Some(&previous), &paths(&["/b.ts"]));
        assert!(!result.full_rebuild);
        assert_eq!(result.changed_units, paths(&["/b.ts"]));
        assert!(result.emit_affected.is_empty());
    }

    #[test]
    fn should_reemit_consumers_of_changed_api() {
        let current = program("[renamed]").build().unwrap();
        let previous = program("[b]").build().unwrap();
        let result = diff_and_propagate(&current, Some(&previous), &paths(&["/b.ts"]));
        assert_eq!(result.changed_units, paths(&["/a.ts", "/b.ts"]));
        assert_eq!(result.type_check_units, paths(&["/a.ts", "/b.ts"]));
    }

    #[test]
    fn should_drop_deleted_units() {
        let previous = program("[b]");
        let mut current = previous.clone();
        current.remove_unit("/c.ts");
        let result = diff_and_propagate(
            &current.build().unwrap(),
            Some(&previous.build().unwrap()),
            &paths(&["/c.ts"]),
        );
        assert!(result.changed_units.is_empty());
    }
}

mod reemit_plan_tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn should_pair_primary_and_declaration_artifacts() {
        let result = InvalidationResult {
            changed_units: paths(&["/src/app/a.ts"]),
            ..InvalidationResult::default()
        };
        let plan = ReemitPlan::from(&result);
        let options = IncrementalOptions {
            root_dir: Some("/src".into()),
            out_dir: Some("/dist".into()),
            ..IncrementalOptions::default()
        };

        assert!(plan.needs_emit(&"/src/app/a.ts".into()));
        assert!(!plan.needs_type_check(&"/src/app/a.ts".into()));
        assert_eq!(
            plan.artifacts(&options),
            vec![EmitArtifactPair {
                source: "/src/app/a.ts".into(),
                primary: PathBuf::from("/dist/app/a.js"),
                declaration: PathBuf::from("/dist/app/a.d.ts"),
            }]
        );
    }

    #[test]
    fn should_skip_declaration_file_units() {
        let result = InvalidationResult {
            changed_units: paths(&["/c1.ts", "/lib1.d.ts"]),
            ..InvalidationResult::default()
        };
        let artifacts = ReemitPlan::from(&result).artifacts(&IncrementalOptions::default());

        assert_eq!(
            artifacts,
            vec![EmitArtifactPair {
                source: "/c1.ts".into(),
                primary: PathBuf::from("/c1.js"),
                declaration: PathBuf::from("/c1.d.ts"),
            }]
        );
    }
}

mod state_tests {
    use super::*;

    #[test]
    fn should_start_without_previous() {
        let state = IncrementalState::new();
        assert!(state.previous().is_none());
        assert_eq!(state.successful_passes(), 0);
    }

    #[test]
    fn should_keep_previous_after_failed_pass() {
        let graph = program("[b]").build().unwrap();
        let mut state = IncrementalState::new();
        state.record_successful_pass(graph.clone());
        state.record_failed_pass(paths(&["/a.ts"]));

        assert_eq!(state.previous().map(|g| g.len()), Some(graph.len()));
        assert_eq!(state.pending_changes(), &paths(&["/a.ts"]));

        state.record_successful_pass(graph);
        assert!(state.pending_changes().is_empty());
        assert_eq!(state.successful_passes(), 2);
    }

    #[test]
    fn should_forget_previous_on_invalidate() {
        let mut state = IncrementalState::with_previous(program("[b]").build().unwrap());
        state.invalidate();
        assert!(state.previous().is_none());
    }
}

mod snapshot_tests {
    use super::*;

    #[test]
    fn should_restore_equivalent_graph() {
        let graph = program("[b]").build().unwrap();
        let json = serde_json::to_string(&GraphSnapshot::capture(&graph)).unwrap();
        let restored = serde_json::from_str::<GraphSnapshot>(&json)
            .unwrap()
            .restore()
            .unwrap();

        assert_eq!(restored.len(), graph.len());
        assert_eq!(restored.files(), graph.files());
        let result = diff_and_propagate(&graph, Some(&restored), &BTreeSet::new());
        assert!(result.changed_units.is_empty());
    }

    #[test]
    fn should_reject_unknown_version() {
        let mut snapshot = GraphSnapshot::capture(&program("[b]").build().unwrap());
        snapshot.version = SNAPSHOT_VERSION + 1;
        assert!(matches!(
            snapshot.restore(),
            Err(IncrementalError::SnapshotVersion { .. })
        ));
    }

    #[test]
    fn should_reject_inconsistent_snapshot() {
        let mut snapshot = GraphSnapshot::capture(&program("[b]").build().unwrap());
        snapshot.symbols.retain(|entry| entry.symbol.name != "B");
        assert!(matches!(
            snapshot.restore(),
            Err(IncrementalError::InconsistentGraph { .. })
        ));
    }
}
