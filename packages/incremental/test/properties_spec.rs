//! Incremental Property Tests
//!
//! Properties that hold for any pair of generations: stability, monotonic
//! growth of the affected set, cycle safety and conservative identity.

use std::collections::BTreeSet;

use angular_incremental::ngtsc::file_system::AbsoluteFsPath;
use angular_incremental::ngtsc::incremental::semantic_graph::{
    compute_changed_symbols, compute_emit_affected, SymbolKey,
};
use angular_incremental::ngtsc::reflection::DeclarationExport;
use angular_incremental::ngtsc::testing::{
    component, directive, key, matching, ng_module, opaque, pipe, referencing, TestProgram,
};

fn no_changes() -> BTreeSet<AbsoluteFsPath> {
    BTreeSet::new()
}

fn keys(items: &[(&str, &str)]) -> BTreeSet<SymbolKey> {
    items.iter().map(|(path, name)| key(path, name)).collect()
}

/// A mid-sized application touching every symbol kind.
fn application() -> TestProgram {
    let mut program = TestProgram::new()
        .with("/shared/date.pipe.ts", pipe("DatePipe", "date"))
        .with("/shared/tooltip.ts", directive("Tooltip", "[tooltip]"))
        .with("/vendor/lib.d.ts", opaque("Lib", Some("f00d")))
        .with(
            "/shared/shared.module.ts",
            ng_module(
                "SharedModule",
                &[key("/shared/date.pipe.ts", "DatePipe"), key("/shared/tooltip.ts", "Tooltip")],
                &[key("/shared/date.pipe.ts", "DatePipe"), key("/shared/tooltip.ts", "Tooltip")],
                &[],
            ),
        );
    for i in 0..20 {
        let path = format!("/features/f{}.component.ts", i);
        let mut cmp = matching(
            component(&format!("Feature{}", i), &format!("app-f{}", i)),
            key("/shared/tooltip.ts", "Tooltip"),
        );
        if i % 3 == 0 {
            cmp = matching(cmp, key("/shared/date.pipe.ts", "DatePipe"));
        }
        if i % 5 == 0 {
            cmp = referencing(cmp, key("/vendor/lib.d.ts", "Lib"));
        }
        if i > 0 {
            cmp = matching(cmp, key(&format!("/features/f{}.component.ts", i - 1), &format!("Feature{}", i - 1)));
        }
        program.declare(&path, cmp);
    }
    program
}

mod stability {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn should_find_nothing_between_identical_generations() {
        let current = application().build().unwrap();
        let previous = application().build().unwrap();

        let changed = compute_changed_symbols(&current, &previous, &no_changes());
        assert_eq!(changed, BTreeSet::new());
        let emit = compute_emit_affected(&current, &previous, &changed);
        assert_eq!(emit.symbols, BTreeSet::new());
        assert_eq!(emit.stats.iterations, 0);
    }

    #[test]
    fn should_find_nothing_when_units_are_touched_without_changes() {
        let graph = application().build().unwrap();
        let touched: BTreeSet<AbsoluteFsPath> = graph.files().iter().cloned().collect();
        assert!(compute_changed_symbols(&graph, &graph, &touched).is_empty());
    }
}

mod monotonicity {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Ten modules re-exporting each other, declared in the reverse order of
    /// the export chain so that every scan discovers exactly one module.
    fn export_chain(selector: &str) -> TestProgram {
        let mut program = TestProgram::new().with("/d.ts", directive("D", selector));
        for k in 0..10 {
            let exported = if k == 0 {
                key("/d.ts", "D")
            } else {
                key(&format!("/m{}.ts", 10 - k), &format!("M{}", k - 1))
            };
            program.declare(
                &format!("/m{}.ts", 9 - k),
                ng_module(&format!("M{}", k), &[], &[exported], &[]),
            );
        }
        program
    }

    #[test]
    fn should_grow_monotonically_and_terminate() {
        let current = export_chain("[renamed]").build().unwrap();
        let previous = export_chain("[d]").build().unwrap();
        let seed = compute_changed_symbols(&current, &previous, &no_changes());
        let result = compute_emit_affected(&current, &previous, &seed);

        assert_eq!(result.public_api_affected.len(), current.len());
        assert_eq!(result.symbols, keys(&[("/d.ts", "D")]));
        assert_eq!(result.stats.iterations, 10);
        assert!(result.stats.iterations <= current.len());
        assert_eq!(result.stats.growth.len(), result.stats.iterations + 1);
        assert!(result.stats.growth.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn should_stay_within_node_count_for_application() {
        let current = application().build().unwrap();
        let mut edited = application();
        edited.replace("/shared/tooltip.ts", directive("Tooltip", "[tip]"));
        let previous = edited.build().unwrap();

        let seed = compute_changed_symbols(&current, &previous, &no_changes());
        let result = compute_emit_affected(&current, &previous, &seed);
        assert!(result.stats.iterations <= current.len());
        assert!(result.stats.growth.windows(2).all(|w| w[0] <= w[1]));
        assert!(result.symbols.is_superset(&seed));
    }
}

mod cycle_safety {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cyclic(selector: &str) -> TestProgram {
        TestProgram::new()
            .with("/x.ts", directive("X", selector))
            .with(
                "/a.ts",
                referencing(matching(component("A", "app-a"), key("/b.ts", "B")), key("/x.ts", "X")),
            )
            .with("/b.ts", matching(component("B", "app-b"), key("/a.ts", "A")))
    }

    #[test]
    fn should_not_invalidate_unchanged_cycle() {
        let current = cyclic("[x]").build().unwrap();
        let previous = cyclic("[x]").build().unwrap();
        let seed = compute_changed_symbols(&current, &previous, &no_changes());
        assert!(compute_emit_affected(&current, &previous, &seed).symbols.is_empty());
    }

    #[test]
    fn should_absorb_cycle_once() {
        let current = cyclic("[y]").build().unwrap();
        let previous = cyclic("[x]").build().unwrap();
        let seed = compute_changed_symbols(&current, &previous, &no_changes());
        let result = compute_emit_affected(&current, &previous, &seed);
        assert_eq!(result.symbols, keys(&[("/x.ts", "X"), ("/a.ts", "A")]));
    }
}

mod conservative_identity {
    use super::*;
    use pretty_assertions::assert_eq;

    fn program() -> TestProgram {
        TestProgram::new()
            .with("/a.ts", directive("Nested", "[nested]").nested())
            .with("/b.ts", directive("Aliased", "[aliased]").with_export(DeclarationExport::Indirect))
            .with("/c.ts", directive("Stable", "[stable]"))
    }

    #[test]
    fn should_always_affect_untrackable_symbols() {
        let current = program().build().unwrap();
        let previous = program().build().unwrap();
        let untrackable = keys(&[("/a.ts", "Nested"), ("/b.ts", "Aliased")]);

        let seed = compute_changed_symbols(&current, &previous, &no_changes());
        assert_eq!(seed, untrackable);
        let result = compute_emit_affected(&current, &previous, &BTreeSet::new());
        assert_eq!(result.public_api_affected, untrackable);
        assert_eq!(result.symbols, untrackable);
    }
}
