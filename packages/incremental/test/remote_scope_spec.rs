//! Remote Scope Tests
//!
//! Re-emission forced by changes in how NgModules remotely scope their
//! components, independent of any public API change.

use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

use angular_incremental::diff_and_propagate;
use angular_incremental::ngtsc::cycles::{resolve_remote_scope_fixups, RemoteScopeAnalysis};
use angular_incremental::ngtsc::file_system::AbsoluteFsPath;
use angular_incremental::ngtsc::incremental::semantic_graph::{EdgeKind, SymbolKey};
use angular_incremental::ngtsc::reflection::{ClassDeclaration, DeclarationExport};
use angular_incremental::ngtsc::testing::{component, key, ng_module, TestProgram};

fn keys(items: &[(&str, &str)]) -> BTreeSet<SymbolKey> {
    items.iter().map(|(path, name)| key(path, name)).collect()
}

fn scoped(decl: ClassDeclaration, module: &str) -> ClassDeclaration {
    decl.with_reference(
        key(&format!("/{}.module.ts", module.to_lowercase()), module),
        EdgeKind::RemoteScopeCycle,
    )
}

/// Two modules, each declaring two components. `cycles` lists the components
/// that close a cycle back to their module.
fn app(cycles: &[&str]) -> TestProgram {
    let mut program = TestProgram::new();
    for (module, members) in [("Home", ["HomeA", "HomeB"]), ("Admin", ["AdminA", "AdminB"])] {
        let mut declarations = Vec::new();
        for member in members {
            let path = format!("/{}.ts", member.to_lowercase());
            let mut decl = component(member, &format!("app-{}", member.to_lowercase()));
            if cycles.contains(&member) {
                decl = scoped(decl, module);
            }
            program.declare(&path, decl);
            declarations.push(key(&path, member));
        }
        program.declare(
            &format!("/{}.module.ts", module.to_lowercase()),
            ng_module(module, &declarations, &[], &[]),
        );
    }
    program
}

#[test]
fn should_not_fix_up_unrelated_modules() {
    let previous = app(&["HomeA"]).build().unwrap();
    let current = app(&["HomeA", "AdminA"]).build().unwrap();
    assert_eq!(
        resolve_remote_scope_fixups(&current, Some(&previous)),
        keys(&[("/admin.module.ts", "Admin"), ("/admina.ts", "AdminA")])
    );
}

#[test]
fn should_fix_up_swapped_members() {
    let previous = app(&["HomeA"]).build().unwrap();
    let current = app(&["HomeB"]).build().unwrap();
    assert_eq!(
        resolve_remote_scope_fixups(&current, Some(&previous)),
        keys(&[("/home.module.ts", "Home"), ("/homea.ts", "HomeA"), ("/homeb.ts", "HomeB")])
    );
}

#[test]
fn should_always_fix_up_untrackable_members() {
    let program = || {
        let mut program = app(&["HomeA"]);
        program.replace(
            "/homeb.ts",
            scoped(component("HomeB", "app-homeb"), "Home").with_export(DeclarationExport::Indirect),
        );
        program
    };
    let previous = program().build().unwrap();
    let current = program().build().unwrap();

    let fixups = resolve_remote_scope_fixups(&current, Some(&previous));
    assert_eq!(
        fixups,
        keys(&[("/home.module.ts", "Home"), ("/homea.ts", "HomeA"), ("/homeb.ts", "HomeB")])
    );
}

#[test]
fn should_report_fixups_in_full_rebuild() {
    let graph = app(&["AdminB"]).build().unwrap();
    let result = diff_and_propagate(&graph, None, &BTreeSet::new());
    assert!(result.full_rebuild);
    assert_eq!(
        result.remote_scope_fixups,
        keys(&[("/admin.module.ts", "Admin"), ("/adminb.ts", "AdminB")])
    );
}

#[test]
fn should_reemit_units_of_fixups_only() {
    let previous = app(&[]).build().unwrap();
    let current = app(&["HomeB"]).build().unwrap();
    let result = diff_and_propagate(&current, Some(&previous), &BTreeSet::new());

    let expected: BTreeSet<AbsoluteFsPath> =
        ["/home.module.ts", "/homeb.ts"].into_iter().map(AbsoluteFsPath::new).collect();
    assert_eq!(result.changed_units, expected);
    assert!(result.emit_affected.is_empty());
}

#[test]
fn should_expose_scopes_per_module() {
    let graph = app(&["HomeA", "HomeB", "AdminA"]).build().unwrap();
    let analysis = RemoteScopeAnalysis::analyze(&graph);
    let sizes: Vec<usize> = analysis.scopes().map(|(_, components)| components.len()).collect();

    // Modules are ordered by key: admin.module.ts before home.module.ts.
    assert_eq!(sizes, vec![1, 2]);
}

#[test]
fn should_reemit_cycle_declared_by_the_module() {
    let program = |cyclic: bool| {
        let mut module = ng_module("Mod", &[key("/c1.ts", "C1")], &[], &[]);
        if cyclic {
            module = module.with_reference(key("/c1.ts", "C1"), EdgeKind::RemoteScopeCycle);
        }
        TestProgram::new()
            .with("/mod.ts", module)
            .with("/c1.ts", component("C1", "app-c1"))
    };
    let previous = program(false).build().unwrap();
    let current = program(true).build().unwrap();
    let result = diff_and_propagate(&current, Some(&previous), &BTreeSet::new());

    assert_eq!(result.remote_scope_fixups, keys(&[("/c1.ts", "C1"), ("/mod.ts", "Mod")]));
    let expected: BTreeSet<AbsoluteFsPath> =
        ["/c1.ts", "/mod.ts"].into_iter().map(AbsoluteFsPath::new).collect();
    assert_eq!(result.changed_units, expected);
}
