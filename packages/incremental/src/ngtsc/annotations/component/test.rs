// Component Symbol Tests

use super::*;
use crate::ngtsc::incremental::semantic_graph::src::api::{
    AffectedReason, AffectedSet, EmitContext, SymbolKind,
};
use crate::ngtsc::testing::{component, directive, key, matching, TestProgram};

#[test]
fn should_compare_directive_surface() {
    let current = ComponentSymbol::new(Some("app-a".to_string()));
    assert!(!current.is_public_api_affected(&ComponentSymbol::new(Some("app-a".to_string()))));
    assert!(current.is_public_api_affected(&ComponentSymbol::new(Some("app-b".to_string()))));
}

#[test]
fn should_not_expose_standalone_flag_as_public_api() {
    let mut current = ComponentSymbol::new(Some("app-a".to_string()));
    current.is_standalone = true;
    let previous = ComponentSymbol::new(Some("app-a".to_string()));
    assert!(!current.is_public_api_affected(&previous));
}

mod emit_tests {
    use super::*;

    fn program() -> TestProgram {
        TestProgram::new()
            .with("/dir.ts", directive("Dir", "[dir]"))
            .with("/cmp.ts", matching(component("Cmp", "app-cmp"), key("/dir.ts", "Dir")))
    }

    fn component_of(kind: &SymbolKind) -> &ComponentSymbol {
        match kind {
            SymbolKind::Component(cmp) => cmp,
            other => panic!("expected a component, got {:?}", other),
        }
    }

    #[test]
    fn should_be_emit_affected_by_matched_directive() {
        let graph = program().build().unwrap();
        let cmp = graph.id_of(&key("/cmp.ts", "Cmp")).unwrap();
        let dir = graph.id_of(&key("/dir.ts", "Dir")).unwrap();
        let symbol = component_of(&graph.symbol(cmp).kind);

        let mut affected = AffectedSet::new(graph.len());
        let ctx = EmitContext {
            current: &graph,
            current_id: cmp,
            public_api_affected: &affected,
        };
        assert!(!symbol.is_emit_affected(symbol, &ctx));

        affected.mark(dir, AffectedReason::PUBLIC_API);
        let ctx = EmitContext {
            current: &graph,
            current_id: cmp,
            public_api_affected: &affected,
        };
        assert!(symbol.is_emit_affected(symbol, &ctx));
    }

    #[test]
    fn should_be_emit_affected_when_becoming_standalone() {
        let graph = program().build().unwrap();
        let cmp = graph.id_of(&key("/cmp.ts", "Cmp")).unwrap();
        let previous = component_of(&graph.symbol(cmp).kind).clone();
        let mut current = previous.clone();
        current.is_standalone = true;

        let affected = AffectedSet::new(graph.len());
        let ctx = EmitContext {
            current: &graph,
            current_id: cmp,
            public_api_affected: &affected,
        };
        assert!(current.is_emit_affected(&previous, &ctx));
    }

    #[test]
    fn should_check_type_check_block_through_template_matches() {
        let graph = program().build().unwrap();
        let cmp = graph.id_of(&key("/cmp.ts", "Cmp")).unwrap();
        let dir = graph.id_of(&key("/dir.ts", "Dir")).unwrap();
        let symbol = component_of(&graph.symbol(cmp).kind);

        let mut affected = AffectedSet::new(graph.len());
        assert!(!symbol.is_type_check_block_affected(&graph, cmp, &affected));
        affected.mark(dir, AffectedReason::PUBLIC_API);
        assert!(symbol.is_type_check_block_affected(&graph, cmp, &affected));
    }
}
