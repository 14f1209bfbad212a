// Declaration Fixtures
//
// Builders for the declarations a front-end would report.

use crate::ngtsc::annotations::directive::src::symbol::{InputMappingMeta, InputOrOutput};
use crate::ngtsc::file_system::AbsoluteFsPath;
use crate::ngtsc::incremental::semantic_graph::src::api::{EdgeKind, SymbolKey};
use crate::ngtsc::reflection::{
    ClassDeclaration, ComponentMeta, DeclarationMetadata, DirectiveMeta, NgModuleMeta, OpaqueMeta,
    PipeMeta,
};

pub fn key(path: &str, name: &str) -> SymbolKey {
    SymbolKey::new(AbsoluteFsPath::new(path), name)
}

pub fn directive_meta(selector: &str) -> DirectiveMeta {
    DirectiveMeta {
        selector: Some(selector.to_string()),
        ..DirectiveMeta::default()
    }
}

pub fn directive(name: &str, selector: &str) -> ClassDeclaration {
    directive_with(name, directive_meta(selector))
}

pub fn directive_with(name: &str, meta: DirectiveMeta) -> ClassDeclaration {
    ClassDeclaration::new(name, DeclarationMetadata::Directive(meta))
}

pub fn component(name: &str, selector: &str) -> ClassDeclaration {
    component_with(
        name,
        ComponentMeta {
            directive: directive_meta(selector),
            is_standalone: false,
        },
    )
}

pub fn standalone_component(name: &str, selector: &str) -> ClassDeclaration {
    component_with(
        name,
        ComponentMeta {
            directive: directive_meta(selector),
            is_standalone: true,
        },
    )
}

pub fn component_with(name: &str, meta: ComponentMeta) -> ClassDeclaration {
    ClassDeclaration::new(name, DeclarationMetadata::Component(meta))
}

pub fn pipe(name: &str, pipe_name: &str) -> ClassDeclaration {
    ClassDeclaration::new(
        name,
        DeclarationMetadata::Pipe(PipeMeta {
            pipe_name: pipe_name.to_string(),
        }),
    )
}

/// An NgModule. Its metadata references become edges when the graph is
/// built, so they need not be repeated with `with_reference`.
pub fn ng_module(
    name: &str,
    declarations: &[SymbolKey],
    exports: &[SymbolKey],
    imports: &[SymbolKey],
) -> ClassDeclaration {
    ClassDeclaration::new(
        name,
        DeclarationMetadata::NgModule(NgModuleMeta {
            declarations: declarations.to_vec(),
            exports: exports.to_vec(),
            transitive_imports: imports.to_vec(),
            has_providers: false,
        }),
    )
}

pub fn opaque(name: &str, fingerprint: Option<&str>) -> ClassDeclaration {
    ClassDeclaration::new(
        name,
        DeclarationMetadata::Opaque(OpaqueMeta {
            fingerprint: fingerprint.map(str::to_string),
        }),
    )
}

pub fn inputs(bindings: &[(&str, &str)]) -> Vec<InputMappingMeta> {
    bindings
        .iter()
        .map(|(binding, property)| InputMappingMeta::new(*binding, *property))
        .collect()
}

pub fn outputs(bindings: &[(&str, &str)]) -> Vec<InputOrOutput> {
    bindings
        .iter()
        .map(|(binding, property)| InputOrOutput::new(*binding, *property))
        .collect()
}

/// Adds a template match of `target` to `decl`.
pub fn matching(decl: ClassDeclaration, target: SymbolKey) -> ClassDeclaration {
    decl.with_reference(target, EdgeKind::TemplateMatch)
}

/// Adds an explicit reference to `target` to `decl`.
pub fn referencing(decl: ClassDeclaration, target: SymbolKey) -> ClassDeclaration {
    decl.with_reference(target, EdgeKind::DirectReference)
}
