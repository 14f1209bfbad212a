use serde::{Deserialize, Serialize};

use crate::ngtsc::annotations::directive::src::symbol::{
    DirectiveTypeCheckMeta, InputMappingMeta, InputOrOutput, SemanticTypeParameter,
};
use crate::ngtsc::file_system::AbsoluteFsPath;
use crate::ngtsc::incremental::semantic_graph::src::api::{EdgeKind, SymbolKey};

/// One source file, as reflected by the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub path: AbsoluteFsPath,
    pub declarations: Vec<ClassDeclaration>,
}

impl SourceUnit {
    pub fn new(path: impl Into<AbsoluteFsPath>, declarations: Vec<ClassDeclaration>) -> Self {
        Self {
            path: path.into(),
            declarations,
        }
    }
}

/// How a declaration can be named from outside of its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationExport {
    /// `export class Foo {}` at the top level of the file.
    Direct,
    /// Reachable only through a re-export or an alias declared elsewhere.
    Indirect,
    /// Not exported at all.
    None,
}

/// Where a declaration sits in its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationNesting {
    TopLevel,
    /// Declared inside a function body, block or expression.
    Nested,
}

/// A reference from one declaration to another, as discovered by the
/// front-end (explicit imports, template matching, remote scoping).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclarationReference {
    pub target: SymbolKey,
    pub kind: EdgeKind,
}

/// A class declaration together with the decorator metadata extracted for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDeclaration {
    pub name: String,
    pub export: DeclarationExport,
    pub nesting: DeclarationNesting,
    pub metadata: DeclarationMetadata,
    #[serde(default)]
    pub references: Vec<DeclarationReference>,
}

impl ClassDeclaration {
    pub fn new(name: impl Into<String>, metadata: DeclarationMetadata) -> Self {
        Self {
            name: name.into(),
            export: DeclarationExport::Direct,
            nesting: DeclarationNesting::TopLevel,
            metadata,
            references: Vec::new(),
        }
    }

    pub fn with_export(mut self, export: DeclarationExport) -> Self {
        self.export = export;
        self
    }

    pub fn nested(mut self) -> Self {
        self.nesting = DeclarationNesting::Nested;
        self
    }

    pub fn with_reference(mut self, target: SymbolKey, kind: EdgeKind) -> Self {
        self.references.push(DeclarationReference { target, kind });
        self
    }

    pub fn is_top_level(&self) -> bool {
        self.nesting == DeclarationNesting::TopLevel
    }
}

/// Decorator metadata, one variant per declaration category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeclarationMetadata {
    Directive(DirectiveMeta),
    Component(ComponentMeta),
    Pipe(PipeMeta),
    NgModule(NgModuleMeta),
    /// Anything the front-end could not or did not introspect, such as
    /// ambient library declarations.
    Opaque(OpaqueMeta),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveMeta {
    pub selector: Option<String>,
    #[serde(default)]
    pub inputs: Vec<InputMappingMeta>,
    #[serde(default)]
    pub outputs: Vec<InputOrOutput>,
    pub export_as: Option<Vec<String>>,
    #[serde(default)]
    pub type_check_meta: DirectiveTypeCheckMeta,
    pub type_parameters: Option<Vec<SemanticTypeParameter>>,
    pub base_class: Option<SymbolKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMeta {
    pub directive: DirectiveMeta,
    #[serde(default)]
    pub is_standalone: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipeMeta {
    pub pipe_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NgModuleMeta {
    #[serde(default)]
    pub declarations: Vec<SymbolKey>,
    /// Exported surface, already flattened through re-exported modules.
    #[serde(default)]
    pub exports: Vec<SymbolKey>,
    /// Transitive import closure.
    #[serde(default)]
    pub transitive_imports: Vec<SymbolKey>,
    #[serde(default)]
    pub has_providers: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpaqueMeta {
    /// Content fingerprint of the declaration node, when the front-end can
    /// compute one.
    pub fingerprint: Option<String>,
}
