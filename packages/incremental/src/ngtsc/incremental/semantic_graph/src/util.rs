// Semantic Graph Utilities

use crate::ngtsc::reflection::{ClassDeclaration, DeclarationExport};

/// Resolves the identifier by which a declaration can be matched across
/// builds.
///
/// Only a direct, top-level export is stable enough. A declaration exported
/// solely through a re-export or alias elsewhere could be renamed without
/// touching this declaration, so it gets no identifier, and neither does a
/// nested one.
pub fn resolve_identifier(decl: &ClassDeclaration) -> Option<String> {
    if !decl.is_top_level() {
        return None;
    }
    match decl.export {
        DeclarationExport::Direct => Some(decl.name.clone()),
        DeclarationExport::Indirect | DeclarationExport::None => None,
    }
}
