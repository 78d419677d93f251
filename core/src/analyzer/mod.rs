//! Type checking: annotation, constraint collection, unification, and
//! substitution application, in that order. Each stage is a pure function
//! of its input and returns a fresh tree; nothing is mutated in place.

pub mod annotate;
pub mod collect;
pub mod error;
pub mod resolve;
pub mod typed_tree;


pub use error::{TypeError, TypeErrorKind};
pub use typed_tree::TypedUnit;

use tracing::debug;

use crate::ast;
use crate::types::manager::TypeManager;
use crate::types::unification::Unifier;

/// Run the type checking pipeline on one compilation unit.
///
/// Returns the fully resolved typed tree or the first fatal error. A
/// returned tree contains no type variables: a program that leaves a type
/// undetermined (for example a call whose type no use site pins down) is
/// rejected as ambiguous instead of being passed through.
pub fn type_check<'t>(
    types: &'t TypeManager<'t>,
    unit: &ast::CompilationUnit,
) -> Result<TypedUnit<'t>, TypeError> {
    let skeleton = annotate::annotate(types, unit);
    let constraints = collect::collect(types, &skeleton);

    let mut unifier = Unifier::new(types);
    unifier
        .unify_all(&constraints)
        .map_err(|failed| TypeError::from_unification(&failed.constraint, failed.error))?;
    debug!(bindings = unifier.binding_count(), "unification complete");

    let resolved = resolve::apply(&unifier, &skeleton);

    if let Some((declaration, ty)) = resolve::unresolved_in_unit(&resolved).into_iter().next() {
        return Err(TypeError::ambiguous(declaration.as_str(), ty));
    }

    Ok(resolved)
}
