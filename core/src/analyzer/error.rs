//! Type checking errors.
//!
//! Every error here is fatal: compilation of the unit aborts with no
//! partial output. The pipeline is deterministic, so there is nothing to
//! retry.

use core::fmt::Display;

use crate::types::constraint_set::Constraint;
use crate::types::unification;
use crate::{String, ToString};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    pub kind: TypeErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeErrorKind {
    /// Two incompatible concrete types were asserted equal.
    TypeMismatch {
        left: String,
        right: String,
        /// The originating constraint, as collected.
        constraint: String,
    },
    /// A type variable would be bound to a type containing it.
    OccursCheck { type_var: String, ty: String },
    /// A type variable survived substitution: no use of the declaration
    /// pins the type down, so it cannot be inferred.
    AmbiguousType { declaration: String, ty: String },
}

impl TypeError {
    pub(crate) fn from_unification(constraint: &Constraint<'_>, error: unification::Error) -> Self {
        let kind = match error {
            unification::Error::TypeMismatch { left, right } => TypeErrorKind::TypeMismatch {
                left,
                right,
                constraint: constraint.to_string(),
            },
            unification::Error::OccursCheckFailed { type_var, ty } => {
                TypeErrorKind::OccursCheck { type_var, ty }
            }
        };
        TypeError { kind }
    }

    pub(crate) fn ambiguous(declaration: impl Into<String>, ty: String) -> Self {
        TypeError {
            kind: TypeErrorKind::AmbiguousType {
                declaration: declaration.into(),
                ty,
            },
        }
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.kind {
            TypeErrorKind::TypeMismatch {
                left,
                right,
                constraint,
            } => write!(
                f,
                "cannot unify `{}` with `{}` (while solving `{}`)",
                left, right, constraint
            ),
            TypeErrorKind::OccursCheck { type_var, ty } => write!(
                f,
                "infinite type: `{}` would appear inside `{}`",
                type_var, ty
            ),
            TypeErrorKind::AmbiguousType { declaration, ty } => write!(
                f,
                "ambiguous type in declaration `{}`: `{}` is not fully determined",
                declaration, ty
            ),
        }
    }
}

impl core::error::Error for TypeError {}
