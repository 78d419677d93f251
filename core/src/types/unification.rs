//! Hindley-Milner style unification over interned types.

use core::fmt::Display;

use hashbrown::HashMap;
use tracing::trace;

use crate::types::constraint_set::{Constraint, ConstraintSet};
use crate::types::manager::TypeManager;
use crate::types::Type;
use crate::{String, ToString};

/// Types of unification errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A variable would be bound to a type containing itself, which would
    /// construct an infinite type.
    OccursCheckFailed { type_var: String, ty: String },
    /// Two incompatible concrete types were asserted equal.
    TypeMismatch { left: String, right: String },
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::OccursCheckFailed { type_var, ty } => {
                write!(f, "occurs check failed: `{}` appears in `{}`", type_var, ty)
            }
            Error::TypeMismatch { left, right } => {
                write!(f, "cannot unify `{}` with `{}`", left, right)
            }
        }
    }
}

impl core::error::Error for Error {}

/// A failed constraint: the originating pair plus the unification error.
#[derive(Debug)]
pub struct ConstraintError<'t> {
    pub constraint: Constraint<'t>,
    pub error: Error,
}

/// Solves equality constraints into a substitution.
///
/// The substitution maps type-variable ids to types and grows monotonically
/// as constraints are processed; the occurs check keeps it cycle-free.
/// Every [`Unifier::unify`] call first resolves both operands through the
/// current substitution, following variable chains transitively (never a
/// single hop), which is what makes the final substitution independent of
/// the order constraints are processed in. A reimplementation that binds
/// without re-resolving (a naive union-find without path-following) loses
/// that property.
pub struct Unifier<'t> {
    types: &'t TypeManager<'t>,
    subst: HashMap<u16, &'t Type<'t>>,
}

impl<'t> Unifier<'t> {
    pub fn new(types: &'t TypeManager<'t>) -> Self {
        Self {
            types,
            subst: HashMap::new(),
        }
    }

    /// Resolve a type by following the substitution chain.
    ///
    /// Follows bound variables transitively until a non-variable type or an
    /// unbound variable is reached. Does not descend into function types;
    /// see [`Unifier::apply`] for deep resolution.
    pub fn resolve(&self, mut ty: &'t Type<'t>) -> &'t Type<'t> {
        while let Type::TypeVar(id) = ty {
            match self.subst.get(id) {
                Some(&bound) => ty = bound,
                None => break,
            }
        }
        ty
    }

    /// Check if the variable `id` occurs in `ty`, resolving as it goes.
    fn occurs_in(&self, id: u16, ty: &'t Type<'t>) -> bool {
        match self.resolve(ty) {
            &Type::TypeVar(other) => other == id,
            &Type::Function { param, ret } => self.occurs_in(id, param) || self.occurs_in(id, ret),
            Type::Int | Type::Boolean | Type::Str | Type::Unit | Type::StrArray => false,
        }
    }

    /// Unify two types, updating the substitution.
    ///
    /// Both operands are resolved through the current substitution before
    /// anything else; equal resolved forms succeed with no change, a
    /// resolved variable is bound to the other side (after the occurs
    /// check), function types unify componentwise, and anything else is a
    /// mismatch.
    pub fn unify(&mut self, a: &'t Type<'t>, b: &'t Type<'t>) -> Result<(), Error> {
        let a = self.resolve(a);
        let b = self.resolve(b);

        if a == b {
            return Ok(());
        }

        match (a, b) {
            (&Type::TypeVar(id), _) => self.bind(id, a, b),
            (_, &Type::TypeVar(id)) => self.bind(id, b, a),
            (
                &Type::Function {
                    param: p1,
                    ret: r1,
                },
                &Type::Function {
                    param: p2,
                    ret: r2,
                },
            ) => {
                self.unify(p1, p2)?;
                self.unify(r1, r2)
            }
            _ => Err(Error::TypeMismatch {
                left: a.to_string(),
                right: b.to_string(),
            }),
        }
    }

    /// Bind an unbound variable to a type, after the occurs check.
    fn bind(&mut self, id: u16, var: &'t Type<'t>, ty: &'t Type<'t>) -> Result<(), Error> {
        if self.occurs_in(id, ty) {
            return Err(Error::OccursCheckFailed {
                type_var: var.to_string(),
                ty: ty.to_string(),
            });
        }
        trace!(var = %var, ty = %ty, "bind");
        self.subst.insert(id, ty);
        Ok(())
    }

    /// Apply `unify` to every constraint in the set.
    ///
    /// A failure carries the originating constraint; the set's iteration
    /// order does not affect the outcome.
    pub fn unify_all(&mut self, constraints: &ConstraintSet<'t>) -> Result<(), ConstraintError<'t>> {
        for &constraint in constraints.iter() {
            self.unify(constraint.left(), constraint.right())
                .map_err(|error| ConstraintError { constraint, error })?;
        }
        Ok(())
    }

    /// Fully resolve a type: follow variable chains to a fixpoint and
    /// rebuild function types from resolved components.
    ///
    /// A variable with no binding is returned as-is; callers that cannot
    /// tolerate leftover variables must check for them.
    pub fn apply(&self, ty: &'t Type<'t>) -> &'t Type<'t> {
        let resolved = self.resolve(ty);
        match resolved {
            &Type::Function { param, ret } => {
                self.types.function(self.apply(param), self.apply(ret))
            }
            _ => resolved,
        }
    }

    /// Number of variable bindings made so far.
    pub fn binding_count(&self) -> usize {
        self.subst.len()
    }
}
