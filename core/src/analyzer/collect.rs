//! Stage 2: constraint collection.
//!
//! Derives the equality constraints a typed skeleton must satisfy. The
//! arithmetic tiers are monomorphically integer. A call node contributes
//! only its arguments' constraints: its own type stays free unless a use
//! site pins it (for example being the direct body of a declaration), and
//! arity or argument types are not checked against the callee's signature.

use hashbrown::HashMap;
use tracing::debug;

use crate::analyzer::typed_tree::{
    TypedArith, TypedExpr, TypedFactor, TypedRoutine, TypedTerm, TypedUnit,
};
use crate::types::constraint_set::ConstraintSet;
use crate::types::manager::TypeManager;
use crate::types::Type;

/// Parameter types in scope for the routine body being walked.
type Scope<'r, 't> = HashMap<&'r str, &'t Type<'t>>;

pub fn collect<'t>(types: &'t TypeManager<'t>, unit: &TypedUnit<'t>) -> ConstraintSet<'t> {
    let mut constraints = ConstraintSet::new();
    for routine in unit.class.routines() {
        collect_routine(types, routine, &mut constraints);
    }
    debug!(count = constraints.len(), "collected constraints");
    constraints
}

fn collect_routine<'t>(
    types: &'t TypeManager<'t>,
    routine: &TypedRoutine<'t>,
    out: &mut ConstraintSet<'t>,
) {
    let scope: Scope<'_, 't> = routine
        .params
        .iter()
        .map(|param| (param.name.as_str(), param.ty))
        .collect();

    // The unwrapped return type of the declared signature equals the body's
    // type.
    out.equate(routine.name.ty.unwrap_return(), routine.body.ty());

    collect_expr(types, &routine.body, &scope, out);
}

fn collect_expr<'t>(
    types: &'t TypeManager<'t>,
    expr: &TypedExpr<'t>,
    scope: &Scope<'_, 't>,
    out: &mut ConstraintSet<'t>,
) {
    match expr {
        // Literals are already concrete.
        TypedExpr::Str { .. } => {}
        TypedExpr::Print { inner, .. } => collect_expr(types, inner, scope, out),
        TypedExpr::Call { args, .. } => {
            for arg in args {
                collect_expr(types, arg, scope, out);
            }
        }
        TypedExpr::Arith(arith) => collect_arith(types, arith, scope, out),
    }
}

fn collect_arith<'t>(
    types: &'t TypeManager<'t>,
    arith: &TypedArith<'t>,
    scope: &Scope<'_, 't>,
    out: &mut ConstraintSet<'t>,
) {
    match arith {
        TypedArith::Binary {
            ty, left, right, ..
        } => {
            collect_term(types, left, scope, out);
            collect_term(types, right, scope, out);
            out.equate(*ty, types.int());
            out.equate(left.ty(), types.int());
            out.equate(right.ty(), types.int());
        }
        TypedArith::Operand { ty, term } => {
            collect_term(types, term, scope, out);
            out.equate(*ty, types.int());
            out.equate(term.ty(), types.int());
        }
    }
}

fn collect_term<'t>(
    types: &'t TypeManager<'t>,
    term: &TypedTerm<'t>,
    scope: &Scope<'_, 't>,
    out: &mut ConstraintSet<'t>,
) {
    match term {
        TypedTerm::Binary {
            ty, left, right, ..
        } => {
            collect_factor(types, left, scope, out);
            collect_factor(types, right, scope, out);
            out.equate(*ty, types.int());
            out.equate(left.ty(), types.int());
            out.equate(right.ty(), types.int());
        }
        TypedTerm::Simple { ty, factor } => {
            collect_factor(types, factor, scope, out);
            out.equate(*ty, types.int());
            out.equate(factor.ty(), types.int());
        }
    }
}

fn collect_factor<'t>(
    types: &'t TypeManager<'t>,
    factor: &TypedFactor<'t>,
    scope: &Scope<'_, 't>,
    out: &mut ConstraintSet<'t>,
) {
    match factor {
        TypedFactor::Int { .. } => {}
        TypedFactor::Ident(ident) => {
            // A parameter reference carries the parameter's declared type.
            // An identifier naming no parameter stays unconstrained here;
            // code generation rejects it.
            if let Some(&param_ty) = scope.get(ident.name.as_str()) {
                out.equate(ident.ty, param_ty);
            }
        }
        TypedFactor::Paren { ty, inner } => {
            collect_arith(types, inner, scope, out);
            out.equate(*ty, types.int());
        }
    }
}
