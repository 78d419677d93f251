//! Stage 4: substitution application.
//!
//! Rebuilds the typed tree with every type slot resolved through the
//! unifier's final substitution, following chains to a fixpoint. The
//! rebuild is pass-through for variables the substitution does not cover;
//! [`unresolved_in_unit`] finds those so the pipeline can refuse to
//! generate code from an underconstrained tree.

use ecow::EcoString;

use crate::analyzer::typed_tree::{
    TypedArith, TypedClass, TypedExpr, TypedFactor, TypedIdent, TypedRoutine, TypedTerm, TypedUnit,
};
use crate::types::unification::Unifier;
use crate::{Box, String, ToString, Vec};

pub fn apply<'t>(unifier: &Unifier<'t>, unit: &TypedUnit<'t>) -> TypedUnit<'t> {
    TypedUnit {
        namespace: unit.namespace.clone(),
        class: TypedClass {
            name: unit.class.name.clone(),
            effects: unit
                .class
                .effects
                .iter()
                .map(|routine| apply_routine(unifier, routine))
                .collect(),
            functions: unit
                .class
                .functions
                .iter()
                .map(|routine| apply_routine(unifier, routine))
                .collect(),
        },
    }
}

fn apply_routine<'t>(unifier: &Unifier<'t>, routine: &TypedRoutine<'t>) -> TypedRoutine<'t> {
    TypedRoutine {
        name: apply_ident(unifier, &routine.name),
        params: routine
            .params
            .iter()
            .map(|param| apply_ident(unifier, param))
            .collect(),
        body: apply_expr(unifier, &routine.body),
    }
}

fn apply_ident<'t>(unifier: &Unifier<'t>, ident: &TypedIdent<'t>) -> TypedIdent<'t> {
    TypedIdent {
        name: ident.name.clone(),
        ty: unifier.apply(ident.ty),
    }
}

fn apply_expr<'t>(unifier: &Unifier<'t>, expr: &TypedExpr<'t>) -> TypedExpr<'t> {
    match expr {
        TypedExpr::Str { value, ty } => TypedExpr::Str {
            value: value.clone(),
            ty: unifier.apply(*ty),
        },
        TypedExpr::Print { inner, ty } => TypedExpr::Print {
            inner: Box::new(apply_expr(unifier, inner)),
            ty: unifier.apply(*ty),
        },
        TypedExpr::Call { callee, args } => TypedExpr::Call {
            callee: apply_ident(unifier, callee),
            args: args.iter().map(|arg| apply_expr(unifier, arg)).collect(),
        },
        TypedExpr::Arith(arith) => TypedExpr::Arith(apply_arith(unifier, arith)),
    }
}

fn apply_arith<'t>(unifier: &Unifier<'t>, arith: &TypedArith<'t>) -> TypedArith<'t> {
    match arith {
        TypedArith::Binary {
            ty,
            left,
            right,
            op,
        } => TypedArith::Binary {
            ty: unifier.apply(*ty),
            left: apply_term(unifier, left),
            right: apply_term(unifier, right),
            op: *op,
        },
        TypedArith::Operand { ty, term } => TypedArith::Operand {
            ty: unifier.apply(*ty),
            term: apply_term(unifier, term),
        },
    }
}

fn apply_term<'t>(unifier: &Unifier<'t>, term: &TypedTerm<'t>) -> TypedTerm<'t> {
    match term {
        TypedTerm::Binary {
            ty,
            left,
            right,
            op,
        } => TypedTerm::Binary {
            ty: unifier.apply(*ty),
            left: apply_factor(unifier, left),
            right: apply_factor(unifier, right),
            op: *op,
        },
        TypedTerm::Simple { ty, factor } => TypedTerm::Simple {
            ty: unifier.apply(*ty),
            factor: apply_factor(unifier, factor),
        },
    }
}

fn apply_factor<'t>(unifier: &Unifier<'t>, factor: &TypedFactor<'t>) -> TypedFactor<'t> {
    match factor {
        TypedFactor::Int { value, ty } => TypedFactor::Int {
            value: *value,
            ty: unifier.apply(*ty),
        },
        TypedFactor::Ident(ident) => TypedFactor::Ident(apply_ident(unifier, ident)),
        TypedFactor::Paren { inner, ty } => TypedFactor::Paren {
            inner: Box::new(apply_arith(unifier, inner)),
            ty: unifier.apply(*ty),
        },
    }
}

/// Scan a resolved unit for types still containing variables.
///
/// Returns `(declaration name, rendered type)` for every offending type
/// slot, in declaration order. A non-empty result means the program does
/// not constrain those types and they cannot be inferred.
pub fn unresolved_in_unit(unit: &TypedUnit<'_>) -> Vec<(EcoString, String)> {
    let mut found = Vec::new();
    for routine in unit.class.routines() {
        scan_ident(&routine.name.name, &routine.name, &mut found);
        for param in &routine.params {
            scan_ident(&routine.name.name, param, &mut found);
        }
        scan_expr(&routine.name.name, &routine.body, &mut found);
    }
    found
}

fn scan_ident(declaration: &EcoString, ident: &TypedIdent<'_>, found: &mut Vec<(EcoString, String)>) {
    if ident.ty.has_vars() {
        found.push((declaration.clone(), ident.ty.to_string()));
    }
}

fn scan_ty(
    declaration: &EcoString,
    ty: &crate::types::Type<'_>,
    found: &mut Vec<(EcoString, String)>,
) {
    if ty.has_vars() {
        found.push((declaration.clone(), ty.to_string()));
    }
}

fn scan_expr(declaration: &EcoString, expr: &TypedExpr<'_>, found: &mut Vec<(EcoString, String)>) {
    match expr {
        TypedExpr::Str { ty, .. } => scan_ty(declaration, ty, found),
        TypedExpr::Print { inner, ty } => {
            scan_ty(declaration, ty, found);
            scan_expr(declaration, inner, found);
        }
        TypedExpr::Call { callee, args } => {
            scan_ident(declaration, callee, found);
            for arg in args {
                scan_expr(declaration, arg, found);
            }
        }
        TypedExpr::Arith(arith) => scan_arith(declaration, arith, found),
    }
}

fn scan_arith(
    declaration: &EcoString,
    arith: &TypedArith<'_>,
    found: &mut Vec<(EcoString, String)>,
) {
    match arith {
        TypedArith::Binary { ty, left, right, .. } => {
            scan_ty(declaration, ty, found);
            scan_term(declaration, left, found);
            scan_term(declaration, right, found);
        }
        TypedArith::Operand { ty, term } => {
            scan_ty(declaration, ty, found);
            scan_term(declaration, term, found);
        }
    }
}

fn scan_term(declaration: &EcoString, term: &TypedTerm<'_>, found: &mut Vec<(EcoString, String)>) {
    match term {
        TypedTerm::Binary { ty, left, right, .. } => {
            scan_ty(declaration, ty, found);
            scan_factor(declaration, left, found);
            scan_factor(declaration, right, found);
        }
        TypedTerm::Simple { ty, factor } => {
            scan_ty(declaration, ty, found);
            scan_factor(declaration, factor, found);
        }
    }
}

fn scan_factor(
    declaration: &EcoString,
    factor: &TypedFactor<'_>,
    found: &mut Vec<(EcoString, String)>,
) {
    match factor {
        TypedFactor::Int { ty, .. } => scan_ty(declaration, ty, found),
        TypedFactor::Ident(ident) => scan_ident(declaration, ident, found),
        TypedFactor::Paren { inner, ty } => {
            scan_ty(declaration, ty, found);
            scan_arith(declaration, inner, found);
        }
    }
}
