//! Stage 1: type annotation.
//!
//! Walks the raw tree and produces the typed skeleton: concrete types where
//! the grammar fixes them, fresh type variables everywhere else. Callee
//! signatures are deliberately not looked up here; calls resolve during
//! unification, which is what lets a routine reference itself or a routine
//! declared after it without a pre-pass symbol table.
//!
//! This stage cannot fail.

use smallvec::SmallVec;
use tracing::trace;

use crate::analyzer::typed_tree::{
    TypedArith, TypedClass, TypedExpr, TypedFactor, TypedIdent, TypedRoutine, TypedTerm, TypedUnit,
};
use crate::ast;
use crate::types::manager::TypeManager;
use crate::Box;

pub fn annotate<'t>(types: &'t TypeManager<'t>, unit: &ast::CompilationUnit) -> TypedUnit<'t> {
    TypedUnit {
        namespace: unit.namespace.clone(),
        class: TypedClass {
            name: unit.class.name.clone(),
            effects: unit
                .class
                .effects
                .iter()
                .map(|decl| annotate_routine(types, decl))
                .collect(),
            functions: unit
                .class
                .functions
                .iter()
                .map(|decl| annotate_routine(types, decl))
                .collect(),
        },
    }
}

fn annotate_routine<'t>(types: &'t TypeManager<'t>, decl: &ast::RoutineDecl) -> TypedRoutine<'t> {
    let params: SmallVec<[TypedIdent<'t>; 4]> = decl
        .params
        .iter()
        .map(|param| TypedIdent {
            name: param.name.clone(),
            ty: types.from_name(&param.type_name),
        })
        .collect();

    // Curried routine type: right-fold the parameter types onto the return
    // type, so `f(a: Int, b: Int): Int` gets `Int -> Int -> Int` and a
    // zero-parameter routine gets its return type directly.
    let mut routine_ty = types.from_name(&decl.return_type);
    for param in params.iter().rev() {
        routine_ty = types.function(param.ty, routine_ty);
    }

    trace!(name = %decl.name, ty = %routine_ty, "annotated declaration");

    TypedRoutine {
        name: TypedIdent {
            name: decl.name.clone(),
            ty: routine_ty,
        },
        params,
        body: annotate_expr(types, &decl.body),
    }
}

fn annotate_expr<'t>(types: &'t TypeManager<'t>, expr: &ast::Expr) -> TypedExpr<'t> {
    match expr {
        ast::Expr::Str(value) => TypedExpr::Str {
            value: value.clone(),
            ty: types.str(),
        },
        // The print node itself is Unit; its argument keeps its own type.
        ast::Expr::Print(inner) => TypedExpr::Print {
            inner: Box::new(annotate_expr(types, inner)),
            ty: types.unit(),
        },
        ast::Expr::Call { name, args } => TypedExpr::Call {
            callee: TypedIdent {
                name: name.clone(),
                ty: types.fresh_var(),
            },
            args: args.iter().map(|arg| annotate_expr(types, arg)).collect(),
        },
        ast::Expr::Arith(arith) => TypedExpr::Arith(annotate_arith(types, arith)),
    }
}

fn annotate_arith<'t>(types: &'t TypeManager<'t>, arith: &ast::ArithExpr) -> TypedArith<'t> {
    match arith {
        ast::ArithExpr::Binary { left, right, op } => TypedArith::Binary {
            ty: types.fresh_var(),
            left: annotate_term(types, left),
            right: annotate_term(types, right),
            op: *op,
        },
        ast::ArithExpr::Operand(term) => TypedArith::Operand {
            ty: types.fresh_var(),
            term: annotate_term(types, term),
        },
    }
}

fn annotate_term<'t>(types: &'t TypeManager<'t>, term: &ast::Term) -> TypedTerm<'t> {
    match term {
        ast::Term::Binary { left, right, op } => TypedTerm::Binary {
            ty: types.fresh_var(),
            left: annotate_factor(types, left),
            right: annotate_factor(types, right),
            op: *op,
        },
        ast::Term::Simple(factor) => TypedTerm::Simple {
            ty: types.fresh_var(),
            factor: annotate_factor(types, factor),
        },
    }
}

fn annotate_factor<'t>(types: &'t TypeManager<'t>, factor: &ast::Factor) -> TypedFactor<'t> {
    match factor {
        ast::Factor::Int(value) => TypedFactor::Int {
            value: *value,
            ty: types.int(),
        },
        ast::Factor::Ident(name) => TypedFactor::Ident(TypedIdent {
            name: name.clone(),
            ty: types.fresh_var(),
        }),
        ast::Factor::Paren(inner) => TypedFactor::Paren {
            inner: Box::new(annotate_arith(types, inner)),
            ty: types.fresh_var(),
        },
    }
}
