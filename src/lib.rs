//! Faun: a typed compiler for a small expression language.
//!
//! # Overview
//!
//! Faun compiles one source class of effect and function declarations into
//! a stack machine module. The interesting part is the middle of the
//! pipeline: a miniature Hindley-Milner type system (annotation, equality
//! constraints, unification with occurs checking, substitution) feeding a
//! code generator whose instruction selection is driven entirely by the
//! inferred types.
//!
//! The grammar-driven parser that produces the raw syntax tree and the
//! driver that persists compiled bytes live outside this crate; this crate
//! is the tree-to-module pipeline.
//!
//! # Quick Start
//!
//! ```
//! use faun::ast::{ArithExpr, ClassDecl, CompilationUnit, Expr, Factor, RoutineDecl, Term};
//! use faun::{CompileOptions, compile};
//!
//! let unit = CompilationUnit {
//!     namespace: None,
//!     uses: Vec::new(),
//!     exposes: Vec::new(),
//!     class: ClassDecl {
//!         name: "Main".into(),
//!         effects: Vec::new(),
//!         functions: vec![RoutineDecl {
//!             name: "two".into(),
//!             params: Default::default(),
//!             return_type: "Int".into(),
//!             body: Expr::Arith(ArithExpr::Binary {
//!                 left: Term::Simple(Factor::Int(1)),
//!                 right: Term::Simple(Factor::Int(1)),
//!                 op: faun::ast::ArithOp::Add,
//!             }),
//!         }],
//!     },
//! };
//!
//! let module = compile(&unit, &CompileOptions::default()).unwrap();
//! assert_eq!(module.qualified_name, "Main");
//! let bytes = module.to_bytes().unwrap();
//! assert_eq!(faun::Module::from_bytes(&bytes).unwrap(), module);
//! ```
//!
//! # Pipeline stages
//!
//! The stages are also available individually for hosts that want to stop
//! midway or inspect the typed tree: [`analyzer::type_check`] runs
//! annotation through substitution, [`Generator`] lowers the resolved tree.

// Re-export public API from faun_core
pub use faun_core::api::{CompileOptions, compile};

pub use faun_core::analyzer::{self, TypeError, TypeErrorKind, TypedUnit};
pub use faun_core::ast;
pub use faun_core::compiler::{CodegenError, Generator, Instruction, Module, Routine};
pub use faun_core::types::{self, Type, TypeManager};

// Arena allocator for hosts driving the stages individually.
pub use bumpalo;

mod diagnostics;
pub use diagnostics::Error;
