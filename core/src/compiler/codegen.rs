//! Stage 5: lowering a resolved typed tree to a module.
//!
//! One emitted routine per declaration. Bodies lower post-order: operands
//! are fully evaluated before their operator, left before right.
//! Parenthesized groupings and single-child wrappers are transparent;
//! grouping only overrides evaluation order, it never adds instructions.

use hashbrown::HashMap;
use tracing::debug;

use crate::analyzer::typed_tree::{
    TypedArith, TypedExpr, TypedFactor, TypedRoutine, TypedTerm, TypedUnit,
};
use crate::ast::{ArithOp, TermOp};
use crate::compiler::descriptor::{field_descriptor, routine_descriptor};
use crate::compiler::error::CodegenError;
use crate::compiler::module::{Instruction, Module, Routine};
use crate::types::Type;
use crate::{String, ToString, Vec, format};

/// Lowers resolved units to compiled modules.
pub struct Generator {
    /// Module location that call instructions resolve against. Calls are
    /// bound by name against this single location; cross-module linking is
    /// out of scope.
    call_target: String,
}

impl Generator {
    pub fn new(call_target: impl Into<String>) -> Self {
        Self {
            call_target: call_target.into(),
        }
    }

    /// Lower one resolved unit to a compiled module.
    pub fn generate(&self, unit: &TypedUnit<'_>) -> Result<Module, CodegenError> {
        let mut routines = Vec::new();
        for decl in unit.class.routines() {
            routines.push(self.lower_routine(decl)?);
        }
        let module = Module {
            qualified_name: unit.qualified_name(),
            routines,
        };
        debug!(
            module = %module.qualified_name,
            routines = module.routines.len(),
            "generated module"
        );
        Ok(module)
    }

    fn lower_routine(&self, decl: &TypedRoutine<'_>) -> Result<Routine, CodegenError> {
        let descriptor = routine_descriptor(decl.name.ty)?;

        let mut body = RoutineBody::new(&self.call_target, decl)?;
        body.lower_expr(&decl.body)?;
        body.emit_return(decl.name.ty.unwrap_return())?;

        Ok(Routine {
            name: decl.name.name.to_string(),
            descriptor,
            instructions: body.instructions,
        })
    }
}

/// Per-routine lowering state: the instruction buffer and the parameter
/// slot table.
struct RoutineBody<'r> {
    call_target: &'r str,
    routine: &'r str,
    slots: HashMap<&'r str, u16>,
    instructions: Vec<Instruction>,
}

impl<'r> RoutineBody<'r> {
    fn new(call_target: &'r str, decl: &'r TypedRoutine<'_>) -> Result<Self, CodegenError> {
        let mut slots = HashMap::new();
        for (index, param) in decl.params.iter().enumerate() {
            let slot = u16::try_from(index).map_err(|_| CodegenError::TooManyParameters {
                routine: decl.name.name.to_string(),
            })?;
            slots.insert(param.name.as_str(), slot);
        }
        Ok(Self {
            call_target,
            routine: decl.name.name.as_str(),
            slots,
            instructions: Vec::new(),
        })
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn lower_expr(&mut self, expr: &TypedExpr<'_>) -> Result<(), CodegenError> {
        match expr {
            TypedExpr::Str { value, .. } => {
                self.emit(Instruction::PushStr(value.to_string()));
                Ok(())
            }
            TypedExpr::Print { inner, .. } => {
                self.emit(Instruction::PushStream);
                self.lower_expr(inner)?;
                // Concrete print overload per printed type, not one generic
                // print.
                let descriptor = format!("({})V", field_descriptor(inner.ty())?);
                self.emit(Instruction::InvokePrint { descriptor });
                Ok(())
            }
            TypedExpr::Call { callee, args } => {
                for arg in args {
                    self.lower_expr(arg)?;
                }
                let descriptor = routine_descriptor(callee.ty)?;
                self.emit(Instruction::Call {
                    target: String::from(self.call_target),
                    name: callee.name.to_string(),
                    descriptor,
                });
                Ok(())
            }
            TypedExpr::Arith(arith) => self.lower_arith(arith),
        }
    }

    fn lower_arith(&mut self, arith: &TypedArith<'_>) -> Result<(), CodegenError> {
        match arith {
            TypedArith::Binary {
                left, right, op, ..
            } => {
                self.lower_term(left)?;
                self.lower_term(right)?;
                self.emit(match op {
                    ArithOp::Add => Instruction::Add,
                    ArithOp::Subtract => Instruction::Sub,
                });
                Ok(())
            }
            TypedArith::Operand { term, .. } => self.lower_term(term),
        }
    }

    fn lower_term(&mut self, term: &TypedTerm<'_>) -> Result<(), CodegenError> {
        match term {
            TypedTerm::Binary {
                left, right, op, ..
            } => {
                self.lower_factor(left)?;
                self.lower_factor(right)?;
                self.emit(match op {
                    TermOp::Multiply => Instruction::Mul,
                    TermOp::Divide => Instruction::Div,
                });
                Ok(())
            }
            TypedTerm::Simple { factor, .. } => self.lower_factor(factor),
        }
    }

    fn lower_factor(&mut self, factor: &TypedFactor<'_>) -> Result<(), CodegenError> {
        match factor {
            TypedFactor::Int { value, .. } => {
                self.emit(Instruction::PushInt(*value));
                Ok(())
            }
            TypedFactor::Ident(ident) => match self.slots.get(ident.name.as_str()) {
                Some(&slot) => {
                    self.emit(Instruction::LoadParam(slot));
                    Ok(())
                }
                None => Err(CodegenError::UnknownParameter {
                    routine: String::from(self.routine),
                    name: ident.name.to_string(),
                }),
            },
            TypedFactor::Paren { inner, .. } => self.lower_arith(inner),
        }
    }

    fn emit_return(&mut self, ret: &Type<'_>) -> Result<(), CodegenError> {
        match ret {
            Type::Unit => self.emit(Instruction::Return),
            // Both integer-width.
            Type::Int | Type::Boolean => self.emit(Instruction::ReturnValue),
            Type::Str | Type::StrArray => self.emit(Instruction::ReturnRef),
            // A bare function or unresolved variable here is an upstream
            // pipeline defect, not a user error.
            Type::Function { .. } | Type::TypeVar(_) => {
                return Err(CodegenError::UnsupportedReturnType {
                    routine: String::from(self.routine),
                    ty: ret.to_string(),
                });
            }
        }
        Ok(())
    }
}
