//! Type descriptors for the target module format.
//!
//! Single-token codes for the value types (`V` Unit, `I` Int, `B` Boolean),
//! reference codes for strings (`Ljava/lang/String;`, `[Ljava/lang/String;`),
//! and `(<params>)<ret>` for routines. The type model represents an n-ary
//! routine as n nested single-parameter functions, so the parameter chain is
//! re-flattened here into one descriptor with all n parameters in original
//! order.

use crate::compiler::error::CodegenError;
use crate::types::Type;
use crate::{String, ToString, format};

/// Descriptor for a value type.
///
/// Fails on type variables: descriptor mapping only ever runs on fully
/// resolved trees, so a surviving variable is an internal pipeline defect,
/// not a user error.
pub fn field_descriptor(ty: &Type<'_>) -> Result<String, CodegenError> {
    match ty {
        Type::Unit => Ok(String::from("V")),
        Type::Int => Ok(String::from("I")),
        Type::Boolean => Ok(String::from("B")),
        Type::Str => Ok(String::from("Ljava/lang/String;")),
        Type::StrArray => Ok(String::from("[Ljava/lang/String;")),
        Type::Function { .. } => routine_descriptor(ty),
        Type::TypeVar(_) => Err(CodegenError::UnmappableType {
            ty: ty.to_string(),
        }),
    }
}

/// Descriptor for a routine with the given (possibly curried) type.
///
/// Walks the parameter chain until the first non-function return type is
/// reached. A non-function type `R` describes a zero-parameter routine and
/// renders as `()R`.
pub fn routine_descriptor(ty: &Type<'_>) -> Result<String, CodegenError> {
    let mut params = String::new();
    let mut ret = ty;
    while let &Type::Function { param, ret: next } = ret {
        params.push_str(&field_descriptor(param)?);
        ret = next;
    }
    Ok(format!("({}){}", params, field_descriptor(ret)?))
}
