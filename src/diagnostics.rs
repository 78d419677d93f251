//! Host-facing diagnostics.
//!
//! The core reports plain errors; this wrapper adds miette diagnostic codes
//! so host applications get render-ready reports.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(code(faun::type_check))]
    Type(#[from] faun_core::analyzer::TypeError),

    #[error(transparent)]
    #[diagnostic(code(faun::codegen))]
    Codegen(#[from] faun_core::compiler::CodegenError),
}

impl From<faun_core::api::Error> for Error {
    fn from(error: faun_core::api::Error) -> Self {
        match error {
            faun_core::api::Error::Type(error) => Error::Type(error),
            faun_core::api::Error::Codegen(error) => Error::Codegen(error),
        }
    }
}
