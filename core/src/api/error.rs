use core::fmt::Display;

use crate::analyzer::TypeError;
use crate::compiler::error::CodegenError;

/// Any fatal compilation error.
///
/// Every variant aborts compilation of the whole unit: no partial output,
/// no retry. The pipeline is deterministic, so retrying without a change
/// cannot succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Type(TypeError),
    Codegen(CodegenError),
}

impl From<TypeError> for Error {
    fn from(error: TypeError) -> Self {
        Error::Type(error)
    }
}

impl From<CodegenError> for Error {
    fn from(error: CodegenError) -> Self {
        Error::Codegen(error)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Type(error) => write!(f, "{}", error),
            Error::Codegen(error) => write!(f, "{}", error),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::Type(error) => Some(error),
            Error::Codegen(error) => Some(error),
        }
    }
}
