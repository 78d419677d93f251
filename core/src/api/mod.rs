//! One-call compilation pipeline.

mod error;
mod options;

pub use error::Error;
pub use options::CompileOptions;

use bumpalo::Bump;

use crate::analyzer;
use crate::ast::CompilationUnit;
use crate::compiler::codegen::Generator;
use crate::compiler::module::Module;
use crate::types::manager::TypeManager;

/// Compile one unit to a module: type check, then generate code.
///
/// The pipeline is a pure function of its input: single-threaded,
/// synchronous, and deterministic. Compiling the same raw tree twice yields
/// byte-identical modules. All type data lives in an arena private to this
/// call; the returned module owns its data outright.
pub fn compile(unit: &CompilationUnit, options: &CompileOptions) -> Result<Module, Error> {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);

    let resolved = analyzer::type_check(types, unit)?;
    let module = Generator::new(options.call_target.as_str()).generate(&resolved)?;
    Ok(module)
}
