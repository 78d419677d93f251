pub mod constraint_set;
pub mod manager;
mod types;
pub mod unification;

pub use constraint_set::{Constraint, ConstraintSet};
pub use manager::TypeManager;
pub use types::Type;
