use crate::String;

/// Compilation options.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Module location that routine calls are resolved against. The
    /// pipeline assumes one fixed, externally configured location for every
    /// call; resolving names across modules is out of scope.
    pub call_target: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            call_target: String::from("Main"),
        }
    }
}
