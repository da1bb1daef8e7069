use crate::error_codes::ErrorCode;
use lumina_ir::Location;

/// The single error value threaded out of the tokenizer, parser, and
/// semantic analyzer. Carries enough to render a diagnostic later without
/// forcing every phase to format text itself.
#[derive(Debug, Clone)]
pub struct CompilerError {
    pub code: ErrorCode,
    pub message: String,
    pub location: Location,
}

impl CompilerError {
    pub fn new(code: ErrorCode, message: impl Into<String>, location: Location) -> Self {
        CompilerError {
            code,
            message: message.into(),
            location,
        }
    }
}

impl std::fmt::Display for CompilerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}

impl std::error::Error for CompilerError {}

pub type CompileResult<T> = Result<T, CompilerError>;
