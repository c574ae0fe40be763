use crate::error::EvaluationError;

pub const DEFAULT_MAX_SOURCE_LEN: usize = 10_000;
pub const DEFAULT_MAX_DEPTH: usize = 128;
pub const DEFAULT_MAX_ARRAY_LEN: usize = 1 << 24;

/// Bounds applied to untrusted equations. Every violation surfaces as an
/// [`EvaluationError`], never as a panic or an unbounded allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalLimits {
    /// Maximum number of characters in the source text.
    pub max_source_len: usize,
    /// Maximum nesting of operators, calls and parentheses.
    pub max_depth: usize,
    /// Maximum length of an array built inside an equation.
    pub max_array_len: usize,
}

impl Default for EvalLimits {
    fn default() -> Self {
        Self {
            max_source_len: DEFAULT_MAX_SOURCE_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_len: DEFAULT_MAX_ARRAY_LEN,
        }
    }
}

impl EvalLimits {
    pub fn check_array_len(&self, requested: usize) -> Result<(), EvaluationError> {
        if requested > self.max_array_len {
            return Err(EvaluationError::ArrayTooLarge {
                requested,
                limit: self.max_array_len,
            });
        }
        Ok(())
    }
}
