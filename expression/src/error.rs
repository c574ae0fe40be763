#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },
    #[error("expression is longer than {limit} characters")]
    TooLong { limit: usize },
    #[error("expression is nested deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error("name '{0}' is not defined")]
    UndefinedName(String),
    #[error("{object} has no attribute '{name}'")]
    UnknownAttribute { object: String, name: String },
    #[error("attribute access is not allowed on {0} values")]
    AttributeNotAllowed(&'static str),
    #[error("{0} value is not callable")]
    NotCallable(&'static str),
    #[error("{function}() takes {expected} but {given} were given")]
    Arity {
        function: &'static str,
        expected: &'static str,
        given: usize,
    },
    #[error("unsupported operand type(s) for {op}: '{left}' and '{right}'")]
    UnsupportedOperand {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("bad operand type for {function}(): '{kind}'")]
    BadArgument {
        function: &'static str,
        kind: &'static str,
    },
    #[error("operands could not be broadcast together with shapes ({left},) ({right},)")]
    ShapeMismatch { left: usize, right: usize },
    #[error("division by zero")]
    ZeroDivision,
    #[error("result is not a real number")]
    NotReal,
    #[error("array of {requested} elements exceeds the limit of {limit}")]
    ArrayTooLarge { requested: usize, limit: usize },
    #[error("invalid argument to {function}(): {message}")]
    InvalidArgument {
        function: &'static str,
        message: String,
    },
}

impl EvaluationError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }
}
