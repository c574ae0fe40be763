//! Sandboxed evaluation of signal equations.
//!
//! An equation is parsed into an [`Expr`] tree and walked against a
//! [`Namespace`]. The grammar has no statements, imports, assignment or
//! subscripts, and attribute access is only legal on the numeric module, so
//! an equation can read the values it was given and nothing else.

pub mod ast;
pub mod error;
pub mod interpreter;
pub mod limits;
pub mod namespace;
pub mod numeric;
pub mod parser;
pub mod value;

pub use ast::{BinaryOp, CompareOp, Expr, UnaryOp};
pub use error::EvaluationError;
pub use interpreter::Interpreter;
pub use limits::EvalLimits;
pub use namespace::Namespace;
pub use numeric::{NumericFunction, NumericModule};
pub use parser::parse;
pub use value::Value;

