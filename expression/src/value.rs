use crate::error::EvaluationError;
use crate::numeric::{NumericFunction, NumericModule};

/// Runtime value flowing through the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Array(Vec<f64>),
    /// String parameters (signal name, type) are visible but not computable.
    Text(String),
    Module(NumericModule),
    Function(NumericFunction),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "float",
            Value::Array(_) => "ndarray",
            Value::Text(_) => "str",
            Value::Module(_) => "module",
            Value::Function(_) => "function",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Number(_) | Value::Array(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[f64]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub(crate) fn numeric(&self) -> Option<Numeric<'_>> {
        match self {
            Value::Number(value) => Some(Numeric::Scalar(*value)),
            Value::Array(values) => Some(Numeric::Array(values)),
            _ => None,
        }
    }

    /// Broadcasts a numeric value to exactly `len` samples.
    ///
    /// Scalars and one-element arrays are repeated; arrays of another length
    /// are rejected with [`EvaluationError::ShapeMismatch`].
    pub fn broadcast_to(self, len: usize) -> Result<Vec<f64>, EvaluationError> {
        match self {
            Value::Number(value) => Ok(vec![value; len]),
            Value::Array(values) if values.len() == len => Ok(values),
            Value::Array(values) if values.len() == 1 => Ok(vec![values[0]; len]),
            Value::Array(values) => Err(EvaluationError::ShapeMismatch {
                left: values.len(),
                right: len,
            }),
            other => Err(EvaluationError::BadArgument {
                function: "broadcast_to",
                kind: other.type_name(),
            }),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<Vec<f64>> for Value {
    fn from(values: Vec<f64>) -> Self {
        Value::Array(values)
    }
}

impl From<&[f64]> for Value {
    fn from(values: &[f64]) -> Self {
        Value::Array(values.to_vec())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

/// Borrowed numeric operand.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Numeric<'a> {
    Scalar(f64),
    Array(&'a [f64]),
}

impl Numeric<'_> {
    fn at(self, index: usize) -> f64 {
        match self {
            Numeric::Scalar(value) => value,
            Numeric::Array(values) if values.len() == 1 => values[0],
            Numeric::Array(values) => values[index],
        }
    }

    pub(crate) fn to_vec(self) -> Vec<f64> {
        match self {
            Numeric::Scalar(value) => vec![value],
            Numeric::Array(values) => values.to_vec(),
        }
    }
}

/// Common length of the operands under 1-D broadcasting, or `None` when every
/// operand is a scalar.
fn broadcast_len(operands: &[Numeric<'_>]) -> Result<Option<usize>, EvaluationError> {
    let mut len: Option<usize> = None;
    for operand in operands {
        if let Numeric::Array(values) = operand {
            len = match len {
                None => Some(values.len()),
                Some(current) if current == values.len() || values.len() == 1 => Some(current),
                Some(1) => Some(values.len()),
                Some(current) => {
                    return Err(EvaluationError::ShapeMismatch {
                        left: current,
                        right: values.len(),
                    })
                }
            };
        }
    }
    Ok(len)
}

pub(crate) fn map_unary(operand: Numeric<'_>, f: impl Fn(f64) -> f64) -> Value {
    match operand {
        Numeric::Scalar(value) => Value::Number(f(value)),
        Numeric::Array(values) => Value::Array(values.iter().map(|&v| f(v)).collect()),
    }
}

pub(crate) fn zip_binary(
    left: Numeric<'_>,
    right: Numeric<'_>,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Value, EvaluationError> {
    Ok(match broadcast_len(&[left, right])? {
        None => Value::Number(f(left.at(0), right.at(0))),
        Some(len) => Value::Array((0..len).map(|i| f(left.at(i), right.at(i))).collect()),
    })
}

pub(crate) fn zip_ternary(
    first: Numeric<'_>,
    second: Numeric<'_>,
    third: Numeric<'_>,
    f: impl Fn(f64, f64, f64) -> f64,
) -> Result<Value, EvaluationError> {
    Ok(match broadcast_len(&[first, second, third])? {
        None => Value::Number(f(first.at(0), second.at(0), third.at(0))),
        Some(len) => Value::Array(
            (0..len)
                .map(|i| f(first.at(i), second.at(i), third.at(i)))
                .collect(),
        ),
    })
}
