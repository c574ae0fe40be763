use crate::ast::{BinaryOp, CompareOp, Expr, UnaryOp};
use crate::error::EvaluationError;
use crate::limits::EvalLimits;
use crate::namespace::Namespace;
use crate::numeric::floor_mod;
use crate::parser::parse;
use crate::value::{map_unary, zip_binary, Value};

/// Tree-walking evaluator over a fixed [`Namespace`].
///
/// Evaluation never mutates the namespace; the only reachable capabilities are
/// the values bound into it.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    namespace: Namespace,
    limits: EvalLimits,
}

impl Interpreter {
    pub fn new(namespace: Namespace) -> Self {
        Self::with_limits(namespace, EvalLimits::default())
    }

    pub fn with_limits(namespace: Namespace, limits: EvalLimits) -> Self {
        Self { namespace, limits }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn namespace_mut(&mut self) -> &mut Namespace {
        &mut self.namespace
    }

    pub fn limits(&self) -> &EvalLimits {
        &self.limits
    }

    pub fn compile(&self, source: &str) -> Result<Expr, EvaluationError> {
        parse(source, &self.limits)
    }

    pub fn eval(&self, source: &str) -> Result<Value, EvaluationError> {
        let expr = self.compile(source)?;
        log::trace!("evaluating {expr:?}");
        self.eval_expr(&expr)
    }

    pub fn eval_expr(&self, expr: &Expr) -> Result<Value, EvaluationError> {
        match expr {
            Expr::Number(value) => Ok(Value::Number(*value)),
            Expr::Variable(name) => self
                .namespace
                .get(name)
                .cloned()
                .ok_or_else(|| EvaluationError::UndefinedName(name.clone())),
            Expr::Attribute { object, name } => match self.eval_expr(object)? {
                Value::Module(module) => {
                    module
                        .attribute(name)
                        .ok_or_else(|| EvaluationError::UnknownAttribute {
                            object: module_label(object),
                            name: name.clone(),
                        })
                }
                other => Err(EvaluationError::AttributeNotAllowed(other.type_name())),
            },
            Expr::Call { callee, args } => {
                let function = match self.eval_expr(callee)? {
                    Value::Function(function) => function,
                    other => return Err(EvaluationError::NotCallable(other.type_name())),
                };
                let values = args
                    .iter()
                    .map(|arg| self.eval_expr(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                function.call(&values, &self.limits)
            }
            Expr::Unary { op, operand } => apply_unary(*op, self.eval_expr(operand)?),
            Expr::Binary { op, left, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                apply_binary(*op, &left, &right)
            }
            Expr::Compare { op, left, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                apply_compare(*op, &left, &right)
            }
        }
    }
}

fn module_label(object: &Expr) -> String {
    match object {
        Expr::Variable(name) => format!("module '{name}'"),
        _ => "module".to_string(),
    }
}

fn apply_unary(op: UnaryOp, operand: Value) -> Result<Value, EvaluationError> {
    let symbol = match op {
        UnaryOp::Neg => "unary -",
        UnaryOp::Pos => "unary +",
    };
    let numeric = operand.numeric().ok_or(EvaluationError::BadArgument {
        function: symbol,
        kind: operand.type_name(),
    })?;
    Ok(match op {
        UnaryOp::Neg => map_unary(numeric, |x| -x),
        UnaryOp::Pos => map_unary(numeric, |x| x),
    })
}

fn apply_binary(
    op: BinaryOp,
    left: &Value,
    right: &Value,
) -> Result<Value, EvaluationError> {
    let (Some(a), Some(b)) = (left.numeric(), right.numeric()) else {
        return Err(EvaluationError::UnsupportedOperand {
            op: op.symbol(),
            left: left.type_name(),
            right: right.type_name(),
        });
    };

    // Plain scalars follow host float semantics: dividing by zero or raising a
    // negative base to a fractional power is an error rather than inf/nan.
    if let (Value::Number(x), Value::Number(y)) = (left, right) {
        return scalar_binary(op, *x, *y).map(Value::Number);
    }

    match op {
        BinaryOp::Add => zip_binary(a, b, |x, y| x + y),
        BinaryOp::Sub => zip_binary(a, b, |x, y| x - y),
        BinaryOp::Mul => zip_binary(a, b, |x, y| x * y),
        BinaryOp::Div => zip_binary(a, b, |x, y| x / y),
        BinaryOp::FloorDiv => zip_binary(a, b, |x, y| (x / y).floor()),
        BinaryOp::Mod => zip_binary(a, b, floor_mod),
        BinaryOp::Pow => zip_binary(a, b, f64::powf),
    }
}

fn scalar_binary(op: BinaryOp, x: f64, y: f64) -> Result<f64, EvaluationError> {
    match op {
        BinaryOp::Add => Ok(x + y),
        BinaryOp::Sub => Ok(x - y),
        BinaryOp::Mul => Ok(x * y),
        BinaryOp::Div | BinaryOp::FloorDiv | BinaryOp::Mod if y == 0.0 => {
            Err(EvaluationError::ZeroDivision)
        }
        BinaryOp::Div => Ok(x / y),
        BinaryOp::FloorDiv => Ok((x / y).floor()),
        BinaryOp::Mod => Ok(floor_mod(x, y)),
        BinaryOp::Pow => {
            if x == 0.0 && y < 0.0 {
                Err(EvaluationError::ZeroDivision)
            } else if x < 0.0 && y.is_finite() && y.fract() != 0.0 {
                Err(EvaluationError::NotReal)
            } else {
                Ok(x.powf(y))
            }
        }
    }
}

fn apply_compare(op: CompareOp, left: &Value, right: &Value) -> Result<Value, EvaluationError> {
    let (Some(a), Some(b)) = (left.numeric(), right.numeric()) else {
        return Err(EvaluationError::UnsupportedOperand {
            op: op.symbol(),
            left: left.type_name(),
            right: right.type_name(),
        });
    };
    zip_binary(a, b, |x, y| if op.holds(x, y) { 1.0 } else { 0.0 })
}
