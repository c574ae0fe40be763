//! The numeric library exposed to equations under a single module identifier.
//!
//! Nothing here touches the host: every member is a pure function of its
//! arguments, and array builders are bounded by [`EvalLimits`].

use crate::error::EvaluationError;
use crate::limits::EvalLimits;
use crate::value::{map_unary, zip_binary, zip_ternary, Numeric, Value};
use std::f64::consts::{E, PI};

/// Marker for the numeric module value bound into a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumericModule;

impl NumericModule {
    pub fn attribute(self, name: &str) -> Option<Value> {
        match name {
            "pi" => Some(Value::Number(PI)),
            "e" => Some(Value::Number(E)),
            "inf" => Some(Value::Number(f64::INFINITY)),
            "nan" => Some(Value::Number(f64::NAN)),
            _ => NumericFunction::lookup(name).map(Value::Function),
        }
    }

    pub fn members() -> impl Iterator<Item = &'static str> {
        ["pi", "e", "inf", "nan"]
            .into_iter()
            .chain(FUNCTIONS.iter().map(|(name, _)| *name))
    }
}

#[derive(Clone, Copy)]
enum Kernel {
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> f64),
    Ternary(fn(f64, f64, f64) -> f64),
    Reduce(fn(&[f64]) -> Result<f64, &'static str>),
    Build(Builder),
}

#[derive(Clone, Copy)]
enum Builder {
    ZerosLike,
    OnesLike,
    FullLike,
    Cumsum,
    Zeros,
    Ones,
    Linspace,
}

const FUNCTIONS: &[(&str, Kernel)] = &[
    ("sin", Kernel::Unary(f64::sin)),
    ("cos", Kernel::Unary(f64::cos)),
    ("tan", Kernel::Unary(f64::tan)),
    ("arcsin", Kernel::Unary(f64::asin)),
    ("arccos", Kernel::Unary(f64::acos)),
    ("arctan", Kernel::Unary(f64::atan)),
    ("sinh", Kernel::Unary(f64::sinh)),
    ("cosh", Kernel::Unary(f64::cosh)),
    ("tanh", Kernel::Unary(f64::tanh)),
    ("arcsinh", Kernel::Unary(f64::asinh)),
    ("arccosh", Kernel::Unary(f64::acosh)),
    ("arctanh", Kernel::Unary(f64::atanh)),
    ("exp", Kernel::Unary(f64::exp)),
    ("expm1", Kernel::Unary(f64::exp_m1)),
    ("log", Kernel::Unary(f64::ln)),
    ("log10", Kernel::Unary(f64::log10)),
    ("log2", Kernel::Unary(f64::log2)),
    ("log1p", Kernel::Unary(f64::ln_1p)),
    ("sqrt", Kernel::Unary(f64::sqrt)),
    ("cbrt", Kernel::Unary(f64::cbrt)),
    ("square", Kernel::Unary(|x| x * x)),
    ("abs", Kernel::Unary(f64::abs)),
    ("absolute", Kernel::Unary(f64::abs)),
    ("fabs", Kernel::Unary(f64::abs)),
    ("sign", Kernel::Unary(sign)),
    ("floor", Kernel::Unary(f64::floor)),
    ("ceil", Kernel::Unary(f64::ceil)),
    ("round", Kernel::Unary(f64::round_ties_even)),
    ("rint", Kernel::Unary(f64::round_ties_even)),
    ("trunc", Kernel::Unary(f64::trunc)),
    ("deg2rad", Kernel::Unary(f64::to_radians)),
    ("radians", Kernel::Unary(f64::to_radians)),
    ("rad2deg", Kernel::Unary(f64::to_degrees)),
    ("degrees", Kernel::Unary(f64::to_degrees)),
    ("sinc", Kernel::Unary(sinc)),
    ("negative", Kernel::Unary(|x| -x)),
    ("reciprocal", Kernel::Unary(|x| 1.0 / x)),
    ("arctan2", Kernel::Binary(f64::atan2)),
    ("power", Kernel::Binary(f64::powf)),
    ("mod", Kernel::Binary(floor_mod)),
    ("fmod", Kernel::Binary(|a, b| a % b)),
    ("minimum", Kernel::Binary(minimum)),
    ("maximum", Kernel::Binary(maximum)),
    ("hypot", Kernel::Binary(f64::hypot)),
    ("heaviside", Kernel::Binary(heaviside)),
    ("clip", Kernel::Ternary(|x, lo, hi| minimum(maximum(x, lo), hi))),
    ("where", Kernel::Ternary(|cond, a, b| if cond != 0.0 { a } else { b })),
    ("sum", Kernel::Reduce(|values| Ok(values.iter().sum()))),
    ("mean", Kernel::Reduce(mean)),
    ("min", Kernel::Reduce(|values| extremum(values, minimum))),
    ("amin", Kernel::Reduce(|values| extremum(values, minimum))),
    ("max", Kernel::Reduce(|values| extremum(values, maximum))),
    ("amax", Kernel::Reduce(|values| extremum(values, maximum))),
    ("std", Kernel::Reduce(std_dev)),
    ("ptp", Kernel::Reduce(peak_to_peak)),
    ("zeros_like", Kernel::Build(Builder::ZerosLike)),
    ("ones_like", Kernel::Build(Builder::OnesLike)),
    ("full_like", Kernel::Build(Builder::FullLike)),
    ("cumsum", Kernel::Build(Builder::Cumsum)),
    ("zeros", Kernel::Build(Builder::Zeros)),
    ("ones", Kernel::Build(Builder::Ones)),
    ("linspace", Kernel::Build(Builder::Linspace)),
];

/// A callable member of the numeric module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericFunction(usize);

impl NumericFunction {
    pub fn lookup(name: &str) -> Option<Self> {
        FUNCTIONS
            .iter()
            .position(|(candidate, _)| *candidate == name)
            .map(NumericFunction)
    }

    pub fn name(self) -> &'static str {
        FUNCTIONS[self.0].0
    }

    fn kernel(self) -> Kernel {
        FUNCTIONS[self.0].1
    }

    pub fn call(self, args: &[Value], limits: &EvalLimits) -> Result<Value, EvaluationError> {
        let name = self.name();
        match self.kernel() {
            Kernel::Unary(f) => {
                let [x] = self.numeric_args::<1>(args, "exactly 1 argument")?;
                Ok(map_unary(x, f))
            }
            Kernel::Binary(f) => {
                let [a, b] = self.numeric_args::<2>(args, "exactly 2 arguments")?;
                zip_binary(a, b, f)
            }
            Kernel::Ternary(f) => {
                let [a, b, c] = self.numeric_args::<3>(args, "exactly 3 arguments")?;
                zip_ternary(a, b, c, f)
            }
            Kernel::Reduce(f) => {
                let [x] = self.numeric_args::<1>(args, "exactly 1 argument")?;
                let values = x.to_vec();
                f(&values)
                    .map(Value::Number)
                    .map_err(|message| EvaluationError::InvalidArgument {
                        function: name,
                        message: message.to_string(),
                    })
            }
            Kernel::Build(builder) => self.build(builder, args, limits),
        }
    }

    fn numeric_args<'a, const N: usize>(
        self,
        args: &'a [Value],
        expected: &'static str,
    ) -> Result<[Numeric<'a>; N], EvaluationError> {
        if args.len() != N {
            return Err(EvaluationError::Arity {
                function: self.name(),
                expected,
                given: args.len(),
            });
        }
        let mut operands = [Numeric::Scalar(0.0); N];
        for (slot, arg) in operands.iter_mut().zip(args) {
            *slot = arg.numeric().ok_or(EvaluationError::BadArgument {
                function: self.name(),
                kind: arg.type_name(),
            })?;
        }
        Ok(operands)
    }

    fn build(
        self,
        builder: Builder,
        args: &[Value],
        limits: &EvalLimits,
    ) -> Result<Value, EvaluationError> {
        match builder {
            Builder::ZerosLike => {
                let [x] = self.numeric_args::<1>(args, "exactly 1 argument")?;
                Ok(map_unary(x, |_| 0.0))
            }
            Builder::OnesLike => {
                let [x] = self.numeric_args::<1>(args, "exactly 1 argument")?;
                Ok(map_unary(x, |_| 1.0))
            }
            Builder::FullLike => {
                let [x, fill] = self.numeric_args::<2>(args, "exactly 2 arguments")?;
                let Numeric::Scalar(fill) = fill else {
                    return Err(self.invalid("fill value must be a scalar"));
                };
                Ok(map_unary(x, |_| fill))
            }
            Builder::Cumsum => {
                let [x] = self.numeric_args::<1>(args, "exactly 1 argument")?;
                let mut total = 0.0;
                let values = x
                    .to_vec()
                    .into_iter()
                    .map(|v| {
                        total += v;
                        total
                    })
                    .collect();
                Ok(Value::Array(values))
            }
            Builder::Zeros | Builder::Ones => {
                let [n] = self.numeric_args::<1>(args, "exactly 1 argument")?;
                let len = self.count_arg(n, limits)?;
                let fill = if matches!(builder, Builder::Zeros) { 0.0 } else { 1.0 };
                Ok(Value::Array(vec![fill; len]))
            }
            Builder::Linspace => {
                let (start, stop, num) = match args.len() {
                    2 => {
                        let [start, stop] = self.numeric_args::<2>(args, "2 or 3 arguments")?;
                        (start, stop, Numeric::Scalar(50.0))
                    }
                    _ => {
                        let [start, stop, num] =
                            self.numeric_args::<3>(args, "2 or 3 arguments")?;
                        (start, stop, num)
                    }
                };
                let (Numeric::Scalar(start), Numeric::Scalar(stop)) = (start, stop) else {
                    return Err(self.invalid("start and stop must be scalars"));
                };
                let len = self.count_arg(num, limits)?;
                Ok(Value::Array(linspace(start, stop, len)))
            }
        }
    }

    fn count_arg(self, arg: Numeric<'_>, limits: &EvalLimits) -> Result<usize, EvaluationError> {
        let Numeric::Scalar(count) = arg else {
            return Err(self.invalid("count must be a scalar"));
        };
        if !count.is_finite() || count < 0.0 || count.fract() != 0.0 {
            return Err(self.invalid("count must be a non-negative integer"));
        }
        // `as` saturates, so absurd counts still trip the limit below.
        let len = count as usize;
        limits.check_array_len(len)?;
        Ok(len)
    }

    fn invalid(self, message: &str) -> EvaluationError {
        EvaluationError::InvalidArgument {
            function: self.name(),
            message: message.to_string(),
        }
    }
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x
    }
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let arg = PI * x;
        arg.sin() / arg
    }
}

/// Remainder carrying the sign of the divisor.
pub(crate) fn floor_mod(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

fn minimum(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn maximum(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

fn heaviside(x: f64, at_zero: f64) -> f64 {
    if x.is_nan() {
        f64::NAN
    } else if x < 0.0 {
        0.0
    } else if x > 0.0 {
        1.0
    } else {
        at_zero
    }
}

fn mean(values: &[f64]) -> Result<f64, &'static str> {
    if values.is_empty() {
        return Ok(f64::NAN);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

fn extremum(values: &[f64], pick: fn(f64, f64) -> f64) -> Result<f64, &'static str> {
    let (first, rest) = values
        .split_first()
        .ok_or("zero-size array has no identity")?;
    Ok(rest.iter().fold(*first, |acc, &v| pick(acc, v)))
}

fn std_dev(values: &[f64]) -> Result<f64, &'static str> {
    let center = mean(values)?;
    let variance = values.iter().map(|v| (v - center).powi(2)).sum::<f64>() / values.len() as f64;
    Ok(variance.sqrt())
}

fn peak_to_peak(values: &[f64]) -> Result<f64, &'static str> {
    Ok(extremum(values, maximum)? - extremum(values, minimum)?)
}

fn linspace(start: f64, stop: f64, len: usize) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (len - 1) as f64;
            let mut values: Vec<f64> = (0..len).map(|i| start + i as f64 * step).collect();
            values[len - 1] = stop;
            values
        }
    }
}
