use catalog::{GeneratorSettings, ParamValue, ParameterSet, PHASE_KEY};
use expression::{EvalLimits, EvaluationError, Interpreter, Namespace, Value};
use serde::{Deserialize, Serialize};

pub const TIME_IDENT: &str = "time";
pub const NUMERIC_MODULE_IDENT: &str = "numpy";
pub const PHASE_RAD_IDENT: &str = "phase_rad";

/// Uniform time grid `t` and the amplitudes `y` computed over it.
///
/// Non-finite samples serialise as the strings `"NaN"`, `"Infinity"` and
/// `"-Infinity"` so they survive formats without such numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    #[serde(with = "samples")]
    pub t: Vec<f64>,
    #[serde(with = "samples")]
    pub y: Vec<f64>,
}

mod samples {
    use serde::de::{self, Deserialize, Deserializer};
    use serde::ser::{SerializeSeq, Serializer};

    const NAN: &str = "NaN";
    const INFINITY: &str = "Infinity";
    const NEG_INFINITY: &str = "-Infinity";

    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Sample {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for &value in values {
            if value.is_finite() {
                seq.serialize_element(&value)?;
            } else if value.is_nan() {
                seq.serialize_element(NAN)?;
            } else if value > 0.0 {
                seq.serialize_element(INFINITY)?;
            } else {
                seq.serialize_element(NEG_INFINITY)?;
            }
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Vec::<Sample>::deserialize(deserializer)?
            .into_iter()
            .map(|sample| match sample {
                Sample::Number(value) => Ok(value),
                Sample::Text(text) => match text.as_str() {
                    NAN => Ok(f64::NAN),
                    INFINITY => Ok(f64::INFINITY),
                    NEG_INFINITY => Ok(f64::NEG_INFINITY),
                    other => Err(de::Error::custom(format!("invalid sample '{other}'"))),
                },
            })
            .collect()
    }
}

impl TimeSeries {
    pub fn zeros(t: Vec<f64>) -> Self {
        let y = vec![0.0; t.len()];
        Self { t, y }
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.t.iter().copied().zip(self.y.iter().copied())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error("result of length {actual} cannot be broadcast to {expected} samples")]
    Shape { actual: usize, expected: usize },
    #[error("result must be a number or a numeric array, got {0}")]
    Type(&'static str),
    #[error("time grid of {samples} samples exceeds the limit of {limit}")]
    GridTooLarge { samples: usize, limit: usize },
}

/// `floor(sampling_rate * duration)` points spaced evenly over `[0, duration)`,
/// refused when that is more than `max_len` points.
pub fn time_grid(
    duration: f64,
    sampling_rate: f64,
    max_len: usize,
) -> Result<Vec<f64>, GenerateError> {
    let count = GeneratorSettings {
        duration,
        sampling_rate,
    }
    .sample_count();
    if count > max_len {
        return Err(GenerateError::GridTooLarge {
            samples: count,
            limit: max_len,
        });
    }
    if count == 0 {
        return Ok(Vec::new());
    }
    let step = duration / count as f64;
    Ok((0..count).map(|i| i as f64 * step).collect())
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignalGenerator {
    settings: GeneratorSettings,
    limits: EvalLimits,
}

impl SignalGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self::with_limits(settings, EvalLimits::default())
    }

    pub fn with_limits(settings: GeneratorSettings, limits: EvalLimits) -> Self {
        Self { settings, limits }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn limits(&self) -> &EvalLimits {
        &self.limits
    }

    /// Builds the names an equation sees: the numeric module, the time grid,
    /// every parameter, then `phase_rad` when `phase` is numeric. Later
    /// entries shadow earlier ones.
    pub fn namespace(&self, params: &ParameterSet, time: &[f64]) -> Namespace {
        let mut namespace = Namespace::with_numeric_module(NUMERIC_MODULE_IDENT);
        namespace.insert(TIME_IDENT, time);
        for (key, value) in params.iter() {
            let value = match value {
                ParamValue::Number(number) => Value::Number(*number),
                ParamValue::Text(text) => Value::Text(text.clone()),
            };
            namespace.insert(key, value);
        }
        match params.get(PHASE_KEY) {
            Some(ParamValue::Number(degrees)) => {
                namespace.insert(PHASE_RAD_IDENT, degrees.to_radians());
            }
            Some(ParamValue::Text(text)) => {
                log::warn!("phase '{text}' is not numeric; {PHASE_RAD_IDENT} is not defined");
            }
            None => {}
        }
        namespace
    }

    /// Evaluates `equation` and shapes the result to the time grid, reporting
    /// every failure to the caller.
    pub fn try_generate(
        &self,
        params: &ParameterSet,
        equation: &str,
    ) -> Result<TimeSeries, GenerateError> {
        let t = self.time_grid()?;
        let y = self.evaluate(params, equation, &t)?;
        Ok(TimeSeries { t, y })
    }

    /// Like [`try_generate`](Self::try_generate), but a failing equation
    /// yields an all-zero `y` of the right length and a logged warning.
    ///
    /// A grid beyond the array limit cannot be zero-filled either; it yields
    /// an empty series and a logged error.
    pub fn generate(&self, params: &ParameterSet, equation: &str) -> TimeSeries {
        let t = match self.time_grid() {
            Ok(t) => t,
            Err(err) => {
                log::error!("signal '{}' not generated: {err}", params.name());
                return TimeSeries::default();
            }
        };
        match self.evaluate(params, equation, &t) {
            Ok(y) => {
                log::debug!(
                    "generated {} samples for signal '{}'",
                    y.len(),
                    params.name()
                );
                TimeSeries { t, y }
            }
            Err(err) => {
                log::warn!(
                    "signal '{}' ({equation}) zero-filled: {err}",
                    params.name()
                );
                TimeSeries::zeros(t)
            }
        }
    }

    pub fn time_grid(&self) -> Result<Vec<f64>, GenerateError> {
        time_grid(
            self.settings.duration,
            self.settings.sampling_rate,
            self.limits.max_array_len,
        )
    }

    fn evaluate(
        &self,
        params: &ParameterSet,
        equation: &str,
        t: &[f64],
    ) -> Result<Vec<f64>, GenerateError> {
        let interpreter = Interpreter::with_limits(self.namespace(params, t), self.limits);
        let value = interpreter.eval(equation)?;
        fit_to_grid(value, t.len())
    }
}

fn fit_to_grid(value: Value, expected: usize) -> Result<Vec<f64>, GenerateError> {
    if !value.is_numeric() {
        return Err(GenerateError::Type(value.type_name()));
    }
    value.broadcast_to(expected).map_err(|err| match err {
        EvaluationError::ShapeMismatch { left, .. } => GenerateError::Shape {
            actual: left,
            expected,
        },
        other => GenerateError::Evaluation(other),
    })
}

/// One-shot generation with the zero-fill policy.
pub fn generate_signal_data(
    params: &ParameterSet,
    equation: &str,
    duration: f64,
    sampling_rate: f64,
) -> TimeSeries {
    SignalGenerator::new(GeneratorSettings {
        duration,
        sampling_rate,
    })
    .generate(params, equation)
}
