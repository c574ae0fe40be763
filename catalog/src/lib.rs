use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub mod params;
pub use params::{ParamValue, ParameterSet, FALLBACK_NAME, NAME_KEY, PHASE_KEY, TYPE_KEY};

/// Equation used when a form names a type the catalog does not know.
pub const FALLBACK_EQUATION: &str = "0";

pub const DEFAULT_DURATION: f64 = 2.0;
pub const DEFAULT_SAMPLING_RATE: f64 = 4000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateParam {
    pub key: String,
    pub label: String,
    pub default: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalTypeTemplate {
    pub name: String,
    pub equation: String,
    #[serde(default)]
    pub params: Vec<TemplateParam>,
}

/// Ordered list of signal-type presets. Serialises as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalCatalog {
    templates: Vec<SignalTypeTemplate>,
}

#[derive(Serialize, Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    signal_types: Vec<SignalTypeTemplate>,
}

/// Parameters and equation produced by filling in a template.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalForm {
    pub params: ParameterSet,
    pub equation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Toml,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(CatalogFormat::Json),
            "toml" => Ok(CatalogFormat::Toml),
            _ => Err(CatalogError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub duration: f64,
    pub sampling_rate: f64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            sampling_rate: DEFAULT_SAMPLING_RATE,
        }
    }
}

impl GeneratorSettings {
    /// `floor(sampling_rate * duration)`, or zero when that is not a positive number.
    pub fn sample_count(&self) -> usize {
        let count = (self.sampling_rate * self.duration).floor();
        if count.is_finite() && count > 0.0 {
            count as usize
        } else {
            0
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("toml write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("unsupported catalog file '{0}' (expected .json or .toml)")]
    UnsupportedFormat(String),
}

impl SignalCatalog {
    pub fn new(templates: Vec<SignalTypeTemplate>) -> Self {
        Self { templates }
    }

    pub fn builtin() -> Self {
        let oscillator = |name: &str, function: &str| SignalTypeTemplate {
            name: name.to_string(),
            equation: format!(
                "amplitude * numpy.{function}(2 * numpy.pi * frequency * time + phase_rad) + offset"
            ),
            params: vec![
                param("amplitude", "Amplitude", 1.0),
                param("frequency", "Frequency, Hz", 5.0),
                param("phase", "Phase, deg", 0.0),
                param("offset", "Offset", 0.0),
            ],
        };
        Self::new(vec![
            oscillator("Sine", "sin"),
            oscillator("Cosine", "cos"),
            SignalTypeTemplate {
                name: "Square".to_string(),
                equation: "amplitude * numpy.sign(numpy.sin(2 * numpy.pi * frequency * time + phase_rad)) + offset"
                    .to_string(),
                params: vec![
                    param("amplitude", "Amplitude", 1.0),
                    param("frequency", "Frequency, Hz", 5.0),
                    param("phase", "Phase, deg", 0.0),
                    param("offset", "Offset", 0.0),
                ],
            },
            SignalTypeTemplate {
                name: "Sawtooth".to_string(),
                equation: "amplitude * (2 * ((frequency * time + phase / 360) % 1) - 1) + offset"
                    .to_string(),
                params: vec![
                    param("amplitude", "Amplitude", 1.0),
                    param("frequency", "Frequency, Hz", 5.0),
                    param("phase", "Phase, deg", 0.0),
                    param("offset", "Offset", 0.0),
                ],
            },
            SignalTypeTemplate {
                name: "Damped sine".to_string(),
                equation: "amplitude * numpy.exp(-decay * time) * numpy.sin(2 * numpy.pi * frequency * time + phase_rad)"
                    .to_string(),
                params: vec![
                    param("amplitude", "Amplitude", 1.0),
                    param("frequency", "Frequency, Hz", 5.0),
                    param("decay", "Decay, 1/s", 1.0),
                    param("phase", "Phase, deg", 0.0),
                ],
            },
        ])
    }

    pub fn from_json_str(data: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn from_toml_str(data: &str) -> Result<Self, CatalogError> {
        let catalog: TomlCatalog = toml::from_str(data)?;
        Ok(Self::new(catalog.signal_types))
    }

    pub fn to_toml_string(&self) -> Result<String, CatalogError> {
        let catalog = TomlCatalog {
            signal_types: self.templates.clone(),
        };
        Ok(toml::to_string_pretty(&catalog)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let format = CatalogFormat::from_path(path)?;
        let data = fs::read_to_string(path)?;
        match format {
            CatalogFormat::Json => Self::from_json_str(&data),
            CatalogFormat::Toml => Self::from_toml_str(&data),
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CatalogError> {
        let path = path.as_ref();
        let data = match CatalogFormat::from_path(path)? {
            CatalogFormat::Json => serde_json::to_string_pretty(self)?,
            CatalogFormat::Toml => self.to_toml_string()?,
        };
        fs::write(path, data)?;
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&SignalTypeTemplate> {
        self.templates.iter().find(|template| template.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates
            .iter()
            .map(|template| template.name.as_str())
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SignalTypeTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Fills `name`, `type` and every template default, then applies
    /// `overrides` on top.
    pub fn form(&self, type_name: &str, display_name: &str, overrides: &ParameterSet) -> SignalForm {
        let mut params = ParameterSet::new()
            .with(NAME_KEY, display_name)
            .with(TYPE_KEY, type_name);
        let equation = match self.find(type_name) {
            Some(template) => {
                for entry in &template.params {
                    params.insert(entry.key.as_str(), entry.default);
                }
                template.equation.clone()
            }
            None => FALLBACK_EQUATION.to_string(),
        };
        params.merge(overrides);
        SignalForm { params, equation }
    }
}

impl<'a> IntoIterator for &'a SignalCatalog {
    type Item = &'a SignalTypeTemplate;
    type IntoIter = std::slice::Iter<'a, SignalTypeTemplate>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.iter()
    }
}

fn param(key: &str, label: &str, default: f64) -> TemplateParam {
    TemplateParam {
        key: key.to_string(),
        label: label.to_string(),
        default,
    }
}
