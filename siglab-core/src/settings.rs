use catalog::GeneratorSettings;
use expression::EvalLimits;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("failed to read generator settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write generator settings file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid generator settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings patch must be a JSON object")]
    NotAnObject,
    #[error("unknown generator setting '{0}'")]
    UnknownKey(String),
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    #[error("{field} must be a positive finite number, got {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("duration {duration} at {sampling_rate} samples per unit gives no samples")]
    NoSamples { duration: f64, sampling_rate: f64 },
    #[error("{samples} samples exceeds the limit of {limit}")]
    TooManySamples { samples: usize, limit: usize },
}

pub fn normalize_generator_settings(
    settings: GeneratorSettings,
) -> Result<GeneratorSettings, SettingsError> {
    for (field, value) in [
        ("duration", settings.duration),
        ("sampling_rate", settings.sampling_rate),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(SettingsError::OutOfRange { field, value });
        }
    }
    let samples = settings.sample_count();
    if samples == 0 {
        return Err(SettingsError::NoSamples {
            duration: settings.duration,
            sampling_rate: settings.sampling_rate,
        });
    }
    let limit = EvalLimits::default().max_array_len;
    if samples > limit {
        return Err(SettingsError::TooManySamples { samples, limit });
    }
    Ok(settings)
}

pub fn load_generator_settings_file(path: &Path) -> Result<GeneratorSettings, SettingsError> {
    let data = std::fs::read(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: GeneratorSettings = serde_json::from_slice(&data)?;
    normalize_generator_settings(settings)
}

/// Loads `path`, falling back to defaults when the file does not exist yet.
pub fn load_generator_settings_or_default(
    path: &Path,
) -> Result<GeneratorSettings, SettingsError> {
    if path.exists() {
        load_generator_settings_file(path)
    } else {
        Ok(GeneratorSettings::default())
    }
}

pub fn save_generator_settings_file(
    path: &Path,
    settings: &GeneratorSettings,
) -> Result<(), SettingsError> {
    let settings = normalize_generator_settings(*settings)?;
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let data = serde_json::to_vec_pretty(&settings)?;
    std::fs::write(path, data).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Applies a partial JSON object such as `{"duration": 1.5}` on top of
/// `settings`.
pub fn apply_generator_settings_json(
    settings: &GeneratorSettings,
    json: &str,
) -> Result<GeneratorSettings, SettingsError> {
    let patch: serde_json::Value = serde_json::from_str(json)?;
    let obj = patch.as_object().ok_or(SettingsError::NotAnObject)?;

    let mut updated = *settings;
    for (key, value) in obj {
        let (field, slot) = match key.as_str() {
            "duration" => ("duration", &mut updated.duration),
            "sampling_rate" => ("sampling_rate", &mut updated.sampling_rate),
            other => return Err(SettingsError::UnknownKey(other.to_string())),
        };
        *slot = value.as_f64().ok_or(SettingsError::NotANumber(field))?;
    }
    normalize_generator_settings(updated)
}
