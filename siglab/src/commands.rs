use catalog::ParamValue;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "siglab", version, about = "Parametric signal generator")]
pub struct Cli {
    /// Signal-type catalog (.json or .toml). Defaults to signal_types.json
    /// when present, otherwise the built-in presets.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
    /// Generator settings file
    #[arg(long, global = true, default_value = "siglab_settings.json")]
    pub settings: PathBuf,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the signal types in the catalog
    Types {
        #[arg(long, alias = "jq")]
        json: bool,
    },
    /// Generate a signal from a catalog type
    Generate {
        signal_type: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, ParamValue)>,
        #[arg(long)]
        duration: Option<f64>,
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Evaluate an equation and report failures instead of zero-filling
    Eval {
        equation: String,
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, ParamValue)>,
        #[arg(long)]
        duration: Option<f64>,
        #[arg(long)]
        rate: Option<f64>,
    },
    /// List the names equations can reach under `numpy.`
    Functions,
    /// Manage the generator settings file
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print the current duration, sampling rate and sample count
    Show,
    /// Apply a JSON object such as '{"duration": 1.5}'
    Set {
        json: String,
    },
    /// Overwrite the settings file with the defaults
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

fn parse_assignment(raw: &str) -> Result<(String, ParamValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }
    let value = value.parse::<ParamValue>().unwrap_or_else(|never| match never {});
    Ok((key.to_string(), value))
}
