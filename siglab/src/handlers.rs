use crate::commands::*;
use crate::output::*;
use catalog::{GeneratorSettings, ParamValue, ParameterSet, SignalCatalog};
use expression::NumericModule;
use siglab_core::export::{write_csv, write_json};
use siglab_core::settings::{
    apply_generator_settings_json, load_generator_settings_or_default,
    normalize_generator_settings, save_generator_settings_file,
};
use siglab_core::{SignalFactory, SignalGenerator, TimeSeries, NUMERIC_MODULE_IDENT};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const DEFAULT_CATALOG_FILE: &str = "signal_types.json";

pub fn handle_command(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Types { json } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                print_signal_types(&catalog);
            }
        }
        Commands::Generate {
            signal_type,
            name,
            set,
            duration,
            rate,
            format,
            output,
        } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let settings = resolve_settings(&cli.settings, duration, rate)?;
            if catalog.find(&signal_type).is_none() {
                log::warn!("unknown signal type '{signal_type}', generating a flat signal");
            }
            let display_name = name.as_deref().unwrap_or(&signal_type);
            let form = catalog.form(&signal_type, display_name, &overrides(set));

            let mut factory = SignalFactory::new(SignalGenerator::new(settings), Default::default());
            let signal = factory.create(form.params, form.equation);

            let series = signal.series();
            match output {
                Some(path) => {
                    let file = File::create(&path).map_err(|e| {
                        format!("Failed to create output file '{}': {e}", path.display())
                    })?;
                    write_series(&series, format, BufWriter::new(file))?;
                    print_info(&format!(
                        "Wrote {} samples of '{}' ({}) to {}",
                        series.len(),
                        signal.name(),
                        signal.color().to_hex(),
                        path.display()
                    ));
                }
                None => write_series(&series, format, io::stdout().lock())?,
            }
        }
        Commands::Eval {
            equation,
            set,
            duration,
            rate,
        } => {
            let settings = resolve_settings(&cli.settings, duration, rate)?;
            let series =
                SignalGenerator::new(settings).try_generate(&overrides(set), &equation)?;
            print_series_summary(&series);
        }
        Commands::Functions => {
            print_numeric_members(NUMERIC_MODULE_IDENT, NumericModule::members());
        }
        Commands::Settings { command } => handle_settings_command(&cli.settings, command)?,
    }
    Ok(())
}

fn handle_settings_command(
    path: &Path,
    command: SettingsCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        SettingsCommands::Show => {
            print_generator_settings(&load_generator_settings_or_default(path)?);
        }
        SettingsCommands::Set { json } => {
            let current = load_generator_settings_or_default(path)?;
            let updated = apply_generator_settings_json(&current, &json)?;
            save_generator_settings_file(path, &updated)?;
            print_info("Generator settings updated");
            print_generator_settings(&updated);
        }
        SettingsCommands::Reset => {
            save_generator_settings_file(path, &GeneratorSettings::default())?;
            print_info("Generator settings reset to defaults");
        }
    }
    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<SignalCatalog, Box<dyn std::error::Error>> {
    let catalog = match path {
        Some(path) => SignalCatalog::load_from_file(path)
            .map_err(|e| format!("Failed to load catalog '{}': {e}", path.display()))?,
        None if Path::new(DEFAULT_CATALOG_FILE).exists() => {
            SignalCatalog::load_from_file(DEFAULT_CATALOG_FILE).map_err(|e| {
                format!("Failed to load catalog '{DEFAULT_CATALOG_FILE}': {e}")
            })?
        }
        None => SignalCatalog::builtin(),
    };
    Ok(catalog)
}

fn resolve_settings(
    path: &Path,
    duration: Option<f64>,
    rate: Option<f64>,
) -> Result<GeneratorSettings, Box<dyn std::error::Error>> {
    let mut settings = load_generator_settings_or_default(path)?;
    if let Some(duration) = duration {
        settings.duration = duration;
    }
    if let Some(rate) = rate {
        settings.sampling_rate = rate;
    }
    Ok(normalize_generator_settings(settings)?)
}

fn overrides(set: Vec<(String, ParamValue)>) -> ParameterSet {
    set.into_iter().collect()
}

fn write_series<W: Write>(
    series: &TimeSeries,
    format: OutputFormat,
    mut writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Csv => write_csv(series, &mut writer)?,
        OutputFormat::Json => {
            write_json(series, &mut writer)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
