use catalog::{GeneratorSettings, SignalCatalog};
use siglab_core::TimeSeries;

pub fn print_info(message: &str) {
    println!("[siglab][INFO] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[siglab][ERROR]: {message}");
}

pub fn print_signal_types(catalog: &SignalCatalog) {
    if catalog.is_empty() {
        print_info("No signal types found");
        return;
    }
    print_info("Signal types:");
    for template in catalog {
        println!("{}: {}", template.name, template.equation);
        for param in &template.params {
            println!("\t{} ({}) = {}", param.key, param.label, param.default);
        }
    }
}

pub fn print_numeric_members<'a>(module: &str, members: impl IntoIterator<Item = &'a str>) {
    print_info(&format!("Members of '{module}':"));
    for name in members {
        println!("{module}.{name}");
    }
}

pub fn print_generator_settings(settings: &GeneratorSettings) {
    print_info("Generator settings:");
    println!("duration: {}", settings.duration);
    println!("sampling_rate: {}", settings.sampling_rate);
    println!("samples: {}", settings.sample_count());
}

pub fn print_series_summary(series: &TimeSeries) {
    let min = series.y.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    print_info(&format!("{} samples", series.len()));
    println!("min: {min}");
    println!("max: {max}");
}
