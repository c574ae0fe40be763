use catalog::{GeneratorSettings, ParameterSet, SignalCatalog};
use expression::EvalLimits;
use siglab_core::export::{write_csv, write_json};
use siglab_core::{generate_signal_data, time_grid, GenerateError, SignalGenerator, TimeSeries};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn series_length_matches_rate_times_duration() {
    for (duration, rate) in [(2.0, 4000.0), (1.0, 1000.0), (0.5, 3.0), (0.001, 1000.0)] {
        let series = generate_signal_data(&ParameterSet::new(), "numpy.sin(time)", duration, rate);
        let expected = (duration * rate).floor() as usize;
        assert_eq!(series.t.len(), expected, "{duration} x {rate}");
        assert_eq!(series.y.len(), expected, "{duration} x {rate}");
    }
}

#[test]
fn time_grid_is_half_open() {
    let t = time_grid(1.0, 4.0, 16).unwrap();
    assert_eq!(t, vec![0.0, 0.25, 0.5, 0.75]);
    assert!(time_grid(0.0, 100.0, 16).unwrap().is_empty());
    assert!(time_grid(1.0, f64::NAN, 16).unwrap().is_empty());
}

#[test]
fn time_grid_refuses_more_points_than_the_limit() {
    assert_eq!(
        time_grid(1.0, 100.0, 10),
        Err(GenerateError::GridTooLarge {
            samples: 100,
            limit: 10,
        })
    );
    assert_eq!(time_grid(1.0, 10.0, 10).unwrap().len(), 10);
}

#[test]
fn huge_grid_yields_an_empty_series() {
    let series = generate_signal_data(&ParameterSet::new(), "0", 1e10, 1e10);
    assert!(series.is_empty());
    assert!(series.y.is_empty());

    let generator = SignalGenerator::new(GeneratorSettings {
        duration: 1e10,
        sampling_rate: 1e10,
    });
    assert!(matches!(
        generator.try_generate(&ParameterSet::new(), "time"),
        Err(GenerateError::GridTooLarge { limit, .. }) if limit == EvalLimits::default().max_array_len
    ));
}

#[test]
fn generation_is_deterministic() {
    let params = ParameterSet::new().with("frequency", 3.0).with("phase", 45.0);
    let equation = "numpy.sin(2 * numpy.pi * frequency * time + phase_rad) * numpy.exp(-time)";
    let first = generate_signal_data(&params, equation, 2.0, 4000.0);
    let second = generate_signal_data(&params, equation, 2.0, 4000.0);
    assert_eq!(first, second);
}

#[test]
fn undefined_identifier_zero_fills() {
    let series = generate_signal_data(&ParameterSet::new(), "undefined_var * 2", 2.0, 4000.0);
    assert_eq!(series.len(), 8000);
    assert_eq!(series.y.len(), series.t.len());
    assert!(series.y.iter().all(|&y| y == 0.0));
}

#[test]
fn malformed_equation_zero_fills() {
    for equation in ["sin(", "import os", "numpy.__class__", "", "time +* 2"] {
        let series = generate_signal_data(&ParameterSet::new(), equation, 1.0, 10.0);
        assert_eq!(series.y, vec![0.0; 10], "{equation}");
    }
}

#[test]
fn scalar_result_is_broadcast() {
    let series = generate_signal_data(&ParameterSet::new(), "5", 2.0, 4000.0);
    assert_eq!(series.y.len(), 8000);
    assert!(series.y.iter().all(|&y| y == 5.0));
}

#[test]
fn phase_is_converted_to_radians() {
    let params = ParameterSet::new().with("phase", 180.0);
    let series = generate_signal_data(&params, "numpy.cos(phase_rad)", 2.0, 4000.0);
    assert_eq!(series.len(), 8000);
    for &y in &series.y {
        assert_close(y, -1.0);
    }
}

#[test]
fn text_phase_does_not_define_phase_rad() {
    let params = ParameterSet::new().with("phase", "quarter");
    let generator = SignalGenerator::new(GeneratorSettings {
        duration: 1.0,
        sampling_rate: 4.0,
    });
    assert!(matches!(
        generator.try_generate(&params, "phase_rad"),
        Err(GenerateError::Evaluation(_))
    ));
}

#[test]
fn concrete_five_hertz_sine() {
    let series = generate_signal_data(
        &ParameterSet::new(),
        "numpy.sin(2*numpy.pi*5*time)",
        1.0,
        1000.0,
    );
    assert_eq!(series.len(), 1000);
    assert_eq!(series.t[0], 0.0);
    assert_close(series.t[999], 0.999);
    assert_close(series.y[0], 0.0);
    assert_close(series.y[50], 0.0);
    assert_close(series.y[25], 1.0);
}

#[test]
fn parameters_shadow_reserved_names() {
    let params = ParameterSet::new().with("time", 3.0);
    let series = generate_signal_data(&params, "time * 2", 1.0, 4.0);
    assert_eq!(series.y, vec![6.0; 4]);
    assert_eq!(series.t, vec![0.0, 0.25, 0.5, 0.75]);
}

#[test]
fn strict_generation_reports_typed_failures() {
    let generator = SignalGenerator::new(GeneratorSettings {
        duration: 1.0,
        sampling_rate: 4.0,
    });
    let params = ParameterSet::new().with("name", "ramp");

    assert!(matches!(
        generator.try_generate(&params, "missing + 1"),
        Err(GenerateError::Evaluation(_))
    ));
    assert_eq!(
        generator.try_generate(&params, "name").unwrap_err(),
        GenerateError::Type("str")
    );
    assert_eq!(
        generator.try_generate(&params, "numpy").unwrap_err(),
        GenerateError::Type("module")
    );
    assert_eq!(
        generator
            .try_generate(&params, "numpy.linspace(0, 1, 3)")
            .unwrap_err(),
        GenerateError::Shape {
            actual: 3,
            expected: 4,
        }
    );
    assert_eq!(generator.generate(&params, "name").y, vec![0.0; 4]);
}

#[test]
fn evaluation_limits_zero_fill_oversized_work() {
    let limits = EvalLimits {
        max_array_len: 100,
        ..EvalLimits::default()
    };
    let generator = SignalGenerator::with_limits(
        GeneratorSettings {
            duration: 1.0,
            sampling_rate: 10.0,
        },
        limits,
    );
    let series = generator.generate(&ParameterSet::new(), "numpy.sum(numpy.ones(1000000)) + time");
    assert_eq!(series.y, vec![0.0; 10]);
}

#[test]
fn builtin_templates_evaluate_cleanly() {
    let catalog = SignalCatalog::builtin();
    let generator = SignalGenerator::new(GeneratorSettings {
        duration: 0.5,
        sampling_rate: 200.0,
    });
    for name in catalog.names() {
        let form = catalog.form(name, name, &ParameterSet::new());
        let series = generator
            .try_generate(&form.params, &form.equation)
            .unwrap_or_else(|err| panic!("{name}: {err}"));
        assert_eq!(series.len(), 100);
        assert!(series.y.iter().all(|y| y.is_finite()), "{name}");
        assert!(series.y.iter().any(|&y| y != 0.0), "{name}");
    }
}

#[test]
fn csv_export_has_header_and_rows() {
    let series = TimeSeries {
        t: vec![0.0, 0.5],
        y: vec![1.0, -2.5],
    };
    let mut out = Vec::new();
    write_csv(&series, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "t,y\n0,1\n0.5,-2.5\n");
}

#[test]
fn json_export_round_trips() {
    let series = generate_signal_data(&ParameterSet::new(), "time", 1.0, 4.0);
    let mut out = Vec::new();
    write_json(&series, &mut out).unwrap();
    let back: TimeSeries = serde_json::from_slice(&out).unwrap();
    assert_eq!(back, series);
}

#[test]
fn json_export_keeps_non_finite_samples() {
    let series = generate_signal_data(&ParameterSet::new(), "numpy.log(time)", 1.0, 4.0);
    assert_eq!(series.y[0], f64::NEG_INFINITY);

    let mut out = Vec::new();
    write_json(&series, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\"-Infinity\""), "{text}");

    let back: TimeSeries = serde_json::from_str(&text).unwrap();
    assert_eq!(back, series);
}

#[test]
fn json_samples_accept_nan_and_infinity_strings() {
    let back: TimeSeries =
        serde_json::from_str(r#"{"t":[0.0,0.5,1.0],"y":["NaN","Infinity",2.5]}"#).unwrap();
    assert_eq!(back.t, vec![0.0, 0.5, 1.0]);
    assert!(back.y[0].is_nan());
    assert_eq!(back.y[1], f64::INFINITY);
    assert_eq!(back.y[2], 2.5);

    assert!(serde_json::from_str::<TimeSeries>(r#"{"t":[0.0],"y":["inf"]}"#).is_err());
}
