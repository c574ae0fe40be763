use catalog::GeneratorSettings;
use siglab_core::settings::{
    apply_generator_settings_json, load_generator_settings_file,
    load_generator_settings_or_default, normalize_generator_settings,
    save_generator_settings_file, SettingsError,
};

#[test]
fn save_and_load_settings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("siglab_settings.json");
    let settings = GeneratorSettings {
        duration: 0.5,
        sampling_rate: 44_100.0,
    };

    save_generator_settings_file(&path, &settings).expect("save settings");
    let loaded = load_generator_settings_file(&path).expect("load settings");
    assert_eq!(loaded, settings);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.json");
    assert!(matches!(
        load_generator_settings_file(&path),
        Err(SettingsError::Read { .. })
    ));
    assert_eq!(
        load_generator_settings_or_default(&path).expect("defaults"),
        GeneratorSettings::default()
    );
}

#[test]
fn partial_file_keeps_defaults_for_missing_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("siglab_settings.json");
    std::fs::write(&path, r#"{"sampling_rate": 100}"#).expect("write");
    let loaded = load_generator_settings_file(&path).expect("load settings");
    assert_eq!(loaded.duration, 2.0);
    assert_eq!(loaded.sampling_rate, 100.0);
}

#[test]
fn normalization_rejects_unusable_settings() {
    let cases = [
        (0.0, 100.0),
        (-1.0, 100.0),
        (1.0, f64::INFINITY),
        (f64::NAN, 100.0),
    ];
    for (duration, sampling_rate) in cases {
        assert!(matches!(
            normalize_generator_settings(GeneratorSettings {
                duration,
                sampling_rate,
            }),
            Err(SettingsError::OutOfRange { .. })
        ));
    }
    assert!(matches!(
        normalize_generator_settings(GeneratorSettings {
            duration: 0.1,
            sampling_rate: 5.0,
        }),
        Err(SettingsError::NoSamples { .. })
    ));
}

#[test]
fn normalization_rejects_grids_beyond_the_array_limit() {
    let limit = expression::EvalLimits::default().max_array_len;
    assert!(matches!(
        normalize_generator_settings(GeneratorSettings {
            duration: 1e10,
            sampling_rate: 1e10,
        }),
        Err(SettingsError::TooManySamples { limit: l, .. }) if l == limit
    ));
    assert!(normalize_generator_settings(GeneratorSettings {
        duration: 1.0,
        sampling_rate: limit as f64,
    })
    .is_ok());
    assert!(matches!(
        apply_generator_settings_json(&GeneratorSettings::default(), r#"{"sampling_rate": 1e12}"#),
        Err(SettingsError::TooManySamples { .. })
    ));
}

#[test]
fn json_patch_updates_named_fields() {
    let base = GeneratorSettings::default();
    let updated = apply_generator_settings_json(&base, r#"{"duration": 1.5}"#).expect("patch");
    assert_eq!(updated.duration, 1.5);
    assert_eq!(updated.sampling_rate, base.sampling_rate);

    assert!(matches!(
        apply_generator_settings_json(&base, "[1]"),
        Err(SettingsError::NotAnObject)
    ));
    assert!(matches!(
        apply_generator_settings_json(&base, r#"{"rate": 10}"#),
        Err(SettingsError::UnknownKey(key)) if key == "rate"
    ));
    assert!(matches!(
        apply_generator_settings_json(&base, r#"{"duration": "long"}"#),
        Err(SettingsError::NotANumber("duration"))
    ));
    assert!(matches!(
        apply_generator_settings_json(&base, r#"{"sampling_rate": -4}"#),
        Err(SettingsError::OutOfRange { .. })
    ));
    assert!(matches!(
        apply_generator_settings_json(&base, "{"),
        Err(SettingsError::Json(_))
    ));
}
