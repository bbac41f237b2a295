use std::path::PathBuf;

use sleep_predictor::config::{AppConfig, Overrides};
use sleep_predictor::data::preprocessing::FieldValue;
use sleep_predictor::data::schema::FieldKind;
use sleep_predictor::prediction::submit;
use sleep_predictor::{ArtifactPaths, Artifacts, Classifier};

fn demo_paths() -> ArtifactPaths {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos");
    ArtifactPaths {
        model: root.join("ensemble_model.json"),
        encoders: root.join("label_encoders.json"),
        features: root.join("features.json"),
    }
}

#[test]
fn demo_artifacts_load() {
    let artifacts = Artifacts::load(&demo_paths()).unwrap();
    assert_eq!(artifacts.schema.width(), 11);
    assert_eq!(artifacts.model.n_classes(), 3);

    let fields = artifacts.schema.fields(&artifacts.encoders);
    assert_eq!(fields[0].name, "Gender");
    assert!(matches!(fields[3].kind, FieldKind::Decimal { .. }));
    assert!(matches!(fields[9].kind, FieldKind::Integer { min: 0 }));
}

#[test]
fn demo_profiles_predict_expected_labels() {
    let artifacts = Artifacts::load(&demo_paths()).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let profile = |bmi: &str, sleep: f64, stress: i64, heart: i64| {
        vec![
            FieldValue::Choice("Male".into()),
            FieldValue::Integer(35),
            FieldValue::Choice("Engineer".into()),
            FieldValue::Decimal(sleep),
            FieldValue::Integer(6),
            FieldValue::Integer(5),
            FieldValue::Integer(stress),
            FieldValue::Choice(bmi.into()),
            FieldValue::Choice("120/80".into()),
            FieldValue::Integer(heart),
            FieldValue::Integer(7000),
        ]
    };

    let insomnia = submit(&artifacts, "Rani", &profile("Normal", 5.9, 8, 70), dir.path()).unwrap();
    assert_eq!(insomnia.label, "Insomnia");

    let normal = submit(&artifacts, "Rani", &profile("Normal", 7.5, 4, 68), dir.path()).unwrap();
    assert_eq!(normal.label, "Normal");

    let apnea = submit(&artifacts, "Rani", &profile("Obese", 7.0, 8, 80), dir.path()).unwrap();
    assert_eq!(apnea.label, "Sleep Apnea");
}

#[test]
fn demo_config_points_at_demo_artifacts() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/config.toml");
    let config = AppConfig::load(Some(&path), &Overrides::default()).unwrap();
    assert_eq!(
        config.artifacts.model,
        PathBuf::from("demos/ensemble_model.json")
    );
}
