use std::fs;
use std::path::{Path, PathBuf};

use sleep_predictor::data::encoder::{LabelEncoder, LabelEncoders};
use sleep_predictor::data::preprocessing::{encode_inputs, FieldValue};
use sleep_predictor::data::schema::FeatureSchema;
use sleep_predictor::model::forest::{RandomForest, TreeNode};
use sleep_predictor::prediction::{submit, NORMAL_LABEL};
use sleep_predictor::report::ReportLayout;
use sleep_predictor::utils::input::LineConsole;
use sleep_predictor::{App, ArtifactPaths, Artifacts, ModelArtifact, Session, StaticCredentials};

/// Age <= 40 and short sleep -> Insomnia, Age <= 40 otherwise -> None,
/// older -> Sleep Apnea.
fn artifacts() -> Artifacts {
    let mut encoders = LabelEncoders::new();
    encoders.insert("Gender".into(), LabelEncoder::fit(["Male", "Female"]));
    encoders.insert(
        "Sleep Disorder".into(),
        LabelEncoder::fit(["None", "Insomnia", "Sleep Apnea"]),
    );

    let tree = TreeNode::split(
        1,
        40.0,
        TreeNode::split(2, 7.0, TreeNode::leaf(0), TreeNode::leaf(1)),
        TreeNode::leaf(2),
    );
    let model = ModelArtifact::RandomForest(RandomForest::new(3, 3, vec![tree]).unwrap());

    Artifacts::new(
        model,
        encoders,
        FeatureSchema::new(["Gender", "Age", "Sleep Duration", "Sleep Disorder"]),
    )
    .unwrap()
}

/// Text operands are written either literally or as hex strings.
fn pdf_shows(pdf: &[u8], text: &str) -> bool {
    let hex: String = text.bytes().map(|b| format!("{b:02X}")).collect();
    [text.to_string(), hex.clone(), hex.to_lowercase()]
        .iter()
        .any(|needle| pdf.windows(needle.len()).any(|w| w == needle.as_bytes()))
}

fn inputs(gender: &str, age: i64, sleep: f64) -> Vec<FieldValue> {
    vec![
        FieldValue::Choice(gender.into()),
        FieldValue::Integer(age),
        FieldValue::Decimal(sleep),
    ]
}

fn files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    files
}

#[test]
fn vector_follows_schema_order() {
    let artifacts = artifacts();
    let fields = artifacts.schema.fields(&artifacts.encoders);
    let row = encode_inputs(&fields, &inputs("Male", 30, 6.5), &artifacts.encoders).unwrap();
    assert_eq!(row.as_slice(), &[1.0, 30.0, 6.5]);
}

#[test]
fn every_choice_encodes_within_range() {
    let artifacts = artifacts();
    for (name, encoder) in &artifacts.encoders {
        for class in encoder.classes() {
            let code = encoder.transform(class).unwrap();
            assert!(code < encoder.len(), "{name}: {class} -> {code}");
        }
    }
}

#[test]
fn advice_labels_write_a_report() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = artifacts();

    for (age, expected) in [(30, "Insomnia"), (55, "Sleep Apnea")] {
        let outcome = submit(&artifacts, "Siti", &inputs("Male", age, 6.5), dir.path()).unwrap();
        assert_eq!(outcome.label, expected);

        let advice = outcome.advice.as_deref().unwrap();
        let report = outcome.report.as_ref().unwrap();
        let bytes = fs::read(&report.path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(report.link.href.len() > bytes.len());

        assert!(pdf_shows(&bytes, "Name: Siti"));
        assert!(pdf_shows(&bytes, &format!("Result: {expected}")));
        assert!(!pdf_shows(&bytes, "Name: Budi"));

        let layout = ReportLayout::build("Siti", &outcome.label, advice);
        let lines: Vec<_> = layout.lines().map(|l| l.text.clone()).collect();
        assert!(lines.contains(&format!("Result: {expected}")));
    }

    assert_eq!(files_in(dir.path()).len(), 2);
}

#[test]
fn other_labels_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = artifacts();

    let outcome = submit(&artifacts, "Siti", &inputs("Female", 30, 8.0), dir.path()).unwrap();
    assert_eq!(outcome.label, NORMAL_LABEL);
    assert!(outcome.advice.is_none());
    assert!(outcome.report.is_none());
    assert!(files_in(dir.path()).is_empty());
}

#[test]
fn probabilities_are_labelled() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = submit(&artifacts(), "Siti", &inputs("Female", 30, 8.0), dir.path()).unwrap();
    let labels: Vec<_> = outcome.probabilities.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, vec!["Insomnia", NORMAL_LABEL, "Sleep Apnea"]);
    assert_eq!(outcome.probabilities[1].1, 1.0);
}

#[test]
fn end_to_end_through_the_shell() {
    let artifact_dir = tempfile::tempdir().unwrap();
    let report_dir = tempfile::tempdir().unwrap();

    let paths = ArtifactPaths {
        model: artifact_dir.path().join("ensemble_model.json"),
        encoders: artifact_dir.path().join("label_encoders.bin"),
        features: artifact_dir.path().join("features.json"),
    };
    artifacts().save(&paths).unwrap();
    let loaded = Artifacts::load(&paths).unwrap();

    let app = App::new(loaded, StaticCredentials::default(), report_dir.path());
    let script = [
        "admin", "bad", // rejected
        "admin", "1234", // accepted
        "2", "Siti", "Male", "30", "6.5", "", // prediction
        "4", // logout
    ]
    .join("\n")
        + "\n";
    let mut console = LineConsole::new(script.as_bytes(), Vec::new());
    let session = app.run(&mut console).unwrap();
    let out = String::from_utf8(console.into_writer()).unwrap();

    assert_eq!(session, Session::LoggedOut);
    assert!(out.contains("Login failed!"));
    assert!(out.contains("Sleep disorder prediction for Siti: Insomnia"));
    assert!(out.contains("Advice for Siti (Insomnia)"));
    assert!(out.contains("Logged out."));

    let files = files_in(report_dir.path());
    let pdf = files
        .iter()
        .find(|p| p.extension().is_some_and(|e| e == "pdf"))
        .unwrap();
    let html = fs::read_to_string(pdf.with_extension("html")).unwrap();
    assert!(html.contains("data:application/octet-stream;base64,"));
    assert!(html.contains("Download PDF Result"));
    assert_eq!(files.len(), 2);
}

#[test]
fn cancelled_submission_writes_nothing() {
    let report_dir = tempfile::tempdir().unwrap();
    let app = App::new(artifacts(), StaticCredentials::default(), report_dir.path());
    let script = "admin\n1234\n2\nSiti\n1\n30\n6.5\ncancel\n";
    let mut console = LineConsole::new(script.as_bytes(), Vec::new());
    let session = app.run(&mut console).unwrap();

    assert!(session.is_logged_in());
    assert!(files_in(report_dir.path()).is_empty());
}
