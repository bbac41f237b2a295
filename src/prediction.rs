use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::advice::advice_for;
use crate::data::encoder::LabelEncoders;
use crate::data::preprocessing::{encode_inputs, FieldValue};
use crate::data::schema::{FieldKind, FieldSpec, TARGET_COLUMN};
use crate::error::Result;
use crate::model::Classifier;
use crate::report::{download_link, generate_report, DownloadLink, DEFAULT_LINK_LABEL};
use crate::utils::input::{prompt_choice, prompt_decimal, prompt_integer, Console};
use crate::utils::io::Artifacts;

/// Display text for the target encoder's "None" class.
pub const NORMAL_LABEL: &str = "Normal";

/// Report written for an advice-eligible prediction.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub path: PathBuf,
    pub link: DownloadLink,
}

/// Everything the prediction view shows after a submission.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub name: String,
    pub code: usize,
    pub label: String,
    /// (label, probability) per class code.
    pub probabilities: Vec<(String, f64)>,
    pub advice: Option<String>,
    pub report: Option<ReportOutput>,
}

/// Maps a class code to its display label, rewriting "None" to "Normal".
pub fn decode_label(encoders: &LabelEncoders, code: usize) -> Result<String> {
    let label = match encoders.get(TARGET_COLUMN) {
        Some(encoder) => encoder.inverse_transform(code)?.to_string(),
        None => code.to_string(),
    };
    Ok(if label == "None" {
        NORMAL_LABEL.to_string()
    } else {
        label
    })
}

/// Encodes the form, predicts, decodes, and writes a report when the label
/// has advice.
pub fn submit(
    artifacts: &Artifacts,
    name: &str,
    values: &[FieldValue],
    report_dir: &Path,
) -> Result<Outcome> {
    let fields = artifacts.schema.fields(&artifacts.encoders);
    let row = encode_inputs(&fields, values, &artifacts.encoders)?;
    debug!(row = ?row.as_slice(), "feature vector assembled");

    let prediction = artifacts.model.predict(&row)?;
    let label = decode_label(&artifacts.encoders, prediction.class)?;
    info!(code = prediction.class, label = %label, "prediction made");

    let probabilities = prediction
        .probabilities
        .iter()
        .enumerate()
        .map(|(code, &p)| {
            let class = decode_label(&artifacts.encoders, code).unwrap_or_else(|_| code.to_string());
            (class, p)
        })
        .collect();

    let advice = advice_for(&label, name);
    let report = match &advice {
        Some(text) => {
            let path = generate_report(report_dir, name, &label, text)?;
            let link = download_link(&path, DEFAULT_LINK_LABEL)?;
            Some(ReportOutput { path, link })
        }
        None => None,
    };

    Ok(Outcome {
        name: name.to_string(),
        code: prediction.class,
        label,
        probabilities,
        advice,
        report,
    })
}

/// Collects one value per field; `None` when the input closes mid-form.
pub fn collect_inputs<C: Console + ?Sized>(
    console: &mut C,
    fields: &[FieldSpec],
) -> io::Result<Option<Vec<FieldValue>>> {
    let mut values = Vec::with_capacity(fields.len());
    for field in fields {
        let value = match &field.kind {
            FieldKind::Choice(choices) => {
                prompt_choice(console, &field.label, choices)?.map(FieldValue::Choice)
            }
            FieldKind::Integer { min } => {
                prompt_integer(console, &field.label, *min)?.map(FieldValue::Integer)
            }
            FieldKind::Decimal { min, step } => {
                prompt_decimal(console, &field.label, *min, *step)?.map(FieldValue::Decimal)
            }
        };
        match value {
            Some(v) => values.push(v),
            None => return Ok(None),
        }
    }
    Ok(Some(values))
}

/// Prediction page: form, submission, result, advice and download link.
///
/// Returns `Ok(false)` when the input closed before the form was submitted.
pub fn run_prediction_view<C: Console + ?Sized>(
    console: &mut C,
    artifacts: &Artifacts,
    report_dir: &Path,
) -> anyhow::Result<bool> {
    console.print("== User Input ==")?;
    let Some(name) = console.read_line("Full name: ")? else {
        return Ok(false);
    };
    let name = name.trim();

    let fields = artifacts.schema.fields(&artifacts.encoders);
    let Some(values) = collect_inputs(console, &fields)? else {
        return Ok(false);
    };

    let Some(answer) = console.read_line("Press Enter to predict (or type 'cancel'): ")? else {
        return Ok(false);
    };
    if answer.trim().eq_ignore_ascii_case("cancel") {
        return Ok(true);
    }

    let outcome = match submit(artifacts, name, &values, report_dir) {
        Ok(outcome) => outcome,
        Err(e) => {
            console.print(&format!("Prediction failed: {}", e))?;
            return Ok(true);
        }
    };
    render_outcome(console, &outcome)?;
    Ok(true)
}

fn render_outcome<C: Console + ?Sized>(console: &mut C, outcome: &Outcome) -> anyhow::Result<()> {
    console.print(&format!(
        "Sleep disorder prediction for {}: {}",
        outcome.name, outcome.label
    ))?;
    for (class, p) in &outcome.probabilities {
        console.print(&format!("- {}: {:.2}%", class, p * 100.0))?;
    }

    if let Some(advice) = &outcome.advice {
        console.print("")?;
        console.print(advice)?;
    }

    if let Some(report) = &outcome.report {
        let page = report.path.with_extension("html");
        report.link.write_page(&page)?;
        console.print("")?;
        console.print(&format!("Report: {}", report.path.display()))?;
        console.print(&format!(
            "{}: open {} in a browser",
            report.link.label,
            page.display()
        ))?;
    }
    Ok(())
}
