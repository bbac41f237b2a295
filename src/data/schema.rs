use serde::{Deserialize, Serialize};

use super::encoder::LabelEncoders;

/// Row identifier in the training table, never an input.
pub const IDENTIFIER_COLUMN: &str = "Person ID";
/// Predicted column; decoded through its encoder, never an input.
pub const TARGET_COLUMN: &str = "Sleep Disorder";
/// The only numeric feature that accepts fractional values.
pub const SLEEP_DURATION: &str = "Sleep Duration";

const EXCLUDED_COLUMNS: [&str; 2] = [IDENTIFIER_COLUMN, TARGET_COLUMN];

/// Ordered feature names the classifier was trained on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Closed choice set taken from the feature's encoder.
    Choice(Vec<String>),
    Integer { min: i64 },
    Decimal { min: f64, step: f64 },
}

/// One input widget of the prediction form.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
}

impl FeatureSchema {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FeatureSchema {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Columns collected from the user, in schema order.
    pub fn input_columns(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(|name| !EXCLUDED_COLUMNS.contains(name))
    }

    /// Length of the feature vector the classifier expects.
    pub fn width(&self) -> usize {
        self.input_columns().count()
    }

    pub fn fields(&self, encoders: &LabelEncoders) -> Vec<FieldSpec> {
        self.input_columns()
            .map(|name| {
                let kind = match encoders.get(name) {
                    Some(encoder) => FieldKind::Choice(encoder.classes().to_vec()),
                    None if name == SLEEP_DURATION => FieldKind::Decimal {
                        min: 0.0,
                        step: 0.1,
                    },
                    None => FieldKind::Integer { min: 0 },
                };
                FieldSpec {
                    name: name.to_string(),
                    label: display_label(name).to_string(),
                    kind,
                }
            })
            .collect()
    }
}

/// Human readable widget label with the range hint shown next to the input.
pub fn display_label(feature: &str) -> &str {
    match feature {
        "Age" => "Age (up to 100)",
        "Sleep Duration" => "Sleep Duration (hours, up to 24)",
        "Quality of Sleep" => "Quality of Sleep (up to 10)",
        "Physical Activity Level" => "Physical Activity Level (up to 10)",
        "Stress Level" => "Stress Level (up to 10)",
        "Heart Rate" => "Heart Rate (40-150 bpm)",
        "Daily Steps" => "Daily Steps (up to 30000)",
        other => other,
    }
}
