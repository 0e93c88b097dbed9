//! Form variants and raw input records
//!
//! Each variant is one of the near-duplicate single-page forms: a fixed,
//! ordered set of typed fields plus display text for the page. A submitted
//! form arrives as an [`InputRecord`], a field-name to value mapping; fields
//! the user left out are defaulted downstream, never rejected.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a form field is treated by the feature pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Numeric,
    Categorical,
}

/// A single typed form field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn numeric(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Numeric,
        }
    }

    pub fn categorical(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Categorical,
        }
    }
}

/// One raw user-supplied value: a number or a category string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value. Text that parses as a number is accepted,
    /// anything else is treated as absent.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Categorical view of the value
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Number(v) => v.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

/// A submitted form: field name to raw value
pub type InputRecord = HashMap<String, FieldValue>;

/// A form variant: ordered field set plus display text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSchema {
    pub variant: String,
    pub title: String,
    pub description: String,
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// Ride-fare variant: four geographic coordinates, classified into
    /// "tinggi" (high) or "rendah" (low) fare.
    pub fn ride_fare() -> Self {
        Self {
            variant: "ride-fare".to_string(),
            title: "Prediksi Tarif".to_string(),
            description: "Classifies a ride as a high (tinggi) or low (rendah) fare \
                          from its pickup and dropoff coordinates."
                .to_string(),
            fields: vec![
                FieldSpec::numeric("pickup_longitude"),
                FieldSpec::numeric("pickup_latitude"),
                FieldSpec::numeric("dropoff_longitude"),
                FieldSpec::numeric("dropoff_latitude"),
            ],
        }
    }

    /// Delivery-feedback variant: demographic and delivery attributes,
    /// classified into "Yes" or "No".
    pub fn delivery_feedback() -> Self {
        Self {
            variant: "delivery-feedback".to_string(),
            title: "Delivery Feedback".to_string(),
            description: "Predicts whether a customer order results in positive \
                          feedback from demographic and delivery attributes."
                .to_string(),
            fields: vec![
                FieldSpec::numeric("Age"),
                FieldSpec::categorical("Gender"),
                FieldSpec::categorical("Marital Status"),
                FieldSpec::categorical("Occupation"),
                FieldSpec::categorical("Monthly Income"),
                FieldSpec::categorical("Educational Qualifications"),
                FieldSpec::numeric("Family size"),
                FieldSpec::numeric("latitude"),
                FieldSpec::numeric("longitude"),
                FieldSpec::numeric("Pin code"),
            ],
        }
    }

    /// Look up a built-in variant by name
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "ride-fare" => Some(Self::ride_fare()),
            "delivery-feedback" => Some(Self::delivery_feedback()),
            _ => None,
        }
    }

    /// Names of all built-in variants
    pub fn variants() -> &'static [&'static str] {
        &["ride-fare", "delivery-feedback"]
    }

    /// Field names in form order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
