//! Named, versioned feature schemas.
//!
//! A schema is the ordered list of typed fields a model was trained on. The
//! position of a field in [`FeatureSchema::fields`] is its column in the
//! feature vector, and the position of a label in a [`CodeTable`] is the code
//! the model sees for it.

use crate::utils::error::{Result, RiskError};
use crate::utils::validation::validate_range;
use std::fmt;

/// Bidirectional label <-> code mapping for one categorical field.
#[derive(Debug, PartialEq, Eq)]
pub struct CodeTable {
    labels: &'static [&'static str],
}

impl CodeTable {
    pub const fn new(labels: &'static [&'static str]) -> Self {
        Self { labels }
    }

    /// Exact label match first, then a case-insensitive one.
    pub fn code_of(&self, label: &str) -> Option<u32> {
        let label = label.trim();
        self.labels
            .iter()
            .position(|l| *l == label)
            .or_else(|| self.labels.iter().position(|l| l.eq_ignore_ascii_case(label)))
            .map(|i| i as u32)
    }

    pub fn label_of(&self, code: u32) -> Option<&'static str> {
        self.labels.get(code as usize).copied()
    }

    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer { min: i64, max: i64 },
    Categorical(&'static CodeTable),
}

#[derive(Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Machine name, used as CLI key and CSV header.
    pub name: &'static str,
    /// Human readable prompt.
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Encode a raw user value into the number fed to the model.
    ///
    /// Categorical fields accept either a label from the code table or the
    /// integer code itself. Anything outside the domain is rejected here so
    /// it never reaches the model.
    pub fn encode(&self, raw: &str) -> Result<f64> {
        let raw = raw.trim();
        match self.kind {
            FieldKind::Integer { min, max } => {
                let value: i64 = raw.parse().map_err(|_| RiskError::FieldValidationError {
                    field: self.name.to_string(),
                    value: raw.to_string(),
                    reason: "Value must be a whole number".to_string(),
                })?;
                validate_range(self.name, value, min, max)?;
                Ok(value as f64)
            }
            FieldKind::Categorical(table) => {
                if let Some(code) = table.code_of(raw) {
                    return Ok(code as f64);
                }
                match raw.parse::<u32>() {
                    Ok(code) if table.label_of(code).is_some() => Ok(code as f64),
                    _ => Err(RiskError::FieldValidationError {
                        field: self.name.to_string(),
                        value: raw.to_string(),
                        reason: format!("Expected one of: {}", table.labels().join(", ")),
                    }),
                }
            }
        }
    }

    /// Inverse of [`encode`](Self::encode) for display purposes.
    pub fn decode(&self, value: f64) -> Option<String> {
        if value.fract() != 0.0 {
            return None;
        }
        match self.kind {
            FieldKind::Integer { min, max } => {
                let v = value as i64;
                (min..=max).contains(&v).then(|| v.to_string())
            }
            FieldKind::Categorical(table) => {
                if value < 0.0 {
                    return None;
                }
                table.label_of(value as u32).map(str::to_string)
            }
        }
    }

    pub fn describe_domain(&self) -> String {
        match self.kind {
            FieldKind::Integer { min, max } => format!("integer {}..={}", min, max),
            FieldKind::Categorical(table) => table
                .labels()
                .iter()
                .enumerate()
                .map(|(code, label)| format!("{}={}", label, code))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct FeatureSchema {
    pub id: &'static str,
    pub version: u32,
    pub fields: &'static [FieldDescriptor],
}

impl FeatureSchema {
    pub fn by_id(id: &str) -> Result<&'static FeatureSchema> {
        ALL_SCHEMAS
            .iter()
            .copied()
            .find(|s| s.id == id)
            .ok_or_else(|| RiskError::UnknownSchemaError {
                schema: id.to_string(),
            })
    }

    pub fn all() -> &'static [&'static FeatureSchema] {
        ALL_SCHEMAS
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for FeatureSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (v{})", self.id, self.version)?;
        for (i, field) in self.fields.iter().enumerate() {
            writeln!(
                f,
                "  [{}] {:<12} {:<24} {}",
                i,
                field.name,
                field.label,
                field.describe_domain()
            )?;
        }
        Ok(())
    }
}

pub const DEFAULT_SCHEMA_ID: &str = "staging-v2";

const AGE: FieldDescriptor = FieldDescriptor {
    name: "age",
    label: "Age",
    kind: FieldKind::Integer { min: 0, max: 120 },
};

static YES_NO: CodeTable = CodeTable::new(&["No", "Yes"]);
static T_STAGE: CodeTable = CodeTable::new(&["T1a", "T1b", "T2", "T3a", "T3b", "T4a", "T4b"]);

// smoking-v1 用的是原始表單的編碼順序，和 staging-v2 不同
static N_STAGE_V1: CodeTable = CodeTable::new(&["N0", "N1b", "N1a"]);
static STAGE_V1: CodeTable = CodeTable::new(&["I", "II", "III", "IVB", "IVA"]);

static N_STAGE_V2: CodeTable = CodeTable::new(&["N0", "N1a", "N1b"]);
static STAGE_V2: CodeTable = CodeTable::new(&["I", "II", "III", "IVA", "IVB"]);
static ADENOPATHY: CodeTable = CodeTable::new(&[
    "No",
    "Right",
    "Left",
    "Bilateral",
    "Extensive",
    "Posterior",
]);
static RESPONSE: CodeTable = CodeTable::new(&[
    "Excellent",
    "Indeterminate",
    "Structural Incomplete",
    "Biochemical Incomplete",
]);

pub static SMOKING_V1: FeatureSchema = FeatureSchema {
    id: "smoking-v1",
    version: 1,
    fields: &[
        AGE,
        FieldDescriptor {
            name: "smoking",
            label: "Smoking",
            kind: FieldKind::Categorical(&YES_NO),
        },
        FieldDescriptor {
            name: "n_stage",
            label: "N (Node involvement)",
            kind: FieldKind::Categorical(&N_STAGE_V1),
        },
        FieldDescriptor {
            name: "t_stage",
            label: "T (Tumor size/stage)",
            kind: FieldKind::Categorical(&T_STAGE),
        },
        FieldDescriptor {
            name: "stage",
            label: "Stage",
            kind: FieldKind::Categorical(&STAGE_V1),
        },
        FieldDescriptor {
            name: "hx_smoking",
            label: "Hx Smoking",
            kind: FieldKind::Categorical(&YES_NO),
        },
    ],
};

pub static STAGING_V2: FeatureSchema = FeatureSchema {
    id: "staging-v2",
    version: 2,
    fields: &[
        AGE,
        FieldDescriptor {
            name: "stage",
            label: "Stage",
            kind: FieldKind::Categorical(&STAGE_V2),
        },
        FieldDescriptor {
            name: "t_stage",
            label: "T (Tumor size/stage)",
            kind: FieldKind::Categorical(&T_STAGE),
        },
        FieldDescriptor {
            name: "n_stage",
            label: "N (Node involvement)",
            kind: FieldKind::Categorical(&N_STAGE_V2),
        },
        FieldDescriptor {
            name: "adenopathy",
            label: "Adenopathy",
            kind: FieldKind::Categorical(&ADENOPATHY),
        },
        FieldDescriptor {
            name: "response",
            label: "Treatment response",
            kind: FieldKind::Categorical(&RESPONSE),
        },
    ],
};

static ALL_SCHEMAS: &[&FeatureSchema] = &[&SMOKING_V1, &STAGING_V2];
