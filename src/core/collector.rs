use crate::domain::model::{FeatureVector, FieldValue};
use crate::domain::schema::{FeatureSchema, FieldKind};
use crate::utils::error::{Result, RiskError};
use crate::utils::validation::validate_non_empty_string;
use std::collections::HashMap;

/// Raw user inputs keyed by field name.
pub type FieldInputs = HashMap<String, String>;

/// Validates raw inputs against one schema and assembles the feature vector.
#[derive(Debug, Clone, Copy)]
pub struct FeatureCollector {
    schema: &'static FeatureSchema,
}

impl FeatureCollector {
    pub fn new(schema: &'static FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn for_schema_id(schema_id: &str) -> Result<Self> {
        Ok(Self::new(FeatureSchema::by_id(schema_id)?))
    }

    pub fn schema(&self) -> &'static FeatureSchema {
        self.schema
    }

    pub fn collect(&self, inputs: &FieldInputs) -> Result<FeatureVector> {
        if let Some(unknown) = inputs.keys().find(|k| self.schema.field(k).is_none()) {
            return Err(RiskError::FieldValidationError {
                field: unknown.clone(),
                value: inputs[unknown].clone(),
                reason: format!(
                    "Not a field of schema {}. Expected: {}",
                    self.schema.id,
                    self.schema.field_names().join(", ")
                ),
            });
        }

        let mut fields = Vec::with_capacity(self.schema.len());
        for descriptor in self.schema.fields {
            let raw = inputs
                .get(descriptor.name)
                .ok_or_else(|| RiskError::MissingFieldError {
                    field: descriptor.name.to_string(),
                })?;
            validate_non_empty_string(descriptor.name, raw)?;

            let value = descriptor.encode(raw)?;
            let label = match descriptor.kind {
                FieldKind::Integer { .. } => raw.trim().to_string(),
                FieldKind::Categorical(_) => descriptor
                    .decode(value)
                    .unwrap_or_else(|| raw.trim().to_string()),
            };

            fields.push(FieldValue {
                name: descriptor.name.to_string(),
                label,
                value,
            });
        }

        tracing::debug!(
            "Collected {} fields for schema {}",
            fields.len(),
            self.schema.id
        );

        Ok(FeatureVector {
            schema_id: self.schema.id.to_string(),
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{SMOKING_V1, STAGING_V2};

    fn inputs(pairs: &[(&str, &str)]) -> FieldInputs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn baseline() -> FieldInputs {
        inputs(&[
            ("age", "45"),
            ("stage", "I"),
            ("t_stage", "T1a"),
            ("n_stage", "N0"),
            ("adenopathy", "No"),
            ("response", "Excellent"),
        ])
    }

    #[test]
    fn test_collect_baseline_vector() {
        let collector = FeatureCollector::new(&STAGING_V2);
        let vector = collector.collect(&baseline()).unwrap();

        assert_eq!(vector.schema_id, "staging-v2");
        assert_eq!(vector.values(), vec![45.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_collect_follows_schema_order() {
        let collector = FeatureCollector::new(&SMOKING_V1);
        let vector = collector
            .collect(&inputs(&[
                ("hx_smoking", "Yes"),
                ("stage", "IVA"),
                ("t_stage", "T3b"),
                ("n_stage", "N1a"),
                ("smoking", "No"),
                ("age", "61"),
            ]))
            .unwrap();

        assert_eq!(vector.values(), vec![61.0, 0.0, 2.0, 4.0, 4.0, 1.0]);
        assert_eq!(vector.fields[4].label, "IVA");
    }

    #[test]
    fn test_codes_are_normalized_to_labels() {
        let collector = FeatureCollector::new(&STAGING_V2);
        let mut raw = baseline();
        raw.insert("adenopathy".to_string(), "3".to_string());

        let vector = collector.collect(&raw).unwrap();
        assert_eq!(vector.fields[4].label, "Bilateral");
        assert_eq!(vector.fields[4].value, 3.0);
    }

    #[test]
    fn test_age_boundaries() {
        let collector = FeatureCollector::new(&STAGING_V2);
        for (age, ok) in [("0", true), ("120", true), ("121", false), ("-1", false)] {
            let mut raw = baseline();
            raw.insert("age".to_string(), age.to_string());
            assert_eq!(collector.collect(&raw).is_ok(), ok, "age {}", age);
        }
    }

    #[test]
    fn test_out_of_set_code_rejected() {
        let collector = FeatureCollector::new(&STAGING_V2);
        let mut raw = baseline();
        raw.insert("t_stage".to_string(), "7".to_string());

        let err = collector.collect(&raw).unwrap_err();
        assert!(matches!(err, RiskError::FieldValidationError { ref field, .. } if field == "t_stage"));
    }

    #[test]
    fn test_missing_and_unknown_fields() {
        let collector = FeatureCollector::new(&STAGING_V2);

        let mut missing = baseline();
        missing.remove("response");
        assert!(matches!(
            collector.collect(&missing),
            Err(RiskError::MissingFieldError { .. })
        ));

        let mut unknown = baseline();
        unknown.insert("smoking".to_string(), "Yes".to_string());
        assert!(matches!(
            collector.collect(&unknown),
            Err(RiskError::FieldValidationError { .. })
        ));

        let mut blank = baseline();
        blank.insert("stage".to_string(), "  ".to_string());
        assert!(collector.collect(&blank).is_err());
    }
}
