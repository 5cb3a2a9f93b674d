use crate::core::collector::FieldInputs;
use crate::core::engine::PredictionEngine;
use crate::domain::ports::ModelSource;
use crate::utils::error::{Result, RiskError};
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
    pub scored: usize,
    pub rejected: usize,
}

/// Columns appended to every output row.
pub const OUTPUT_COLUMNS: [&str; 3] = ["no_recurrence", "recurrence", "error"];

/// Score every row of a CSV file with one cached model.
///
/// Columns named after schema fields are collected; other columns are copied
/// through untouched. A row that fails validation or inference, or whose
/// field count does not match the header, gets its message in the `error`
/// column and scoring continues. A model that cannot be loaded aborts before
/// any row is read.
pub async fn score_csv<S, R, W>(
    engine: &PredictionEngine<S>,
    input: R,
    output: W,
) -> Result<BatchSummary>
where
    S: ModelSource,
    R: Read,
    W: Write,
{
    let predictor = engine.predictor().await?;
    let collector = engine.collector();
    let schema = collector.schema();

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let mut writer = csv::Writer::from_writer(output);

    let headers = reader.headers()?.clone();
    if let Some(reserved) = headers.iter().find(|name| OUTPUT_COLUMNS.contains(name)) {
        return Err(RiskError::FieldValidationError {
            field: "header".to_string(),
            value: reserved.to_string(),
            reason: format!(
                "input columns may not be named {}",
                OUTPUT_COLUMNS.join(", ")
            ),
        });
    }

    let mut out_headers: Vec<&str> = headers.iter().collect();
    out_headers.extend(OUTPUT_COLUMNS);
    writer.write_record(&out_headers)?;

    let mut summary = BatchSummary::default();
    for record in reader.records() {
        summary.rows += 1;

        let (mut row, outcome) = match record {
            Ok(record) => {
                let row: Vec<String> = record.iter().map(str::to_string).collect();
                let outcome = if record.len() != headers.len() {
                    Err(RiskError::FieldValidationError {
                        field: "row".to_string(),
                        value: format!("{} fields", record.len()),
                        reason: format!("header has {} fields", headers.len()),
                    })
                } else {
                    let inputs: FieldInputs = headers
                        .iter()
                        .zip(record.iter())
                        .filter(|(name, _)| schema.field(name).is_some())
                        .map(|(name, value)| (name.to_string(), value.to_string()))
                        .collect();
                    collector
                        .collect(&inputs)
                        .and_then(|features| predictor.predict(&features))
                };
                (row, outcome)
            }
            Err(e) => (Vec::new(), Err(RiskError::CsvError(e))),
        };

        // 對齊表頭欄數，輸出檔維持矩形
        row.resize(headers.len(), String::new());

        match outcome {
            Ok(result) => {
                summary.scored += 1;
                row.push(format!("{:.6}", result.no_recurrence));
                row.push(format!("{:.6}", result.recurrence));
                row.push(String::new());
            }
            Err(e) => {
                summary.rejected += 1;
                tracing::warn!("Row {} rejected: {}", summary.rows, e);
                row.push(String::new());
                row.push(String::new());
                row.push(e.to_string());
            }
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    tracing::info!(
        "Batch complete: {} rows, {} scored, {} rejected",
        summary.rows,
        summary.scored,
        summary.rejected
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collector::FeatureCollector;
    use crate::domain::model::ModelLocation;
    use crate::domain::schema::SMOKING_V1;

    struct StaticSource(Option<String>);

    impl ModelSource for StaticSource {
        fn location(&self) -> ModelLocation {
            ModelLocation::Path("fixture.json".into())
        }

        async fn fetch(&self) -> Result<Vec<u8>> {
            self.0
                .clone()
                .map(String::into_bytes)
                .ok_or_else(|| RiskError::decode("unreadable"))
        }
    }

    fn forest() -> String {
        serde_json::json!({
            "name": "rf",
            "feature_schema": "smoking-v1",
            "n_features": 6,
            "estimator": {
                "type": "random_forest",
                "trees": [{ "nodes": [
                    { "feature": 2, "threshold": 0.5, "left": 1, "right": 2 },
                    { "value": [3.0, 1.0] },
                    { "value": [1.0, 3.0] }
                ]}]
            }
        })
        .to_string()
    }

    const INPUT: &str = "\
patient_id,age,smoking,n_stage,t_stage,stage,hx_smoking
p1,34,No,N0,T2,I,No
p2,70,Yes,N1b,T3a,II,Yes
p3,130,No,N0,T2,I,No
";

    #[tokio::test]
    async fn test_scores_rows_and_reports_rejections() {
        let engine = PredictionEngine::new(
            StaticSource(Some(forest())),
            FeatureCollector::new(&SMOKING_V1),
        );
        let mut output = Vec::new();

        let summary = score_csv(&engine, INPUT.as_bytes(), &mut output).await.unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                rows: 3,
                scored: 2,
                rejected: 1
            }
        );

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "patient_id,age,smoking,n_stage,t_stage,stage,hx_smoking,no_recurrence,recurrence,error"
        );
        assert!(lines[1].starts_with("p1,") && lines[1].ends_with(",0.750000,0.250000,"));
        assert!(lines[2].ends_with(",0.250000,0.750000,"));
        assert!(lines[3].contains("age"));
    }

    #[tokio::test]
    async fn test_load_failure_aborts_batch() {
        let engine = PredictionEngine::new(StaticSource(None), FeatureCollector::new(&SMOKING_V1));
        let mut output = Vec::new();

        let result = score_csv(&engine, INPUT.as_bytes(), &mut output).await;

        assert!(matches!(result, Err(RiskError::ModelDecodeError { .. })));
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_ragged_rows_are_rejected_individually() {
        let engine = PredictionEngine::new(
            StaticSource(Some(forest())),
            FeatureCollector::new(&SMOKING_V1),
        );
        let input = "\
age,smoking,n_stage,t_stage,stage,hx_smoking
34,No,N0,T2,I,No
70,Yes
40,No,N0,T2,I,No,extra
41,No,N1a,T2,I,No
";
        let mut output = Vec::new();

        let summary = score_csv(&engine, input.as_bytes(), &mut output).await.unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                rows: 4,
                scored: 2,
                rejected: 2
            }
        );

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        // 短列補空欄，長列截斷
        assert!(lines[2].starts_with("70,Yes,,,,,,,"));
        assert!(lines[2].contains("header has 6 fields"));
        assert!(lines[3].starts_with("40,No,N0,T2,I,No,,,"));
        assert!(lines[3].contains("7 fields"));
        assert!(lines[4].ends_with(",0.250000,0.750000,"));
    }

    #[tokio::test]
    async fn test_reserved_output_column_is_rejected() {
        let engine = PredictionEngine::new(
            StaticSource(Some(forest())),
            FeatureCollector::new(&SMOKING_V1),
        );
        let input = "age,smoking,n_stage,t_stage,stage,hx_smoking,recurrence\n34,No,N0,T2,I,No,0.1\n";
        let mut output = Vec::new();

        let result = score_csv(&engine, input.as_bytes(), &mut output).await;

        assert!(matches!(
            result,
            Err(RiskError::FieldValidationError { ref value, .. }) if value == "recurrence"
        ));
        assert!(output.is_empty());
    }
}
