use std::path::Path;

use anyhow::{Context, Result};

use super::trend::TrendRecord;

/// Serialise trend records as a pretty-printed JSON array.
///
/// ```json
/// [
///   {
///     "program": "Elétrica",
///     "metric_name": "Posição",
///     "first_year": 2018,
///     "last_year": 2021,
///     "first_value": 10.0,
///     "last_value": 5.0,
///     "observations": 2,
///     "direction": "improved"
///   }
/// ]
/// ```
pub fn insights_to_json(trends: &[TrendRecord]) -> Result<String> {
    serde_json::to_string_pretty(trends).context("serialising insights")
}

/// Write [`insights_to_json`] output to `path`.
pub fn write_insights(path: &Path, trends: &[TrendRecord]) -> Result<()> {
    let json = insights_to_json(trends)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} insights to {}", trends.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::trend::TrendDirection;
    use serde_json::Value as JsonValue;

    fn trend(direction: TrendDirection, last_value: Option<f64>) -> TrendRecord {
        TrendRecord {
            program: "Elétrica".to_string(),
            metric_name: "Posição".to_string(),
            first_year: Some(2018),
            last_year: Some(2021),
            first_value: Some(10.0),
            last_value,
            observations: 2,
            direction,
        }
    }

    #[test]
    fn directions_are_snake_case_and_missing_is_null() {
        let json = insights_to_json(&[
            trend(TrendDirection::Improved, Some(5.0)),
            trend(TrendDirection::InsufficientData, None),
        ])
        .unwrap();
        let root: JsonValue = serde_json::from_str(&json).unwrap();
        let items = root.as_array().unwrap();

        assert_eq!(items[0]["direction"], "improved");
        assert_eq!(items[0]["last_value"], 5.0);
        assert_eq!(items[1]["direction"], "insufficient_data");
        assert!(items[1]["last_value"].is_null());
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("insights.json");
        write_insights(&path, &[trend(TrendDirection::Stable, Some(10.0))]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"stable\""));
    }
}
