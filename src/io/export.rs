//! Export prediction and history results.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::domain::{History, PredictionResult};
use crate::error::AppError;

/// Write windowed history to a CSV file, one row per grade and month.
pub fn write_history_csv(path: &Path, history: &History) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::Io(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record(["grade", "year", "month", "time_point", "price"])
        .map_err(|e| AppError::Io(format!("Failed to write export CSV header: {e}")))?;

    for (grade, points) in history {
        for p in points {
            let t = crate::domain::time_point(p.year, p.month);
            writer
                .write_record([
                    grade.as_str().to_string(),
                    p.year.to_string(),
                    p.month.to_string(),
                    format!("{t:.6}"),
                    format!("{:.2}", p.price),
                ])
                .map_err(|e| AppError::Io(format!("Failed to write export CSV row: {e}")))?;
        }
    }

    writer
        .flush()
        .map_err(|e| AppError::Io(format!("Failed to flush export CSV: {e}")))?;
    log::info!("wrote history CSV to {}", path.display());
    Ok(())
}

/// Write a prediction result as pretty JSON (same shape as `predict --json`).
pub fn write_prediction_json(path: &Path, result: &PredictionResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::Io(format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(BufWriter::new(file), result)
        .map_err(|e| AppError::Io(format!("Failed to write export JSON: {e}")))?;
    log::info!("wrote prediction JSON to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::*;
    use crate::domain::{GradePrediction, HistoricalPoint, QualityGrade};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rice_export_{}_{name}", std::process::id()))
    }

    #[test]
    fn history_csv_rows() {
        let mut history = History::new();
        history.insert(
            QualityGrade::Premium,
            vec![
                HistoricalPoint {
                    year: 2024,
                    month: 1,
                    price: 14_000.0,
                },
                HistoricalPoint {
                    year: 2024,
                    month: 12,
                    price: 15_250.5,
                },
            ],
        );
        history.insert(
            QualityGrade::LowQuality,
            vec![HistoricalPoint {
                year: 2013,
                month: 3,
                price: 8_900.0,
            }],
        );

        let path = temp_path("history.csv");
        write_history_csv(&path, &history).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "grade,year,month,time_point,price");
        assert_eq!(lines[1], "premium,2024,1,2024.000000,14000.00");
        assert_eq!(lines[2], "premium,2024,12,2024.916667,15250.50");
        assert_eq!(lines[3], "low_quality,2013,3,2013.166667,8900.00");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn prediction_json_round_trips_through_serde_value() {
        let mut predictions = BTreeMap::new();
        predictions.insert(
            QualityGrade::Medium,
            GradePrediction::Estimate {
                estimated_price: 13_100.0,
                previous_price: 13_050.0,
            },
        );
        let result = PredictionResult {
            year: 2024,
            month: 6,
            predictions,
        };

        let path = temp_path("prediction.json");
        write_prediction_json(&path, &result).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["year"], 2024);
        assert_eq!(v["predictions"]["medium"]["estimated_price"], 13_100.0);
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let path = std::env::temp_dir().join("rice_no_such_dir").join("x").join("h.csv");
        let err = write_history_csv(&path, &History::new()).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
