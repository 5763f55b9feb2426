//! The `advice` command: spend and profit exports in, prose advice out.

use std::path::Path;

use salescopy_core::{ProfitRecord, SpendRecord};
use salescopy_pipeline::{AdviceRequest, BackendChoice, Pipeline};
use serde::de::DeserializeOwned;

/// Loads the record files, runs the advice stage and prints the answer.
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed, or the stage fails.
pub(crate) async fn run_advice(
    pipeline: &Pipeline,
    records_path: &Path,
    profit_path: Option<&Path>,
    model: &str,
) -> anyhow::Result<()> {
    let records: Vec<SpendRecord> = read_json_array(records_path)?;
    let profit_data: Vec<ProfitRecord> = match profit_path {
        Some(path) => read_json_array(path)?,
        None => Vec::new(),
    };
    tracing::info!(
        records = records.len(),
        profit_rows = profit_data.len(),
        "requesting advice"
    );

    let advice = pipeline
        .advice(&AdviceRequest {
            records,
            profit_data,
            backend: BackendChoice::new(model),
        })
        .await?;
    println!("{advice}");
    Ok(())
}

pub(crate) fn read_json_array<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))
}
