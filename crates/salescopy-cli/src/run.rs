//! The `run` command: one product page through all four copy stages.

use salescopy_core::{SalesAngle, SalesChannel};
use salescopy_pipeline::{
    AdaptRequest, AnalyzeRequest, AnglesRequest, BackendChoice, CopyRequest, Pipeline,
};
use serde::Serialize;

/// Executes analyze → angles → copy → adapt and prints each stage's JSON.
///
/// # Errors
///
/// Returns an error if the channel is unknown, no angle has `angle_id`, or
/// any stage fails.
pub(crate) async fn run_pipeline(
    pipeline: &Pipeline,
    url: &str,
    model: &str,
    angle_id: &str,
    channel: &str,
) -> anyhow::Result<()> {
    let channel: SalesChannel = channel.parse()?;
    let backend = BackendChoice::new(model);

    let product_info = pipeline
        .analyze(&AnalyzeRequest {
            url: Some(url.to_string()),
            backend: backend.clone(),
        })
        .await?;
    print_stage("product", &product_info)?;

    let angles = pipeline
        .angles(&AnglesRequest {
            product_info: Some(product_info.clone()),
            backend: backend.clone(),
        })
        .await?;
    print_stage("angles", &angles)?;

    let chosen = pick_angle(&angles, angle_id)?.clone();
    tracing::info!(angle = %chosen.id, title = %chosen.title, "writing copy");

    let copy = pipeline
        .copy(&CopyRequest {
            product_info: Some(product_info.clone()),
            chosen_angle: Some(chosen.clone()),
            backend: backend.clone(),
        })
        .await?;
    print_stage("copy", &copy)?;

    let adapted = pipeline
        .adapt(&AdaptRequest {
            product_info: Some(product_info),
            chosen_angle: Some(chosen),
            copy: Some(copy),
            sales_channel: Some(channel.as_str().to_string()),
            backend,
        })
        .await?;
    print_stage(channel.display_name(), &adapted)?;

    Ok(())
}

pub(crate) fn pick_angle<'a>(angles: &'a [SalesAngle], id: &str) -> anyhow::Result<&'a SalesAngle> {
    let id = id.trim();
    angles.iter().find(|a| a.id == id).ok_or_else(|| {
        let ids: Vec<&str> = angles.iter().map(|a| a.id.as_str()).collect();
        anyhow::anyhow!("angle '{id}' not found; available: [{}]", ids.join(", "))
    })
}

fn print_stage<T: Serialize>(label: &str, value: &T) -> anyhow::Result<()> {
    println!("## {label}");
    println!("{}", serde_json::to_string_pretty(value)?);
    println!();
    Ok(())
}
