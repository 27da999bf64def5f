//! Output formatting module

mod json;
mod text;

use chartsmith_core::{BuildReport, PlannedJob};
use miette::Result;

use crate::cli::OutputFormat;

pub fn output_report(report: &BuildReport, format: OutputFormat, timings: bool) -> Result<()> {
    match format {
        OutputFormat::Json => json::output_json(report, timings)?,
        OutputFormat::Text => text::output_text(report, timings),
    }
    Ok(())
}

pub fn output_plan(plan: &[PlannedJob], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => json::output_plan_json(plan)?,
        OutputFormat::Text => text::output_plan_text(plan),
    }
    Ok(())
}
