//! JSON output formatter

use miette::{IntoDiagnostic, Result};
use serde_json::json;

use chartsmith_core::{BuildReport, Decision, PlannedJob};

pub fn output_json(report: &BuildReport, timings: bool) -> Result<()> {
    let results: Vec<_> = report
        .results
        .iter()
        .map(|r| {
            let mut entry = json!({
                "name": r.job_id,
                "output": r.output_path.display().to_string(),
                "status": r.status(),
                "reason": r.reason.map(|reason| reason.as_str()),
                "warnings": r.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
                "error": r.error().map(|e| e.to_string()),
            });
            if timings {
                entry["duration_ms"] = json!(r.duration.as_secs_f64() * 1000.0);
            }
            entry
        })
        .collect();

    let summary = report.summary();
    let output = json!({
        "results": results,
        "summary": {
            "total": summary.total,
            "built": summary.built,
            "skipped": summary.skipped,
            "failed": summary.failed,
        },
        "interrupted": report.interrupted,
        "persist_error": report.persist_error.as_ref().map(|e| e.to_string()),
        "elapsed_ms": report.elapsed.as_secs_f64() * 1000.0,
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}

pub fn output_plan_json(plan: &[PlannedJob]) -> Result<()> {
    let output: Vec<_> = plan
        .iter()
        .map(|job| {
            let (fresh, reason) = match job.decision {
                Decision::Fresh => (true, None),
                Decision::Stale(reason) => (false, Some(reason.as_str())),
            };
            json!({
                "name": job.job_id,
                "output": job.output_path.display().to_string(),
                "fresh": fresh,
                "reason": reason,
                "missing_inputs": job
                    .missing_inputs
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>(),
            })
        })
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}
