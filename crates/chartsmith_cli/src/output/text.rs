//! Text output formatter

use std::time::Duration;

use chartsmith_core::{BuildOutcome, BuildReport, Decision, PlannedJob};

pub fn output_text(report: &BuildReport, timings: bool) {
    for result in &report.results {
        match &result.outcome {
            BuildOutcome::Skipped => {}
            BuildOutcome::Built => {
                println!("  ✓ {} → {}", result.job_id, result.output_path.display());
            }
            BuildOutcome::Failed(e) => {
                println!("  ✗ {}: {}", result.job_id, e);
            }
        }
        for warning in &result.warnings {
            println!("    warning: {}", warning);
        }
    }

    let summary = report.summary();

    println!();
    println!("Summary:");
    println!("  Total charts: {}", summary.total);
    println!("  Built/updated: {}", summary.built);
    println!("  Cached (skipped): {}", summary.skipped);
    println!("  Failed: {}", summary.failed);

    if report.interrupted {
        println!("  Interrupted before all charts were processed");
    }
    if let Some(e) = &report.persist_error {
        println!("  Cache store not saved: {}", e);
    }

    if timings {
        output_timings(report);
    }

    println!("Done in {:.2}s", report.elapsed.as_secs_f64());
}

fn output_timings(report: &BuildReport) {
    let mut rendered: Vec<(&str, Duration)> = report
        .results
        .iter()
        .filter(|r| !r.is_skipped())
        .map(|r| (r.job_id.as_str(), r.duration))
        .collect();

    if rendered.is_empty() {
        return;
    }

    let total_duration: Duration = rendered.iter().map(|(_, d)| *d).sum();
    rendered.sort_by(|a, b| b.1.cmp(&a.1));

    println!("\nPerformance Timings:");
    println!("{:<30} | {:<15} | {:<10}", "Chart", "Duration", "%");
    println!("{:-<30}-+-{:-<15}-+-{:-<10}", "", "", "");

    for (chart, duration) in rendered {
        let percentage = if total_duration.as_secs_f64() > 0.0 {
            (duration.as_secs_f64() / total_duration.as_secs_f64()) * 100.0
        } else {
            0.0
        };
        println!("{:<30} | {:<15?} | {:<10.1}%", chart, duration, percentage);
    }
    println!("{:-<30}-+-{:-<15}-+-{:-<10}", "", "", "");
    println!("{:<30} | {:<15?}", "Total", total_duration);
}

pub fn output_plan_text(plan: &[PlannedJob]) {
    let mut stale = 0;

    for job in plan {
        match job.decision {
            Decision::Fresh => println!("  ✓ {} (up to date)", job.job_id),
            Decision::Stale(reason) => {
                stale += 1;
                println!("  • {} ({})", job.job_id, reason);
            }
        }
        for input in &job.missing_inputs {
            println!("    warning: missing input {}", input.display());
        }
    }

    println!();
    println!("{} of {} charts would be built", stale, plan.len());
}
