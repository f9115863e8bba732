//! Reference/candidate comparison.

use anyhow::Context;
use clap::Args;
use drumcheck_analysis::export::{CurveSink, emit_comparison, emit_summary};
use drumcheck_analysis::{compare_signals, summarize};
use std::path::PathBuf;

use super::common::{
    OutputArgs, PairInputArgs, finish_curves, load_input, load_settings, open_curves, write_json,
};
use crate::report::{ComparisonOutcome, CompareOutput, comparison_text, summary_text};

#[derive(Args)]
pub struct CompareArgs {
    /// Reference recording (e.g., the sampled drum)
    #[arg(value_name = "REFERENCE")]
    reference: PathBuf,

    /// Candidate recording (e.g., the synthesized render)
    #[arg(value_name = "CANDIDATE")]
    candidate: PathBuf,

    #[command(flatten)]
    format: PairInputArgs,

    #[command(flatten)]
    output: OutputArgs,
}

pub fn run(args: CompareArgs) -> anyhow::Result<()> {
    let (profile, settings) = load_settings(args.output.config.as_deref())?;
    let reference_format = args.format.reference()?;
    let candidate_format = args.format.candidate()?;

    println!("Drum Comparison");
    println!("===============");
    println!("  Reference: {}", args.reference.display());
    println!("  Candidate: {}", args.candidate.display());
    println!("  Profile:   {}", profile.name);
    println!();

    let candidate = load_input(&args.candidate, candidate_format)?;
    let mut curves = open_curves(args.output.curves.as_deref())?;

    if !args.reference.exists() {
        let reason = format!("reference {} not found", args.reference.display());
        tracing::warn!(
            reference = %args.reference.display(),
            "reference missing, skipping comparison"
        );

        let summary = summarize(&candidate, &settings)
            .with_context(|| format!("failed to analyze {}", args.candidate.display()))?;
        print!("{}", summary_text("Candidate", &summary)?);
        println!();
        println!("Comparison skipped: {reason}");

        emit_summary(
            curves.as_mut().map(|sink| sink as &mut dyn CurveSink),
            "candidate",
            &candidate,
            &summary,
        )
        .context("failed to write curves")?;
        finish_curves(curves.as_ref());

        if let Some(path) = &args.output.json {
            write_json(
                path,
                &CompareOutput {
                    profile: &profile.name,
                    reference: args.reference.display().to_string(),
                    candidate: args.candidate.display().to_string(),
                    comparison: ComparisonOutcome::Skipped {
                        reason,
                        candidate: &summary,
                    },
                },
            )?;
        }
        return Ok(());
    }

    let reference = load_input(&args.reference, reference_format)?;
    let report = compare_signals(&reference, &candidate, &settings).context("comparison failed")?;

    print!("{}", summary_text("Reference (aligned)", &report.reference)?);
    println!();
    print!("{}", summary_text("Candidate (aligned)", &report.candidate)?);
    println!();
    print!("{}", comparison_text(&report)?);

    emit_comparison(
        curves.as_mut().map(|sink| sink as &mut dyn CurveSink),
        &reference,
        &candidate,
        &report,
    )
    .context("failed to write curves")?;
    finish_curves(curves.as_ref());

    if let Some(path) = &args.output.json {
        write_json(
            path,
            &CompareOutput {
                profile: &profile.name,
                reference: args.reference.display().to_string(),
                candidate: args.candidate.display().to_string(),
                comparison: ComparisonOutcome::Completed { report: &report },
            },
        )?;
    }

    Ok(())
}
