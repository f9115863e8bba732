//! Single-recording measurement.

use anyhow::Context;
use clap::Args;
use drumcheck_analysis::export::{CurveSink, emit_summary};
use drumcheck_analysis::summarize;
use std::path::PathBuf;

use super::common::{
    InputArgs, OutputArgs, finish_curves, load_input, load_settings, open_curves, write_json,
};
use crate::report::{AnalyzeOutput, summary_text};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Recording to measure
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[command(flatten)]
    format: InputArgs,

    #[command(flatten)]
    output: OutputArgs,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let (profile, settings) = load_settings(args.output.config.as_deref())?;
    let signal = load_input(&args.input, args.format.format()?)?;

    let summary = summarize(&signal, &settings)
        .with_context(|| format!("failed to analyze {}", args.input.display()))?;

    print!("{}", summary_text(&args.input.display().to_string(), &summary)?);

    let mut curves = open_curves(args.output.curves.as_deref())?;
    emit_summary(
        curves.as_mut().map(|sink| sink as &mut dyn CurveSink),
        "input",
        &signal,
        &summary,
    )
    .context("failed to write curves")?;
    finish_curves(curves.as_ref());

    if let Some(path) = &args.output.json {
        write_json(
            path,
            &AnalyzeOutput {
                profile: &profile.name,
                input: args.input.display().to_string(),
                summary: &summary,
            },
        )?;
    }

    Ok(())
}
