//! Output formatting

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use modelgen_core::{GenerateError, GenerateOutcome};

use crate::cli::OutputFormat;

pub fn output_results(
    outcomes: &[GenerateOutcome],
    failures: &[(PathBuf, GenerateError)],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => output_json(outcomes, failures),
        OutputFormat::Text => {
            output_text(outcomes, failures);
            Ok(())
        }
    }
}

fn output_text(outcomes: &[GenerateOutcome], failures: &[(PathBuf, GenerateError)]) {
    for outcome in outcomes {
        println!(
            "{}: {} files -> {}",
            outcome.generator,
            outcome.files.len(),
            outcome.gen_dir.display()
        );
    }

    for (gen_dir, error) in failures {
        println!("failed: {}: {}", gen_dir.display(), error);
    }

    let total_files: usize = outcomes.iter().map(|o| o.files.len()).sum();
    println!();
    println!(
        "Ran {} tasks ({} failed), generated {} files",
        outcomes.len() + failures.len(),
        failures.len(),
        total_files
    );
}

fn output_json(outcomes: &[GenerateOutcome], failures: &[(PathBuf, GenerateError)]) -> Result<()> {
    let failures: Vec<_> = failures
        .iter()
        .map(|(gen_dir, error)| {
            serde_json::json!({
                "genDir": gen_dir.display().to_string(),
                "error": error.to_string(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "outcomes": outcomes,
        "failures": failures,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}
