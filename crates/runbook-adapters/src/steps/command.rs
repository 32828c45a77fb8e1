//! Pasos de ejecución de comandos externos.
//!
//! La traducción es fija: salida 0 → `succeeded` con el stdout como
//! resultado; salida distinta de cero → `failed` (fallo anticipado, el run
//! sigue y decide) con el stderr en los detalles. No poder lanzar el proceso
//! también cuenta como fallo anticipado: el clasificador del paso degrada
//! `CommandError` a recuperable.

use std::process::Command;

use runbook_core::{declare, translate, ErrorTier, Outcome, OutcomeStatus, SimpleStep, StepReturn};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Paso que ejecuta `program` con `args` y traduce el exit status.
pub fn run_command(
    title: impl Into<String>,
    program: impl Into<String>,
    args: &[&str],
) -> SimpleStep {
    let program = program.into();
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    command_step(title.into(), program, args)
}

/// Paso que corre `script` bajo `sh -c`.
pub fn sh(title: impl Into<String>, script: impl Into<String>) -> SimpleStep {
    let script = script.into();
    command_step(title.into(), "sh".to_string(), vec!["-c".to_string(), script])
}

fn command_step(title: String, program: String, args: Vec<String>) -> SimpleStep {
    SimpleStep::action(title, move |_baton, _step| {
        tracing::debug!(program = %program, "running command");
        let output = Command::new(&program)
            .args(&args)
            .output()
            .map_err(|source| CommandError::Launch {
                program: program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();

        if output.status.success() {
            return Ok(declare::succeed_with(
                format!("{program} exited cleanly"),
                json!({ "stdout": stdout }),
            ));
        }

        let explanation = match output.status.code() {
            Some(code) => format!("{program} exited with status {code}"),
            None => format!("{program} was terminated by a signal"),
        };
        let outcome = Outcome::new(
            OutcomeStatus::Failed,
            explanation,
            json!({ "stdout": stdout, "exit_code": output.status.code() }),
        )
        .with_details(stderr);
        Ok(StepReturn::Declared(outcome))
    })
    .with_classifier(|error| {
        if error.downcast_ref::<CommandError>().is_some() {
            ErrorTier::Recoverable
        } else {
            translate::default_classify(error)
        }
    })
}
