//! Verificaciones de entorno.
//!
//! Cada check es un paso que declara `succeeded` o `failed` de forma
//! explicable; ninguno produce `bad` porque un entorno incompleto es un
//! modo de fallo esperado para un runbook de setup.

use std::path::PathBuf;

use runbook_core::{declare, SimpleStep};
use serde_json::json;

/// Verifica que la variable de entorno `key` exista y no esté vacía.
pub fn env_var_present(title: impl Into<String>, key: impl Into<String>) -> SimpleStep {
    let key = key.into();
    SimpleStep::action(title.into(), move |_baton, _step| {
        match std::env::var(&key) {
            Ok(value) if !value.is_empty() => Ok(declare::succeed_with(
                format!("{key} is set"),
                json!({ "key": key, "length": value.len() }),
            )),
            Ok(_) => Ok(declare::fail(format!("{key} is set but empty"))),
            Err(_) => Ok(declare::fail(format!("{key} is not set"))),
        }
    })
}

/// Verifica que `path` exista en el filesystem.
pub fn path_exists(title: impl Into<String>, path: impl Into<PathBuf>) -> SimpleStep {
    let path = path.into();
    SimpleStep::action(title.into(), move |_baton, _step| {
        if path.exists() {
            Ok(declare::succeed_with(
                format!("{} exists", path.display()),
                json!({ "path": path.display().to_string() }),
            ))
        } else {
            Ok(declare::fail(format!("{} does not exist", path.display())))
        }
    })
}

/// Verifica que `name` sea un ejecutable alcanzable vía PATH.
pub fn executable_on_path(title: impl Into<String>, name: impl Into<String>) -> SimpleStep {
    let name = name.into();
    SimpleStep::action(title.into(), move |_baton, _step| {
        let found = std::env::var_os("PATH")
            .map(|path| {
                std::env::split_paths(&path).any(|dir| dir.join(&name).is_file())
            })
            .unwrap_or(false);
        if found {
            Ok(declare::succeed(format!("{name} found on PATH")))
        } else {
            Ok(declare::fail(format!("{name} not found on PATH")))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use runbook_core::{Baton, OutcomeStatus, Step};

    #[test]
    fn env_var_check_reports_both_sides() {
        // PATH siempre existe en los entornos donde corren estos tests
        let mut present = env_var_present("has PATH", "PATH");
        let mut baton = Baton::new();
        let outcome = present.execute(&mut baton, false).expect("absorbed");
        assert_eq!(outcome.status(), OutcomeStatus::Succeeded);

        let mut absent = env_var_present("has nothing", "RUNBOOK_TEST_UNSET_VAR_93");
        let outcome = absent.execute(&mut baton, false).expect("absorbed");
        assert_eq!(outcome.status(), OutcomeStatus::Failed);
        assert_eq!(
            outcome.explanation(),
            "RUNBOOK_TEST_UNSET_VAR_93 is not set"
        );
    }

    #[test]
    fn executable_check_finds_sh() {
        let mut step = executable_on_path("has sh", "sh");
        let mut baton = Baton::new();
        let outcome = step.execute(&mut baton, false).expect("absorbed");
        assert_eq!(outcome.status(), OutcomeStatus::Succeeded);
    }
}
