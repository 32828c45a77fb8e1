//! Declaraciones explícitas de outcome.
//!
//! La lógica de un paso devuelve un `StepReturn`: o un valor plano (que se
//! normaliza a `succeeded`) o un outcome declarado. Declarar es un retorno
//! temprano ordinario:
//!
//! ```
//! use runbook_core::{declare, SimpleStep};
//!
//! let step = SimpleStep::action("check cache", |baton, _step| {
//!     if baton.contains("cache_warm") {
//!         return Ok(declare::finish("cache already warm"));
//!     }
//!     Ok(declare::succeed("cache warmed"))
//! });
//! ```

use serde_json::Value;

use crate::errors::{DynError, SharedError};
use crate::outcome::{Outcome, OutcomeStatus};

/// Lo que produce una invocación de lógica de paso.
pub enum StepReturn {
    /// Valor plano; el traductor lo normaliza a `succeeded`.
    Value(Value),
    /// Outcome declarado explícitamente; se captura tal cual.
    Declared(Outcome),
}

/// Resultado de una invocación de lógica: valor/declaración o error.
pub type StepResult = Result<StepReturn, DynError>;

impl From<Value> for StepReturn {
    fn from(value: Value) -> Self {
        StepReturn::Value(value)
    }
}

impl From<Outcome> for StepReturn {
    fn from(outcome: Outcome) -> Self {
        StepReturn::Declared(outcome)
    }
}

impl From<()> for StepReturn {
    fn from(_: ()) -> Self {
        StepReturn::Value(Value::Null)
    }
}

pub fn succeed(explanation: impl Into<String>) -> StepReturn {
    StepReturn::Declared(Outcome::new(OutcomeStatus::Succeeded, explanation, Value::Null))
}

pub fn succeed_with(explanation: impl Into<String>, result: Value) -> StepReturn {
    StepReturn::Declared(Outcome::new(OutcomeStatus::Succeeded, explanation, result))
}

pub fn fail(explanation: impl Into<String>) -> StepReturn {
    StepReturn::Declared(Outcome::new(OutcomeStatus::Failed, explanation, Value::Null))
}

pub fn fail_with(explanation: impl Into<String>, result: Value, error: Option<SharedError>) -> StepReturn {
    let mut outcome = Outcome::new(OutcomeStatus::Failed, explanation, result);
    if let Some(error) = error {
        outcome = outcome.with_error(error);
    }
    StepReturn::Declared(outcome)
}

pub fn skip(reason: impl Into<String>) -> StepReturn {
    StepReturn::Declared(Outcome::new(OutcomeStatus::Skipped, reason, Value::Null))
}

/// `in_progress` con un memento como resultado; deja constancia de hasta
/// dónde llegó el paso.
pub fn checkpoint(explanation: impl Into<String>, memento: Value) -> StepReturn {
    StepReturn::Declared(Outcome::new(OutcomeStatus::InProgress, explanation, memento))
}

pub fn sufficient(explanation: impl Into<String>) -> StepReturn {
    StepReturn::Declared(Outcome::new(OutcomeStatus::Sufficient, explanation, Value::Null))
}

pub fn finish(explanation: impl Into<String>) -> StepReturn {
    StepReturn::Declared(Outcome::new(OutcomeStatus::Finish, explanation, Value::Null))
}

pub fn abort(explanation: impl Into<String>) -> StepReturn {
    StepReturn::Declared(Outcome::new(OutcomeStatus::Abort, explanation, Value::Null))
}

pub fn abort_with(explanation: impl Into<String>, result: Value, error: Option<SharedError>) -> StepReturn {
    let mut outcome = Outcome::new(OutcomeStatus::Abort, explanation, result);
    if let Some(error) = error {
        outcome = outcome.with_error(error);
    }
    StepReturn::Declared(outcome)
}
