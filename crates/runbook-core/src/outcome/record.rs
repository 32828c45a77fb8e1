//! El objeto-valor `Outcome` y su fusión inmutable.

use std::sync::Arc;

use serde_json::Value;

use crate::errors::SharedError;
use crate::step::StepReturn;

use super::status::OutcomeStatus;

/// Resultado completo de un paso: status + explicación + valor de resultado
/// + error capturado + detalles.
///
/// Un `Outcome` nunca se muta en sitio: cada ejecución del paso lo reemplaza
/// por completo, y [`Outcome::merge`] produce una copia con campos
/// seleccionados sobreescritos.
#[derive(Debug, Clone)]
pub struct Outcome {
    status: OutcomeStatus,
    explanation: String,
    result: Value,
    error: Option<SharedError>,
    details: String,
}

impl Outcome {
    pub fn new(status: OutcomeStatus, explanation: impl Into<String>, result: Value) -> Self {
        Self {
            status,
            explanation: explanation.into(),
            result,
            error: None,
            details: String::new(),
        }
    }

    /// Adjunta el error capturado durante la ejecución.
    pub fn with_error(mut self, error: SharedError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// Normaliza lo que devolvió la lógica de un paso: un valor plano se
    /// convierte en un `succeeded` que lo lleva como resultado; una
    /// declaración explícita se captura tal cual.
    pub fn from_return(ret: StepReturn) -> Self {
        match ret {
            StepReturn::Value(value) => Self::new(OutcomeStatus::Succeeded, "", value),
            StepReturn::Declared(outcome) => outcome,
        }
    }

    pub fn status(&self) -> OutcomeStatus {
        self.status
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn result(&self) -> &Value {
        &self.result
    }

    pub fn error(&self) -> Option<&SharedError> {
        self.error.as_ref()
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    // Predicados delegados al status.

    pub fn ok(&self) -> bool {
        self.status.ok()
    }

    pub fn succeeded(&self) -> bool {
        self.status.succeeded()
    }

    pub fn failed(&self) -> bool {
        self.status.failed()
    }

    pub fn bad(&self) -> bool {
        self.status.bad()
    }

    pub fn skipped(&self) -> bool {
        self.status.skipped()
    }

    pub fn done(&self) -> bool {
        self.status.done()
    }

    pub fn halted(&self) -> bool {
        self.status.halted()
    }

    pub fn continuable(&self) -> bool {
        self.status.continuable()
    }

    pub fn decisive(&self) -> bool {
        self.status.decisive()
    }

    pub fn done_and_ok(&self) -> bool {
        self.status.done_and_ok()
    }

    /// Copia con los campos presentes en el patch sobreescritos. El original
    /// queda intacto; `merge` con un patch vacío devuelve un outcome igual.
    ///
    /// El error sólo puede reemplazarse, no borrarse.
    pub fn merge(&self, patch: OutcomePatch) -> Outcome {
        Outcome {
            status: patch.status.unwrap_or(self.status),
            explanation: patch.explanation.unwrap_or_else(|| self.explanation.clone()),
            result: patch.result.unwrap_or_else(|| self.result.clone()),
            error: patch.error.or_else(|| self.error.clone()),
            details: patch.details.unwrap_or_else(|| self.details.clone()),
        }
    }

    /// Atajo del caso común de `merge`: mismo outcome con otro status.
    pub fn with_status(&self, status: OutcomeStatus) -> Outcome {
        self.merge(OutcomePatch {
            status: Some(status),
            ..OutcomePatch::default()
        })
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::new(OutcomeStatus::NotStarted, "", Value::Null)
    }
}

impl PartialEq for Outcome {
    fn eq(&self, other: &Self) -> bool {
        let same_error = match (&self.error, &other.error) {
            (None, None) => true,
            (Some(a), Some(b)) => std::ptr::eq(
                Arc::as_ptr(a) as *const u8,
                Arc::as_ptr(b) as *const u8,
            ),
            _ => false,
        };
        self.status == other.status
            && self.explanation == other.explanation
            && self.result == other.result
            && self.details == other.details
            && same_error
    }
}

/// Sobreescrituras parciales para [`Outcome::merge`].
#[derive(Debug, Clone, Default)]
pub struct OutcomePatch {
    pub status: Option<OutcomeStatus>,
    pub explanation: Option<String>,
    pub result: Option<Value>,
    pub error: Option<SharedError>,
    pub details: Option<String>,
}
