//! Política de traducción error→outcome.
//!
//! Todo error que escapa de la lógica de un paso cae en exactamente uno de
//! tres niveles, y cada nivel fija el status del outcome persistido y si el
//! error vuelve a propagarse:
//!
//! | nivel        | outcome  | propagación                    |
//! |--------------|----------|--------------------------------|
//! | recuperable  | `failed` | sólo bajo modo estricto        |
//! | defecto      | `bad`    | sólo bajo modo estricto        |
//! | fatal        | `bad`    | siempre; nunca se absorbe      |
//!
//! La clasificación es extensible: cada paso puede construirse con su propio
//! clasificador (ver [`crate::step::Step::classify`]); este módulo provee el
//! clasificador por defecto basado en los tipos de `crate::errors`.

use serde_json::Value;

use crate::errors::{Failure, FatalError, SharedError};
use crate::outcome::{Outcome, OutcomeStatus};

/// Nivel de severidad de un error crudo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTier {
    /// Fallo de negocio anticipado.
    Recoverable,
    /// Error de programación en la lógica del paso.
    Defect,
    /// Error que no debe absorberse jamás.
    Fatal,
}

/// Firma de un clasificador inyectable por paso.
pub type ClassifyFn = dyn Fn(&(dyn std::error::Error + 'static)) -> ErrorTier;

/// Clasificador por defecto: [`Failure`] es recuperable, [`FatalError`] es
/// fatal, cualquier otro error es un defecto.
pub fn default_classify(error: &(dyn std::error::Error + 'static)) -> ErrorTier {
    if error.downcast_ref::<Failure>().is_some() {
        ErrorTier::Recoverable
    } else if error.downcast_ref::<FatalError>().is_some() {
        ErrorTier::Fatal
    } else {
        ErrorTier::Defect
    }
}

/// Outcome para un error capturado: explanation con el mensaje, el error
/// compartido adjunto y los detalles con la cadena de causas.
pub(crate) fn raised_outcome(tier: ErrorTier, error: &SharedError) -> Outcome {
    let status = match tier {
        ErrorTier::Recoverable => OutcomeStatus::Failed,
        ErrorTier::Defect | ErrorTier::Fatal => OutcomeStatus::Bad,
    };
    Outcome::new(status, error.to_string(), Value::Null)
        .with_error(SharedError::clone(error))
        .with_details(error_chain(error.as_ref()))
}

/// Cadena de causas de un error, un cuadro por línea.
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut frames = vec![error.to_string()];
    let mut current = error.source();
    while let Some(source) = current {
        frames.push(source.to_string());
        current = source.source();
    }
    frames.join("\n")
}
