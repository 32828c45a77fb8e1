//! Errores del core y tipos de error que entienden los clasificadores.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Error dinámico tal como lo produce la lógica de un paso.
pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error capturado y compartido entre el `Outcome` persistido y el caller
/// que pidió propagación estricta.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Errores del motor de runs.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("run already performed")]
    AlreadyPerformed,
    #[error("uncaught step error: {0}")]
    StepRaised(SharedError),
    #[error("internal: {0}")]
    Internal(String),
}

/// Fallo de negocio anticipado. El clasificador por defecto lo traduce a un
/// outcome `failed` en lugar de `bad`.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct Failure(pub String);

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Error fatal: se registra en el outcome y se re-propaga siempre, sin
/// importar el modo estricto. Es el único nivel que el traductor nunca
/// absorbe.
#[derive(Debug, Error)]
#[error("fatal: {0}")]
pub struct FatalError(pub String);

impl FatalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Envoltorio de un error ya capturado río abajo que vuelve a atravesar un
/// decorador. El traductor lo pela antes de clasificar, de modo que los
/// clasificadores y matchers siempre ven el error original.
#[derive(Debug)]
pub struct Propagated(pub SharedError);

impl fmt::Display for Propagated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Propagated {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

/// Convierte un error propagado en su forma compartida, recuperando el Arc
/// original si venía envuelto en [`Propagated`].
pub fn into_shared(raised: DynError) -> SharedError {
    match raised.downcast::<Propagated>() {
        Ok(wrapped) => wrapped.0,
        Err(other) => SharedError::from(other),
    }
}

/// Re-emite un error compartido hacia la capa superior.
pub fn propagate(shared: SharedError) -> DynError {
    Box::new(Propagated(shared))
}
