//! Taxonomía de estados de un outcome.
//!
//! Los nueve estados cubren el ciclo completo de un paso:
//!
//! * `not_started`: el paso todavía no se ejecutó.
//! * `in_progress`: el paso empezó y dejó un checkpoint sin terminar.
//! * `succeeded`:   el paso terminó bien.
//! * `sufficient`:  terminó bien y, además, decide el run a favor aunque
//!                  fallen pasos posteriores.
//! * `finish`:      terminó bien y detiene el run; no se ejecuta nada más.
//! * `failed`:      fallo anticipado. El run continúa pero queda decidido en
//!                  contra, salvo que el paso esté marcado como ignorado.
//! * `bad`:         error fuera de los modos de fallo esperados. El run
//!                  continúa, marcado en contra.
//! * `abort`:       fallo que además detiene el run.
//! * `skipped`:     el paso no se ejecutó; `explanation` lleva la razón.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    NotStarted,
    InProgress,
    Succeeded,
    Sufficient,
    Finish,
    Failed,
    Bad,
    Abort,
    Skipped,
}

impl OutcomeStatus {
    /// Terminó bien: `succeeded`, `sufficient` o `finish`.
    pub fn succeeded(self) -> bool {
        matches!(self, Self::Succeeded | Self::Sufficient | Self::Finish)
    }

    /// Clase de fallo: `failed`, `bad` o `abort`.
    pub fn failed(self) -> bool {
        matches!(self, Self::Failed | Self::Bad | Self::Abort)
    }

    pub fn ok(self) -> bool {
        !self.failed()
    }

    pub fn bad(self) -> bool {
        matches!(self, Self::Bad)
    }

    pub fn skipped(self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// El paso ya no va a cambiar: éxito, fallo o salto.
    pub fn done(self) -> bool {
        self.succeeded() || self.failed() || self.skipped()
    }

    /// Detiene el run: `abort` o `finish`.
    pub fn halted(self) -> bool {
        matches!(self, Self::Abort | Self::Finish)
    }

    pub fn continuable(self) -> bool {
        !self.halted()
    }

    /// Decide el resultado agregado del run.
    pub fn decisive(self) -> bool {
        matches!(
            self,
            Self::Sufficient | Self::Finish | Self::Failed | Self::Bad | Self::Abort
        )
    }

    pub fn done_and_ok(self) -> bool {
        self.done() && self.ok()
    }

    /// Etiqueta humana usada por `synopsis`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Failed | Self::Abort => "Failed",
            Self::Bad => "Error",
            Self::Succeeded | Self::Sufficient | Self::Finish => "OK",
            Self::InProgress => "In progress",
            Self::NotStarted => "Not started",
            Self::Skipped => "Skipped",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Succeeded => "succeeded",
            Self::Sufficient => "sufficient",
            Self::Finish => "finish",
            Self::Failed => "failed",
            Self::Bad => "bad",
            Self::Abort => "abort",
            Self::Skipped => "skipped",
        };
        f.write_str(name)
    }
}
