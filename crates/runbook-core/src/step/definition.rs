//! Contrato neutral de un paso.
//!
//! `Step` es la interfaz que el motor de runs consume. La implementan la
//! hoja (`SimpleStep`) y el decorador (`PolicyStep`), de modo que ambos son
//! intercambiables y anidables. Los métodos provistos incluyen la traducción
//! error→outcome de `execute` y los predicados derivados; un decorador
//! reenvía el resto de las capacidades a su paso interno.

use uuid::Uuid;

use crate::baton::Baton;
use crate::errors::{self, DynError, SharedError};
use crate::outcome::Outcome;
use crate::translate::{self, ErrorTier};

use super::declare::StepResult;

pub trait Step {
    fn title(&self) -> &str;

    /// Outcome vigente. Se reemplaza por completo en cada ejecución.
    fn outcome(&self) -> &Outcome;

    /// Reemplazo total del outcome (la actualización en bloque).
    fn set_outcome(&mut self, outcome: Outcome);

    fn ignored(&self) -> bool;

    fn set_ignored(&mut self, ignored: bool);

    /// Handle no-dueño del run que clonó este paso; sólo introspección.
    fn run_id(&self) -> Option<Uuid>;

    fn bind_run(&mut self, run_id: Uuid);

    /// Invocación cruda de la lógica, sin traducción de errores. El motor y
    /// los decoradores usan `execute`; `call` queda para políticas que
    /// quieren interponerse antes de la traducción.
    fn call(&mut self, baton: &mut Baton) -> StepResult;

    /// Clasifica un error crudo en su nivel de severidad. Por defecto aplica
    /// [`translate::default_classify`]; las hojas y decoradores construidos
    /// con un clasificador propio lo sobreescriben.
    fn classify(&self, error: &(dyn std::error::Error + 'static)) -> ErrorTier {
        translate::default_classify(error)
    }

    /// Acopla un paso interno en el hueco vacío más profundo de la cadena.
    /// Una hoja no tiene hueco: devuelve el paso rechazado.
    fn attach_inner(&mut self, inner: Box<dyn Step>) -> Result<(), Box<dyn Step>> {
        Err(inner)
    }

    /// Clon profundo; en un decorador clona toda la cadena envuelta.
    fn clone_step(&self) -> Box<dyn Step>;

    /// Una pasada completa de ejecución: invoca la lógica, normaliza o
    /// clasifica el resultado y persiste el outcome sobre el paso antes de
    /// devolverlo o de propagar el error.
    ///
    /// Niveles de error:
    /// - recuperable → outcome `failed`; se propaga sólo bajo `strict`.
    /// - defecto → outcome `bad`; se propaga sólo bajo `strict`.
    /// - fatal → outcome `bad` y propagación incondicional; este nivel nunca
    ///   se absorbe en silencio.
    fn execute(&mut self, baton: &mut Baton, strict: bool) -> Result<Outcome, DynError> {
        match self.call(baton) {
            Ok(produced) => {
                let outcome = Outcome::from_return(produced);
                self.set_outcome(outcome.clone());
                Ok(outcome)
            }
            Err(raised) => {
                let shared: SharedError = errors::into_shared(raised);
                let tier = self.classify(shared.as_ref());
                let outcome = translate::raised_outcome(tier, &shared);
                self.set_outcome(outcome.clone());
                if tier == ErrorTier::Fatal || strict {
                    Err(errors::propagate(shared))
                } else {
                    Ok(outcome)
                }
            }
        }
    }

    fn relevant(&self) -> bool {
        !self.ignored()
    }

    /// Predicado puro sobre el outcome: no mira la marca de ignorado.
    fn can_continue(&self) -> bool {
        self.outcome().continuable()
    }

    /// Un paso ignorado nunca es decisivo, aunque su outcome lo sea. La
    /// asimetría con `can_continue` es deliberada: un `abort` ignorado sigue
    /// deteniendo el run pero no lo decide.
    fn decisive(&self) -> bool {
        !self.ignored() && self.outcome().decisive()
    }

    /// Línea de reporte: `"{título}: {etiqueta}"` más la explicación entre
    /// paréntesis cuando existe.
    fn synopsis(&self) -> String {
        let outcome = self.outcome();
        let label = outcome.status().label();
        if outcome.explanation().is_empty() {
            format!("{}: {}.", self.title(), label)
        } else {
            let ignored_suffix = if self.ignored() && outcome.failed() {
                " (Ignored)"
            } else {
                ""
            };
            format!(
                "{}: {} ({}){}.",
                self.title(),
                label,
                outcome.explanation(),
                ignored_suffix
            )
        }
    }
}

impl Clone for Box<dyn Step> {
    fn clone(&self) -> Self {
        self.clone_step()
    }
}
