//! La colección-plantilla de pasos.

use crate::baton::Baton;
use crate::errors::RunError;
use crate::step::Step;

use super::engine::Run;

/// Lista ordenada de pasos-plantilla. Cada [`Runbook::new_run`] clona el
/// contenido vigente, así que una misma plantilla puede generar cualquier
/// cantidad de runs independientes sin mutarse nunca.
#[derive(Clone)]
pub struct Runbook {
    title: String,
    steps: Vec<Box<dyn Step>>,
}

impl Runbook {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            steps: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Agrega un paso al final de la plantilla.
    pub fn push(&mut self, step: impl Into<Box<dyn Step>>) -> &mut Self {
        self.steps.push(step.into());
        self
    }

    /// Variante fluida de [`Runbook::push`] para armar la plantilla en una
    /// sola expresión.
    pub fn with_step(mut self, step: impl Into<Box<dyn Step>>) -> Self {
        self.steps.push(step.into());
        self
    }

    pub fn steps(&self) -> &[Box<dyn Step>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Crea un run nuevo sobre una copia del contenido actual.
    pub fn new_run(&self, baton: Baton) -> Run {
        Run::new(self, baton)
    }

    /// Conveniencia: crea un run, lo lleva hasta el final y lo devuelve.
    pub fn perform(&self, baton: Baton) -> Result<Run, RunError> {
        let mut run = self.new_run(baton);
        run.perform()?;
        Ok(run)
    }
}

impl std::fmt::Debug for Runbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runbook")
            .field("title", &self.title)
            .field("steps", &self.steps.len())
            .finish()
    }
}
