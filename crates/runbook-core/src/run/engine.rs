//! Una ejecución secuencial de un runbook.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::baton::Baton;
use crate::constants::{SKIP_REASON_ABORTED, SKIP_REASON_SATISFIED};
use crate::errors::{self, RunError};
use crate::outcome::{Outcome, OutcomeStatus};
use crate::step::Step;

use super::book::Runbook;

/// Status agregado de un run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    NotStarted,
    InProgress,
    Succeeded,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Snapshot barato del run que reciben los observadores. Reemplaza la
/// referencia directa al run, de modo que el callback no puede re-entrar en
/// el motor.
#[derive(Debug, Clone)]
pub struct RunView {
    pub run_id: Uuid,
    pub title: String,
    pub cursor: usize,
    pub step_count: usize,
    pub status: RunStatus,
    pub decisive_index: Option<usize>,
    pub halted: bool,
    pub started: bool,
}

/// Callback de observación: se invoca dos veces por paso (antes y después de
/// ejecutarlo), siempre en línea dentro del avance. El lifetime permite
/// observadores que toman prestado estado local del caller.
pub type ObserverFn<'a> = dyn FnMut(&RunView, usize, &dyn Step, &mut Baton) + 'a;

/// Una ejecución. Posee clones profundos de los pasos de la plantilla, el
/// baton compartido y la contabilidad del avance.
///
/// Invariantes: el cursor sólo crece; el índice decisivo, una vez fijado, no
/// cambia; `halted`, una vez encendido, no se apaga.
pub struct Run {
    id: Uuid,
    title: String,
    steps: Vec<Box<dyn Step>>,
    baton: Baton,
    cursor: usize,
    decisive_index: Option<usize>,
    halted: bool,
    started: bool,
}

impl Run {
    pub(crate) fn new(book: &Runbook, baton: Baton) -> Self {
        let id = Uuid::new_v4();
        let mut steps: Vec<Box<dyn Step>> =
            book.steps().iter().map(|step| step.clone_step()).collect();
        for step in steps.iter_mut() {
            step.bind_run(id);
        }
        Self {
            id,
            title: book.title().to_string(),
            steps,
            baton,
            cursor: 0,
            decisive_index: None,
            halted: false,
            started: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[Box<dyn Step>] {
        &self.steps
    }

    pub fn baton(&self) -> &Baton {
        &self.baton
    }

    pub fn baton_mut(&mut self) -> &mut Baton {
        &mut self.baton
    }

    /// Consume el run y devuelve el baton, con lo que los pasos hayan dejado
    /// en él.
    pub fn into_baton(self) -> Baton {
        self.baton
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Hay un paso decisivo registrado.
    pub fn decided(&self) -> bool {
        self.decisive_index.is_some()
    }

    /// No quedan pasos por avanzar.
    pub fn done(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    pub fn in_progress(&self) -> bool {
        self.started && !self.done()
    }

    pub fn decisive_index(&self) -> Option<usize> {
        self.decisive_index
    }

    pub fn decisive_step(&self) -> Option<&dyn Step> {
        self.decisive_index
            .and_then(|index| self.steps.get(index))
            .map(|step| step.as_ref())
    }

    /// Decidido en contra: el paso decisivo no quedó hecho-y-bien.
    pub fn failed(&self) -> bool {
        self.decided()
            && !self
                .decisive_step()
                .map(|step| step.outcome().done_and_ok())
                .unwrap_or(false)
    }

    /// Decidido a favor. Un run sin pasos es un éxito vacuo, incondicional.
    pub fn succeeded(&self) -> bool {
        if self.steps.is_empty() {
            return true;
        }
        self.decided()
            && self
                .decisive_step()
                .map(|step| step.outcome().done_and_ok())
                .unwrap_or(false)
    }

    pub fn status(&self) -> RunStatus {
        if self.steps.is_empty() {
            RunStatus::Succeeded
        } else if !self.started {
            RunStatus::NotStarted
        } else if !self.decided() {
            RunStatus::InProgress
        } else if self.succeeded() {
            RunStatus::Succeeded
        } else {
            RunStatus::Failed
        }
    }

    /// Avanza un paso sin modo estricto ni observador.
    pub fn next(&mut self) -> Result<(), RunError> {
        self.next_with(false, None)
    }

    /// Avanza un paso.
    ///
    /// El orden del avance es fijo: marca comenzado, observador previo,
    /// forzado de ignorado si el run ya quedó decidido, ejecución (o salto
    /// forzado si está detenido), registro del índice decisivo, registro del
    /// freno, observador posterior y avance del cursor. Si la ejecución
    /// propaga un error (modo estricto o nivel fatal), el cursor no avanza.
    pub fn next_with(
        &mut self,
        strict: bool,
        mut observer: Option<&mut ObserverFn<'_>>,
    ) -> Result<(), RunError> {
        if self.done() {
            return Err(RunError::AlreadyPerformed);
        }

        self.started = true;
        let index = self.cursor;

        let view = self.view();
        if let Some(observer) = observer.as_deref_mut() {
            observer(&view, index, self.steps[index].as_ref(), &mut self.baton);
        }

        // Un run decidido arrastra el resto de los pasos como ignorados;
        // eso solo no impide ejecutarlos, el freno es `halted`.
        if self.decided() {
            self.steps[index].set_ignored(true);
        }

        if !self.halted {
            let step = &mut self.steps[index];
            match step.execute(&mut self.baton, strict) {
                Ok(outcome) => {
                    tracing::debug!(
                        run = %self.id,
                        step = step.title(),
                        status = %outcome.status(),
                        "step executed"
                    );
                }
                Err(raised) => {
                    return Err(RunError::StepRaised(errors::into_shared(raised)));
                }
            }
        } else {
            let reason = if self.failed() {
                SKIP_REASON_ABORTED
            } else {
                SKIP_REASON_SATISFIED
            };
            self.steps[index].set_outcome(Outcome::new(
                OutcomeStatus::Skipped,
                reason,
                serde_json::Value::Null,
            ));
        }

        if self.steps[index].decisive() && self.decisive_index.is_none() {
            self.decisive_index = Some(index);
        }
        // El freno no pasa por la marca de ignorado: un abort/finish
        // ignorado igual detiene el run.
        if self.steps[index].outcome().halted() {
            self.halted = true;
            tracing::debug!(run = %self.id, step = self.steps[index].title(), "run halted");
        }

        let view = self.view();
        if let Some(observer) = observer.as_deref_mut() {
            observer(&view, index, self.steps[index].as_ref(), &mut self.baton);
        }

        self.cursor += 1;
        if self.cursor >= self.steps.len() && self.decisive_index.is_none() && !self.steps.is_empty()
        {
            // Un run que termina sin outcome decisivo queda decidido por su
            // último paso.
            self.decisive_index = Some(self.steps.len() - 1);
        }
        Ok(())
    }

    /// Lleva el run hasta el final sin modo estricto.
    pub fn perform(&mut self) -> Result<(), RunError> {
        while !self.done() {
            self.next()?;
        }
        Ok(())
    }

    /// Lleva el run hasta el final con modo estricto y observador opcionales.
    pub fn perform_with(
        &mut self,
        strict: bool,
        mut observer: Option<&mut ObserverFn<'_>>,
    ) -> Result<(), RunError> {
        while !self.done() {
            self.next_with(strict, observer.as_deref_mut())?;
        }
        Ok(())
    }

    /// Pasos cuyo outcome es literalmente `failed` (no `bad` ni `abort`).
    pub fn failed_steps(&self) -> Vec<&dyn Step> {
        self.steps
            .iter()
            .filter(|step| step.outcome().status() == OutcomeStatus::Failed)
            .map(|step| step.as_ref())
            .collect()
    }

    /// Reporte plano: la sinopsis de cada paso, una por línea.
    pub fn basic_report(&self) -> String {
        let mut report = String::new();
        for step in &self.steps {
            report.push_str(&step.synopsis());
            report.push('\n');
        }
        report
    }

    /// Resumen serializable del run, para reportes estructurados.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.id,
            title: self.title.clone(),
            status: self.status(),
            steps: self
                .steps
                .iter()
                .enumerate()
                .map(|(index, step)| StepSummary {
                    index,
                    title: step.title().to_string(),
                    status: step.outcome().status(),
                    synopsis: step.synopsis(),
                })
                .collect(),
        }
    }

    fn view(&self) -> RunView {
        RunView {
            run_id: self.id,
            title: self.title.clone(),
            cursor: self.cursor,
            step_count: self.steps.len(),
            status: self.status(),
            decisive_index: self.decisive_index,
            halted: self.halted,
            started: self.started,
        }
    }
}

impl fmt::Debug for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Run")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("cursor", &self.cursor)
            .field("status", &self.status())
            .finish()
    }
}

/// Resumen serializable de un run completo.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub title: String,
    pub status: RunStatus,
    pub steps: Vec<StepSummary>,
}

/// Una línea del resumen, por paso.
#[derive(Debug, Clone, Serialize)]
pub struct StepSummary {
    pub index: usize,
    pub title: String,
    pub status: OutcomeStatus,
    pub synopsis: String,
}
