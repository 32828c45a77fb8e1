//! La hoja concreta: un título más un closure de lógica.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::baton::Baton;
use crate::outcome::Outcome;
use crate::translate::{ClassifyFn, ErrorTier};

use super::declare::StepResult;
use super::definition::Step;

/// Lógica de un paso: recibe el baton compartido y una referencia al propio
/// paso (para leer título, outcome previo o marcar ignorado).
pub type StepLogic = dyn Fn(&mut Baton, &mut dyn Step) -> StepResult;

/// Paso hoja. Se crea con status `not_started` y cada ejecución reemplaza su
/// outcome por completo.
pub struct SimpleStep {
    title: String,
    logic: Arc<StepLogic>,
    outcome: Outcome,
    ignored: bool,
    run_id: Option<Uuid>,
    classifier: Option<Arc<ClassifyFn>>,
}

impl SimpleStep {
    /// Construye un paso a partir de su título y su lógica.
    pub fn action<F>(title: impl Into<String>, logic: F) -> Self
    where
        F: Fn(&mut Baton, &mut dyn Step) -> StepResult + 'static,
    {
        Self {
            title: title.into(),
            logic: Arc::new(logic),
            outcome: Outcome::default(),
            ignored: false,
            run_id: None,
            classifier: None,
        }
    }

    /// Reemplaza el clasificador de errores de este paso.
    pub fn with_classifier<C>(mut self, classifier: C) -> Self
    where
        C: Fn(&(dyn std::error::Error + 'static)) -> ErrorTier + 'static,
    {
        self.classifier = Some(Arc::new(classifier));
        self
    }

    pub fn boxed(self) -> Box<dyn Step> {
        Box::new(self)
    }
}

impl Step for SimpleStep {
    fn title(&self) -> &str {
        &self.title
    }

    fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = outcome;
    }

    fn ignored(&self) -> bool {
        self.ignored
    }

    fn set_ignored(&mut self, ignored: bool) {
        self.ignored = ignored;
    }

    fn run_id(&self) -> Option<Uuid> {
        self.run_id
    }

    fn bind_run(&mut self, run_id: Uuid) {
        self.run_id = Some(run_id);
    }

    fn call(&mut self, baton: &mut Baton) -> StepResult {
        let logic = Arc::clone(&self.logic);
        logic(baton, self)
    }

    fn classify(&self, error: &(dyn std::error::Error + 'static)) -> ErrorTier {
        match &self.classifier {
            Some(classifier) => classifier(error),
            None => crate::translate::default_classify(error),
        }
    }

    fn clone_step(&self) -> Box<dyn Step> {
        Box::new(Self {
            title: self.title.clone(),
            logic: Arc::clone(&self.logic),
            outcome: self.outcome.clone(),
            ignored: self.ignored,
            run_id: self.run_id,
            classifier: self.classifier.clone(),
        })
    }
}

impl fmt::Debug for SimpleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleStep")
            .field("title", &self.title)
            .field("status", &self.outcome.status())
            .field("ignored", &self.ignored)
            .finish()
    }
}

impl From<SimpleStep> for Box<dyn Step> {
    fn from(step: SimpleStep) -> Self {
        Box::new(step)
    }
}
