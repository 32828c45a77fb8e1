//! El decorador: un paso que envuelve a otro.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::baton::Baton;
use crate::errors::RunError;
use crate::outcome::Outcome;
use crate::step::{Step, StepResult};
use crate::translate::{ClassifyFn, ErrorTier};

/// Política de un decorador: decide si, cómo y cuántas veces invocar al paso
/// interno, y cómo transformar el outcome resultante.
pub type PolicyFn = dyn Fn(&mut dyn Step, &mut Baton) -> StepResult;

/// Paso decorador. Satisface el mismo contrato que una hoja; toda capacidad
/// que no redefine (título, outcome, marca de ignorado, handle del run) se
/// reenvía al paso interno, de modo que el outcome final siempre queda
/// persistido sobre la hoja.
pub struct PolicyStep {
    name: String,
    policy: Arc<PolicyFn>,
    inner: Option<Box<dyn Step>>,
    // Estado de respaldo mientras no hay paso interno acoplado.
    detached_outcome: Outcome,
    detached_ignored: bool,
    detached_run: Option<Uuid>,
    classifier: Option<Arc<ClassifyFn>>,
}

impl PolicyStep {
    pub fn new<P>(name: impl Into<String>, policy: P) -> Self
    where
        P: Fn(&mut dyn Step, &mut Baton) -> StepResult + 'static,
    {
        Self {
            name: name.into(),
            policy: Arc::new(policy),
            inner: None,
            detached_outcome: Outcome::default(),
            detached_ignored: false,
            detached_run: None,
            classifier: None,
        }
    }

    /// Nombre de la política (el título sigue siendo el del paso interno).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_classifier<C>(mut self, classifier: C) -> Self
    where
        C: Fn(&(dyn std::error::Error + 'static)) -> ErrorTier + 'static,
    {
        self.classifier = Some(Arc::new(classifier));
        self
    }

    /// Acopla `inner` en el hueco vacío más profundo de la cadena y devuelve
    /// el decorador listo para encadenar o registrar.
    ///
    /// # Panics
    ///
    /// Acoplar por debajo de una hoja es un error de programación y aborta.
    pub fn wrap(mut self, inner: impl Into<Box<dyn Step>>) -> Self {
        if self.attach_inner(inner.into()).is_err() {
            panic!("cannot attach a step below a leaf step");
        }
        self
    }

    pub fn boxed(self) -> Box<dyn Step> {
        Box::new(self)
    }
}

impl Step for PolicyStep {
    fn title(&self) -> &str {
        match &self.inner {
            Some(inner) => inner.title(),
            None => &self.name,
        }
    }

    fn outcome(&self) -> &Outcome {
        match &self.inner {
            Some(inner) => inner.outcome(),
            None => &self.detached_outcome,
        }
    }

    fn set_outcome(&mut self, outcome: Outcome) {
        match &mut self.inner {
            Some(inner) => inner.set_outcome(outcome),
            None => self.detached_outcome = outcome,
        }
    }

    fn ignored(&self) -> bool {
        match &self.inner {
            Some(inner) => inner.ignored(),
            None => self.detached_ignored,
        }
    }

    fn set_ignored(&mut self, ignored: bool) {
        match &mut self.inner {
            Some(inner) => inner.set_ignored(ignored),
            None => self.detached_ignored = ignored,
        }
    }

    fn run_id(&self) -> Option<Uuid> {
        match &self.inner {
            Some(inner) => inner.run_id(),
            None => self.detached_run,
        }
    }

    fn bind_run(&mut self, run_id: Uuid) {
        match &mut self.inner {
            Some(inner) => inner.bind_run(run_id),
            None => self.detached_run = Some(run_id),
        }
    }

    /// Invocar un decorador es correr su política contra el paso interno.
    fn call(&mut self, baton: &mut Baton) -> StepResult {
        let policy = Arc::clone(&self.policy);
        let inner = self.inner.as_deref_mut().ok_or_else(|| {
            Box::new(RunError::Internal(format!(
                "policy '{}' has no inner step",
                self.name
            ))) as crate::errors::DynError
        })?;
        policy(inner, baton)
    }

    fn classify(&self, error: &(dyn std::error::Error + 'static)) -> ErrorTier {
        match (&self.classifier, &self.inner) {
            (Some(classifier), _) => classifier(error),
            (None, Some(inner)) => inner.classify(error),
            (None, None) => crate::translate::default_classify(error),
        }
    }

    fn attach_inner(&mut self, inner: Box<dyn Step>) -> Result<(), Box<dyn Step>> {
        match &mut self.inner {
            None => {
                self.inner = Some(inner);
                Ok(())
            }
            Some(existing) => existing.attach_inner(inner),
        }
    }

    fn clone_step(&self) -> Box<dyn Step> {
        Box::new(Self {
            name: self.name.clone(),
            policy: Arc::clone(&self.policy),
            inner: self.inner.as_ref().map(|inner| inner.clone_step()),
            detached_outcome: self.detached_outcome.clone(),
            detached_ignored: self.detached_ignored,
            detached_run: self.detached_run,
            classifier: self.classifier.clone(),
        })
    }
}

impl fmt::Display for PolicyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(inner) => write!(f, "<{}>({})", self.name, inner.title()),
            None => write!(f, "<{}>", self.name),
        }
    }
}

impl fmt::Debug for PolicyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyStep")
            .field("name", &self.name)
            .field("title", &self.title())
            .field("status", &self.outcome().status())
            .finish()
    }
}

impl From<PolicyStep> for Box<dyn Step> {
    fn from(step: PolicyStep) -> Self {
        Box::new(step)
    }
}
