//! runbook-core: motor secuencial de runbooks con outcome rico por paso.
//!
//! El modelo en una línea: una `Runbook` (plantilla) clona sus pasos en un
//! `Run`, el run los recorre en orden, cada paso produce un `Outcome` y el
//! paso decisivo fija el resultado agregado. Las políticas (retry,
//! suficiencia, requisito, saltos, manejo de errores) se componen como
//! decoradores alrededor de cada paso.

pub mod baton;
pub mod clock;
pub mod constants;
pub mod errors;
pub mod outcome;
pub mod policy;
pub mod run;
pub mod step;
pub mod translate;

pub use baton::Baton;
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{DynError, Failure, FatalError, Propagated, RunError, SharedError};
pub use outcome::{Outcome, OutcomePatch, OutcomeStatus};
pub use policy::{
    error_is, filter, handle_error, ignore, recover_failure, requisite, retry_on_failure,
    retry_on_failure_for, retry_on_failure_with, skip_if, sufficient, PolicyFn, PolicyStep,
};
pub use run::{ObserverFn, Run, RunStatus, RunSummary, RunView, Runbook, StepSummary};
pub use step::{declare, SimpleStep, Step, StepLogic, StepResult, StepReturn};
pub use translate::{default_classify, error_chain, ClassifyFn, ErrorTier};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    // Humo de punta a punta: plantilla → run → reporte.
    #[test]
    fn smoke_template_to_report() {
        let book = Runbook::new("provision")
            .with_step(SimpleStep::action("reserve host", |baton, _step| {
                baton.insert("host", "db01");
                Ok(StepReturn::Value(json!("db01")))
            }))
            .with_step(skip_if("host already known", |baton, _step| {
                baton.contains("host")
            })
            .wrap(SimpleStep::action("discover host", |_baton, _step| {
                Ok(StepReturn::Value(Value::Null))
            })));

        let run = book.perform(Baton::new()).expect("run completes");

        assert_eq!(run.status(), RunStatus::Succeeded);
        assert_eq!(run.decisive_index(), Some(1));
        assert_eq!(
            run.basic_report(),
            "reserve host: OK.\ndiscover host: Skipped (host already known).\n"
        );
        // la plantilla quedó intacta
        assert_eq!(book.len(), 2);
        assert_eq!(
            book.steps()[0].outcome().status(),
            OutcomeStatus::NotStarted
        );
    }

    #[test]
    fn smoke_runs_are_independent() {
        let book = Runbook::new("counted").with_step(SimpleStep::action(
            "count",
            |baton, _step| {
                let n = baton.bump("n");
                Ok(StepReturn::Value(json!(n)))
            },
        ));

        let first = book.perform(Baton::new()).expect("first run");
        let second = book.perform(Baton::new()).expect("second run");

        // cada run arranca con su propio baton y sus propios clones
        assert_eq!(first.steps()[0].outcome().result(), &json!(1));
        assert_eq!(second.steps()[0].outcome().result(), &json!(1));
        assert_ne!(first.id(), second.id());
    }
}
