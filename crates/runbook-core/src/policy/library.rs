//! Biblioteca estándar de combinadores.
//!
//! Cada función devuelve un [`PolicyStep`] sin paso interno; se acopla con
//! [`PolicyStep::wrap`] y los decoradores se anidan libremente:
//!
//! ```
//! use runbook_core::{retry_on_failure, requisite, SimpleStep, StepReturn};
//! use serde_json::Value;
//!
//! let step = requisite().wrap(retry_on_failure(2).wrap(SimpleStep::action(
//!     "open control port",
//!     |_baton, _step| Ok(StepReturn::Value(Value::Null)),
//! )));
//! # let _ = step;
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::baton::Baton;
use crate::clock::{Clock, SystemClock};
use crate::errors::{self, SharedError};
use crate::outcome::{Outcome, OutcomeStatus};
use crate::step::{declare, Step, StepResult, StepReturn};

use super::wrapper::PolicyStep;

/// Corre el paso interno; un `succeeded` se eleva a `sufficient`, cualquier
/// otro outcome pasa sin cambios.
pub fn sufficient() -> PolicyStep {
    PolicyStep::new("Sufficient", |inner, baton| {
        let outcome = inner.execute(baton, false)?;
        let outcome = if outcome.status() == OutcomeStatus::Succeeded {
            outcome.with_status(OutcomeStatus::Sufficient)
        } else {
            outcome
        };
        Ok(StepReturn::Declared(outcome))
    })
}

/// Corre el paso interno; cualquier fallo se eleva a `abort` (detiene el
/// run), el resto pasa sin cambios.
pub fn requisite() -> PolicyStep {
    PolicyStep::new("Requisite", |inner, baton| {
        let outcome = inner.execute(baton, false)?;
        let outcome = if outcome.failed() {
            outcome.with_status(OutcomeStatus::Abort)
        } else {
            outcome
        };
        Ok(StepReturn::Declared(outcome))
    })
}

/// Evalúa el predicado antes de ejecutar: si da verdadero fuerza un
/// `skipped` con `reason` y el paso interno nunca corre.
pub fn skip_if<P>(reason: impl Into<String>, predicate: P) -> PolicyStep
where
    P: Fn(&Baton, &dyn Step) -> bool + 'static,
{
    let reason = reason.into();
    let name = format!("Skip if {reason}");
    PolicyStep::new(name, move |inner, baton| {
        if predicate(baton, &*inner) {
            Ok(declare::skip(reason.clone()))
        } else {
            inner.call(baton)
        }
    })
}

/// Matcher por tipo concreto de error, el caso común de [`handle_error`].
pub fn error_is<E: std::error::Error + 'static>() -> impl Fn(&(dyn std::error::Error + 'static)) -> bool
{
    |error| error.downcast_ref::<E>().is_some()
}

/// Corre el paso interno en modo estricto; si el error propagado satisface
/// `matcher`, el handler decide el outcome final (normalmente con una
/// declaración); si no, el error sigue su curso.
pub fn handle_error<M, H>(matcher: M, handler: H) -> PolicyStep
where
    M: Fn(&(dyn std::error::Error + 'static)) -> bool + 'static,
    H: Fn(&mut Baton, &mut dyn Step, &SharedError) -> StepResult + 'static,
{
    PolicyStep::new("Handle error", move |inner, baton| {
        match inner.execute(baton, true) {
            Ok(outcome) => Ok(StepReturn::Declared(outcome)),
            Err(raised) => {
                let shared = errors::into_shared(raised);
                let root: &(dyn std::error::Error + 'static) = shared.as_ref();
                if matcher(root) {
                    handler(baton, inner, &shared)
                } else {
                    Err(errors::propagate(shared))
                }
            }
        }
    })
}

/// Corre el paso interno; si (y sólo si) el outcome es exactamente `failed`,
/// invoca el handler como efecto secundario. El outcome original pasa sin
/// cambios.
pub fn recover_failure<H>(handler: H) -> PolicyStep
where
    H: Fn(&mut Baton, &mut dyn Step, &Outcome) + 'static,
{
    PolicyStep::new("Recover from failure", move |inner, baton| {
        let outcome = inner.execute(baton, false)?;
        if outcome.status() == OutcomeStatus::Failed {
            handler(baton, inner, &outcome);
        }
        Ok(StepReturn::Declared(outcome))
    })
}

/// Marca el paso interno como ignorado y lo corre: sus fallos dejan de
/// contar como decisivos.
pub fn ignore() -> PolicyStep {
    PolicyStep::new("Ignore failures", |inner, baton| {
        inner.set_ignored(true);
        inner.call(baton)
    })
}

/// Corre el paso interno y pasa su outcome por `transform`; lo que devuelva
/// el transform (normalizado) es el outcome final.
pub fn filter<T>(transform: T) -> PolicyStep
where
    T: Fn(Outcome) -> StepResult + 'static,
{
    PolicyStep::new("Filter outcome", move |inner, baton| {
        let outcome = inner.execute(baton, false)?;
        transform(outcome)
    })
}

/// Reintenta sobre fallo con el reloj de sistema y sin límite de tiempo.
pub fn retry_on_failure(times_to_retry: u32) -> PolicyStep {
    retry_on_failure_with(times_to_retry, None, Arc::new(SystemClock))
}

/// Reintenta sobre fallo con un presupuesto de tiempo además del tope de
/// intentos.
pub fn retry_on_failure_for(times_to_retry: u32, time_limit: Duration) -> PolicyStep {
    retry_on_failure_with(times_to_retry, Some(time_limit), Arc::new(SystemClock))
}

/// Variante con reloj inyectable.
///
/// Intenta el mismo paso interno (no se re-clona entre intentos) hasta
/// `times_to_retry + 1` veces. El bucle corta cuando el intento terminó
/// bien, cuando se agotaron los intentos, o cuando hay límite de tiempo y
/// —revisado sólo después de un intento fallido— el reloj alcanzó el corte
/// fijado en la construcción. Devuelve el outcome del intento que cortó el
/// bucle.
pub fn retry_on_failure_with(
    times_to_retry: u32,
    time_limit: Option<Duration>,
    clock: Arc<dyn Clock>,
) -> PolicyStep {
    let max_tries = times_to_retry + 1;
    let cutoff = time_limit.map(|limit| match chrono::Duration::from_std(limit) {
        Ok(delta) => clock.now() + delta,
        Err(_) => chrono::DateTime::<chrono::Utc>::MAX_UTC,
    });
    let name = match time_limit {
        Some(limit) => format!("Retry {times_to_retry} times or {}s", limit.as_secs()),
        None => format!("Retry {times_to_retry} times"),
    };

    PolicyStep::new(name, move |inner, baton| {
        let mut tries = 0u32;
        loop {
            let outcome = inner.execute(baton, false)?;
            tries += 1;
            if outcome.failed() {
                if let Some(cutoff) = cutoff {
                    if clock.now() >= cutoff {
                        return Ok(StepReturn::Declared(outcome));
                    }
                }
            }
            if outcome.succeeded() || tries >= max_tries {
                return Ok(StepReturn::Declared(outcome));
            }
        }
    })
}
