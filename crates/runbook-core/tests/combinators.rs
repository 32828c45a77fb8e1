//! La biblioteca de combinadores, de a uno y compuesta.

use std::sync::Arc;

use runbook_core::{
    declare, error_is, filter, handle_error, ignore, recover_failure, requisite, retry_on_failure,
    retry_on_failure_with, skip_if, sufficient, Baton, Failure, ManualClock, OutcomeStatus,
    Runbook, RunStatus, SimpleStep, Step, StepReturn,
};
use serde_json::Value;

/// Paso que falla hasta agotar `failures_before_success` intentos.
fn flaky_step(title: &str, failures_before_success: i64) -> SimpleStep {
    let key = format!("tries:{title}");
    SimpleStep::action(title.to_string(), move |baton, _step| {
        let tries = baton.bump(&key);
        if tries <= failures_before_success {
            Err(Failure::new(format!("attempt {tries} failed")).into())
        } else {
            Ok(declare::succeed(format!("attempt {tries} worked")))
        }
    })
}

fn tries_of(baton: &Baton, title: &str) -> i64 {
    baton.get::<i64>(&format!("tries:{title}")).unwrap_or(0)
}

#[test]
fn sufficient_upgrades_plain_success_only() {
    let book = Runbook::new("sufficient")
        .with_step(sufficient().wrap(SimpleStep::action("fast path", |_baton, _step| {
            Ok(StepReturn::Value(Value::Null))
        })))
        .with_step(sufficient().wrap(SimpleStep::action("skipped path", |_baton, _step| {
            Ok(declare::skip("not applicable"))
        })));
    let mut run = book.new_run(Baton::new());
    run.next().expect("first step");

    assert_eq!(run.steps()[0].outcome().status(), OutcomeStatus::Sufficient);
    // el run ya quedó decidido a favor; el segundo paso corre ignorado
    run.perform().expect("rest of run");
    assert_eq!(run.steps()[1].outcome().status(), OutcomeStatus::Skipped);
    assert_eq!(run.status(), RunStatus::Succeeded);
}

#[test]
fn requisite_turns_failure_into_abort() {
    let book = Runbook::new("requisite")
        .with_step(requisite().wrap(SimpleStep::action("must pass", |_baton, _step| {
            Err(Failure::new("it did not").into())
        })))
        .with_step(SimpleStep::action("later", |_baton, _step| {
            Ok(StepReturn::Value(Value::Null))
        }));
    let run = book.perform(Baton::new()).expect("run completes");

    assert_eq!(run.steps()[0].outcome().status(), OutcomeStatus::Abort);
    assert!(run.halted());
    assert_eq!(
        run.steps()[1].outcome().explanation(),
        "Run aborted by prior step"
    );
    assert_eq!(run.status(), RunStatus::Failed);
}

#[test]
fn requisite_passes_success_through() {
    let book = Runbook::new("requisite ok").with_step(requisite().wrap(SimpleStep::action(
        "must pass",
        |_baton, _step| Ok(declare::succeed("fine")),
    )));
    let run = book.perform(Baton::new()).expect("run completes");
    assert_eq!(run.steps()[0].outcome().status(), OutcomeStatus::Succeeded);
    assert_eq!(run.status(), RunStatus::Succeeded);
}

#[test]
fn skip_if_never_invokes_the_inner_step() {
    let book = Runbook::new("skip")
        .with_step(
            skip_if("already provisioned", |baton, _step| {
                baton.contains("provisioned")
            })
            .wrap(flaky_step("provision", 99)),
        );
    let mut baton = Baton::new();
    baton.insert("provisioned", true);
    let run = book.perform(baton).expect("run completes");

    assert_eq!(tries_of(run.baton(), "provision"), 0);
    assert_eq!(run.steps()[0].outcome().status(), OutcomeStatus::Skipped);
    assert_eq!(
        run.steps()[0].outcome().explanation(),
        "already provisioned"
    );
}

#[test]
fn skip_if_false_runs_the_inner_logic_raw() {
    let book = Runbook::new("no skip").with_step(
        skip_if("never", |_baton, _step| false).wrap(SimpleStep::action(
            "work",
            |_baton, _step| Ok(declare::succeed("did the work")),
        )),
    );
    let run = book.perform(Baton::new()).expect("run completes");
    assert_eq!(run.steps()[0].outcome().status(), OutcomeStatus::Succeeded);
    assert_eq!(run.steps()[0].outcome().explanation(), "did the work");
}

#[test]
fn handle_error_matches_and_the_handler_decides() {
    let book = Runbook::new("handled").with_step(
        handle_error(error_is::<Failure>(), |_baton, _step, error| {
            Ok(declare::succeed(format!("recovered from: {error}")))
        })
        .wrap(SimpleStep::action("throws", |_baton, _step| {
            Err(Failure::new("transient").into())
        })),
    );
    let run = book.perform(Baton::new()).expect("run completes");

    let outcome = run.steps()[0].outcome();
    assert_eq!(outcome.status(), OutcomeStatus::Succeeded);
    assert_eq!(outcome.explanation(), "recovered from: transient");
    assert_eq!(run.status(), RunStatus::Succeeded);
}

#[test]
fn handle_error_lets_unmatched_errors_continue_their_course() {
    let book = Runbook::new("unhandled").with_step(
        handle_error(error_is::<std::io::Error>(), |_baton, _step, _error| {
            Ok(declare::succeed("io recovered"))
        })
        .wrap(SimpleStep::action("throws", |_baton, _step| {
            Err(Failure::new("not io").into())
        })),
    );
    let run = book.perform(Baton::new()).expect("run completes");

    // el error no coincidió: el traductor del decorador lo absorbe con su
    // clasificación original (Failure → failed)
    assert_eq!(run.steps()[0].outcome().status(), OutcomeStatus::Failed);
    assert_eq!(run.status(), RunStatus::Failed);
}

#[test]
fn recover_failure_runs_only_on_exactly_failed() {
    let touched = Arc::new(std::sync::atomic::AtomicUsize::new(0));

    let for_failed = Arc::clone(&touched);
    let book = Runbook::new("recover")
        .with_step(
            recover_failure(move |_baton, _step, outcome| {
                assert_eq!(outcome.status(), OutcomeStatus::Failed);
                for_failed.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            })
            .wrap(SimpleStep::action("fails", |_baton, _step| {
                Err(Failure::new("boom").into())
            })),
        );
    let run = book.perform(Baton::new()).expect("run completes");

    assert_eq!(touched.load(std::sync::atomic::Ordering::SeqCst), 1);
    // el outcome original pasa sin cambios
    assert_eq!(run.steps()[0].outcome().status(), OutcomeStatus::Failed);
}

#[test]
fn recover_failure_ignores_bad_and_abort() {
    let touched = Arc::new(std::sync::atomic::AtomicUsize::new(0));

    let for_bad = Arc::clone(&touched);
    let book = Runbook::new("no recover")
        .with_step(
            recover_failure(move |_baton, _step, _outcome| {
                for_bad.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            })
            .wrap(SimpleStep::action("defect", |_baton, _step| {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "bug").into())
            })),
        )
        .with_step(
            recover_failure({
                let for_abort = Arc::clone(&touched);
                move |_baton, _step, _outcome| {
                    for_abort.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                }
            })
            .wrap(SimpleStep::action("aborts", |_baton, _step| {
                Ok(declare::abort("stop"))
            })),
        );
    let _run = book.perform(Baton::new()).expect("run completes");

    assert_eq!(touched.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[test]
fn ignored_failures_stop_counting_as_decisive() {
    let book = Runbook::new("ignored")
        .with_step(ignore().wrap(SimpleStep::action("best effort", |_baton, _step| {
            Err(Failure::new("meh").into())
        })))
        .with_step(SimpleStep::action("real work", |_baton, _step| {
            Ok(StepReturn::Value(Value::Null))
        }));
    let run = book.perform(Baton::new()).expect("run completes");

    let first = &run.steps()[0];
    assert!(first.ignored());
    assert_eq!(first.outcome().status(), OutcomeStatus::Failed);
    assert!(!first.decisive());

    // nadie decidió antes del final: decide el último paso, que terminó bien
    assert_eq!(run.decisive_index(), Some(1));
    assert_eq!(run.status(), RunStatus::Succeeded);
    assert_eq!(run.failed_steps().len(), 1);
}

#[test]
fn ignored_abort_still_halts_the_run() {
    let book = Runbook::new("ignored abort")
        .with_step(ignore().wrap(SimpleStep::action("guard", |_baton, _step| {
            Ok(declare::abort("stop everything"))
        })))
        .with_step(SimpleStep::action("later", |_baton, _step| {
            Ok(StepReturn::Value(Value::Null))
        }));
    let run = book.perform(Baton::new()).expect("run completes");

    assert!(run.halted());
    // el abort ignorado no decide, así que el salto se reporta como
    // satisfecho y el run termina decidido por su último paso
    assert_eq!(
        run.steps()[1].outcome().explanation(),
        "Satisfied by prior step"
    );
    assert_eq!(run.status(), RunStatus::Succeeded);
}

#[test]
fn filter_transforms_the_final_outcome() {
    let book = Runbook::new("filtered").with_step(
        filter(|outcome| {
            if outcome.failed() {
                Ok(declare::skip("demoted to skip"))
            } else {
                Ok(StepReturn::Declared(outcome))
            }
        })
        .wrap(SimpleStep::action("fails", |_baton, _step| {
            Err(Failure::new("boom").into())
        })),
    );
    let run = book.perform(Baton::new()).expect("run completes");

    assert_eq!(run.steps()[0].outcome().status(), OutcomeStatus::Skipped);
    assert_eq!(run.status(), RunStatus::Succeeded);
}

#[test]
fn retry_exhausts_attempts_and_returns_the_last_failure() {
    let book = Runbook::new("retry").with_step(retry_on_failure(2).wrap(flaky_step("never", 99)));
    let run = book.perform(Baton::new()).expect("run completes");

    // maxRetries=2 → exactamente 3 invocaciones sobre la misma instancia
    assert_eq!(tries_of(run.baton(), "never"), 3);
    assert_eq!(run.steps()[0].outcome().status(), OutcomeStatus::Failed);
    assert_eq!(run.steps()[0].outcome().explanation(), "attempt 3 failed");
    assert_eq!(run.status(), RunStatus::Failed);
}

#[test]
fn retry_stops_at_the_first_success() {
    let book = Runbook::new("retry ok").with_step(retry_on_failure(2).wrap(flaky_step("once", 1)));
    let run = book.perform(Baton::new()).expect("run completes");

    assert_eq!(tries_of(run.baton(), "once"), 2);
    assert_eq!(run.steps()[0].outcome().status(), OutcomeStatus::Succeeded);
    assert_eq!(run.status(), RunStatus::Succeeded);
}

#[test]
fn retry_time_budget_is_checked_only_after_a_failing_attempt() {
    let clock = Arc::new(ManualClock::starting_at(chrono::Utc::now()));

    // cada intento fallido consume 6 segundos del presupuesto de 10
    let ticking = Arc::clone(&clock);
    let step = SimpleStep::action("slow and flaky", move |baton, _step| {
        baton.bump("tries:slow");
        ticking.advance(std::time::Duration::from_secs(6));
        Err(Failure::new("still failing").into())
    });

    let book = Runbook::new("retry cutoff").with_step(
        retry_on_failure_with(9, Some(std::time::Duration::from_secs(10)), clock).wrap(step),
    );
    let run = book.perform(Baton::new()).expect("run completes");

    // tras el segundo intento el reloj pasó el corte: no hay tercer intento
    assert_eq!(run.baton().get::<i64>("tries:slow"), Some(2));
    assert_eq!(run.steps()[0].outcome().status(), OutcomeStatus::Failed);
}

#[test]
fn combinators_nest_and_attach_to_the_innermost_slot() {
    // requisite ∘ retry ∘ hoja, encadenado con wrap sucesivos
    let composed = requisite()
        .wrap(retry_on_failure(1))
        .wrap(flaky_step("nested", 1));

    let book = Runbook::new("nested").with_step(composed);
    let run = book.perform(Baton::new()).expect("run completes");

    assert_eq!(tries_of(run.baton(), "nested"), 2);
    assert_eq!(run.steps()[0].outcome().status(), OutcomeStatus::Succeeded);
    assert_eq!(run.status(), RunStatus::Succeeded);
}

#[test]
fn nested_requisite_aborts_when_retries_run_out() {
    let composed = requisite()
        .wrap(retry_on_failure(1))
        .wrap(flaky_step("doomed", 99));

    let book = Runbook::new("nested abort")
        .with_step(composed)
        .with_step(SimpleStep::action("later", |_baton, _step| {
            Ok(StepReturn::Value(Value::Null))
        }));
    let run = book.perform(Baton::new()).expect("run completes");

    assert_eq!(tries_of(run.baton(), "doomed"), 2);
    assert_eq!(run.steps()[0].outcome().status(), OutcomeStatus::Abort);
    assert!(run.halted());
    assert_eq!(run.status(), RunStatus::Failed);
}

#[test]
fn cloned_policy_chains_keep_independent_state() {
    let book =
        Runbook::new("independent").with_step(retry_on_failure(3).wrap(flaky_step("shared", 1)));

    let first = book.perform(Baton::new()).expect("first run");
    let second = book.perform(Baton::new()).expect("second run");

    assert_eq!(first.status(), RunStatus::Succeeded);
    assert_eq!(second.status(), RunStatus::Succeeded);

    // cada run clona la cadena completa: los contadores no se mezclan
    let first_baton = first.into_baton();
    assert_eq!(tries_of(&first_baton, "shared"), 2);
    assert_eq!(tries_of(second.baton(), "shared"), 2);
}

#[test]
fn policy_title_and_outcome_delegate_to_the_leaf() {
    let step = sufficient().wrap(SimpleStep::action("the leaf", |_baton, _step| {
        Ok(StepReturn::Value(Value::Null))
    }));
    assert_eq!(step.title(), "the leaf");
    assert_eq!(step.outcome().status(), OutcomeStatus::NotStarted);
    assert_eq!(step.to_string(), "<Sufficient>(the leaf)");
}
