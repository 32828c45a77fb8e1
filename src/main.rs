//! Demo de punta a punta: arma un runbook de despliegue simulado, lo corre
//! dos veces (camino feliz y camino con fallo) y muestra los reportes.
//!
//! Correr con `cargo run --bin runbook-demo`.

use runbook_adapters::sh;
use runbook_core::{
    declare, recover_failure, requisite, retry_on_failure, skip_if, sufficient, Baton, Failure,
    Run, Runbook, RunStatus, SimpleStep, StepReturn,
};
use serde_json::{json, Value};

/// Runbook de despliegue simulado. `flaky_releases` controla cuántas veces
/// falla la publicación antes de salir bien.
fn deploy_book(flaky_releases: i64) -> Runbook {
    Runbook::new("simulated deploy")
        .with_step(requisite().wrap(sh("shell is sane", "true")))
        .with_step(
            skip_if("cache already warm", |baton, _step| {
                baton.contains("cache_warm")
            })
            .wrap(SimpleStep::action("warm cache", |baton, _step| {
                baton.insert("cache_warm", true);
                Ok(declare::succeed("cache warmed"))
            })),
        )
        .with_step(sufficient().wrap(SimpleStep::action(
            "reuse previous artifact",
            |baton, _step| {
                if baton.contains("artifact") {
                    Ok(StepReturn::Value(json!("reused")))
                } else {
                    Ok(declare::skip("no previous artifact"))
                }
            },
        )))
        .with_step(retry_on_failure(2).wrap(SimpleStep::action(
            "publish release",
            move |baton, _step| {
                let tries = baton.bump("publish_tries");
                if tries <= flaky_releases {
                    Err(Failure::new(format!("registry timeout (attempt {tries})")).into())
                } else {
                    baton.insert("artifact", format!("release-{tries}"));
                    Ok(declare::succeed_with("published", json!({ "attempt": tries })))
                }
            },
        )))
        .with_step(
            recover_failure(|_baton, _step, outcome| {
                eprintln!("  (recover hook saw: {})", outcome.explanation());
            })
            .wrap(sh("smoke test", "true")),
        )
        .with_step(SimpleStep::action("announce", |baton, _step| {
            let artifact: String = baton.get("artifact").unwrap_or_default();
            Ok(declare::finish(format!("{artifact} is live")))
        }))
        .with_step(SimpleStep::action("never reached", |_baton, _step| {
            Ok(StepReturn::Value(Value::Null))
        }))
}

fn show(label: &str, run: &Run) {
    println!("== {label} ==");
    print!("{}", run.basic_report());
    println!(
        "status={} decisive_index={:?} halted={}",
        run.status(),
        run.decisive_index(),
        run.halted()
    );
    println!();
}

fn main() {
    // Camino feliz: la publicación falla una vez y el retry la salva.
    let happy = deploy_book(1)
        .perform(Baton::new())
        .expect("happy path completes");
    show("happy path", &happy);
    assert_eq!(happy.status(), RunStatus::Succeeded);
    assert!(happy.halted(), "finish halts the run");

    // Camino con fallo: la publicación agota los 3 intentos del retry.
    let sad = deploy_book(99)
        .perform(Baton::new())
        .expect("sad path completes");
    show("sad path", &sad);
    assert_eq!(sad.status(), RunStatus::Failed);
    assert_eq!(sad.failed_steps().len(), 1, "only publish ends up failed");

    println!("demo ok");
}
