//! CLI mínima: arma un runbook de verificación de entorno y lo ejecuta.
//!
//! Uso: `runbook-cli demo [--strict] [--json] [--retries N]`
//!
//! Códigos de salida: 0 run exitoso, 1 run fallido, 2 uso inválido,
//! 5 error propagado (modo estricto o nivel fatal).

use runbook_adapters::{env_var_present, executable_on_path, sh};
use runbook_core::{
    retry_on_failure, skip_if, Baton, Runbook, RunView, SimpleStep, Step, StepReturn,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

/// Runbook de demostración: checks de entorno más un par de comandos.
fn demo_book(retries: u32) -> Runbook {
    Runbook::new("environment verification")
        .with_step(env_var_present("PATH is set", "PATH"))
        .with_step(executable_on_path("sh is available", "sh"))
        .with_step(
            skip_if("HOME not set", |_baton, _step| {
                std::env::var_os("HOME").is_none()
            })
            .wrap(sh("home is reachable", "test -d \"$HOME\"")),
        )
        .with_step(retry_on_failure(retries).wrap(sh("scratch dir is writable", "touch \"${TMPDIR:-/tmp}/.runbook-cli-probe\"")))
        .with_step(SimpleStep::action("record verdict", |baton, _step| {
            baton.insert("verified", true);
            Ok(StepReturn::Value(serde_json::Value::Null))
        }))
}

fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args[1] != "demo" {
        eprintln!("usage: runbook-cli demo [--strict] [--json] [--retries N]");
        std::process::exit(2);
    }

    let mut strict = false;
    let mut json = false;
    let mut retries: u32 = 1;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--strict" => strict = true,
            "--json" => json = true,
            "--retries" => {
                i += 1;
                if i < args.len() {
                    retries = args[i].parse::<u32>().unwrap_or(retries);
                }
            }
            other => {
                eprintln!("unknown flag: {other}");
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let book = demo_book(retries);
    let mut run = book.new_run(Baton::new());

    let mut progress = |view: &RunView, index: usize, step: &dyn Step, _baton: &mut Baton| {
        // segundo callback del par: el paso ya tiene outcome
        if step.outcome().status().done() {
            eprintln!("[{}/{}] {}", index + 1, view.step_count, step.synopsis());
        }
    };

    if let Err(error) = run.perform_with(strict, Some(&mut progress)) {
        eprintln!("error: {error}");
        std::process::exit(5);
    }

    if json {
        match serde_json::to_string_pretty(&run.summary()) {
            Ok(rendered) => println!("{rendered}"),
            Err(error) => {
                eprintln!("error: {error}");
                std::process::exit(5);
            }
        }
    } else {
        print!("{}", run.basic_report());
    }

    std::process::exit(if run.succeeded() { 0 } else { 1 });
}
