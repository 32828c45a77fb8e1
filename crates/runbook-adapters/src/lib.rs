//! runbook-adapters: pasos concretos para runbooks de setup y verificación.
//!
//! Este crate provee los pasos reusables que un runbook típico necesita:
//! - `steps::command`: ejecución de procesos externos, con la traducción
//!   exit-status → outcome (`failed` anticipado, nunca `bad`).
//! - `steps::checks`: verificaciones de entorno (variables, rutas,
//!   ejecutables en PATH) que fallan de forma anticipada y explicable.
//!
//! El core sólo conoce `SimpleStep` y su lógica; aquí empaquetamos lógica
//! concreta detrás de constructores con nombre.

pub mod steps;

pub use steps::checks::{env_var_present, executable_on_path, path_exists};
pub use steps::command::{run_command, sh, CommandError};
