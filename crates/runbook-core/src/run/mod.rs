//! El motor de runs.
//!
//! `Runbook` es la colección-plantilla: una lista ordenada de pasos que
//! nunca se muta al ejecutar. `Run` es una ejecución: clona los pasos de la
//! plantilla, los recorre en orden y calcula el status agregado a partir del
//! paso decisivo.

mod book;
mod engine;

pub use book::Runbook;
pub use engine::{ObserverFn, Run, RunStatus, RunSummary, RunView, StepSummary};
