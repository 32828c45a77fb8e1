//! Pasos: la unidad de trabajo y su contrato.
//!
//! - `Step`: interfaz neutral que comparten hojas y decoradores; incluye la
//!   ejecución traducida (`execute`) y los predicados derivados.
//! - `SimpleStep`: la hoja concreta con lógica en un closure.
//! - `declare`: constructores de declaraciones explícitas (`succeed`,
//!   `fail`, `skip`, ...) que la lógica devuelve como retorno temprano.

pub mod declare;
pub mod definition;
pub mod simple;

pub use declare::{StepResult, StepReturn};
pub use definition::Step;
pub use simple::{SimpleStep, StepLogic};
