//! Decoradores de política y la biblioteca estándar de combinadores.
//!
//! `PolicyStep` envuelve exactamente un paso interno (hoja u otro decorador)
//! e inyecta una política alrededor de su ejecución. Una cadena de
//! decoradores es una lista enlazada simple que termina en una hoja; clonar
//! el exterior clona la cadena completa, así que componer una vez y correr
//! muchas veces da estado independiente por run.
//!
//! `library` define las políticas con nombre: retry, suficiencia,
//! requisito, salto condicional, manejo de errores, recuperación de fallos,
//! ignorar y filtrado.

mod library;
mod wrapper;

pub use library::{
    error_is, filter, handle_error, ignore, recover_failure, requisite, retry_on_failure,
    retry_on_failure_for, retry_on_failure_with, skip_if, sufficient,
};
pub use wrapper::{PolicyFn, PolicyStep};
