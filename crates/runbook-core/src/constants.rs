//! Constantes del motor.
//!
//! Textos que el motor escribe en outcomes forzados cuando un run ya quedó
//! decidido o detenido. Forman parte del contrato observable (aparecen en
//! `synopsis` y en reportes), así que se mantienen estables.

/// Razón registrada en los pasos saltados después de un `abort`.
pub const SKIP_REASON_ABORTED: &str = "Run aborted by prior step";

/// Razón registrada en los pasos saltados después de un `finish` exitoso.
pub const SKIP_REASON_SATISFIED: &str = "Satisfied by prior step";
