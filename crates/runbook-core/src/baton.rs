//! Contexto compartido entre pasos (el "baton").
//!
//! Un run entrega el mismo baton, por referencia mutable, a cada paso,
//! política, predicado y observador. Es un objeto JSON plano con accesores
//! tipados vía serde; no impone disciplina de locking porque el motor es
//! estrictamente secuencial.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Baton {
    values: Map<String, Value>,
}

impl Baton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta un valor serializable bajo `key`, reemplazando el anterior.
    pub fn insert(&mut self, key: &str, value: impl Serialize) {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.values.insert(key.to_string(), value);
    }

    /// Lee y deserializa el valor bajo `key`, si existe y tiene la forma
    /// esperada.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Acceso crudo al `Value` almacenado.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Incrementa un contador entero bajo `key` y devuelve el nuevo valor.
    /// Un valor ausente o de otro tipo cuenta como cero.
    pub fn bump(&mut self, key: &str) -> i64 {
        let next = self.get::<i64>(key).unwrap_or(0) + 1;
        self.insert(key, next);
        next
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
