use crate::schema::RecordSchema;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

/// An immutable fixed-shape value produced per aggregated position. Every
/// record holds exactly one element per schema field and shares the schema of
/// the call that produced it, so field access works both by position and by
/// name. Records implement `serde::Serialize` as a map keyed by field name so
/// aggregated rows can be handed to any serializer as-is.
#[derive(Clone)]
pub struct Record<T> {
    schema: Arc<RecordSchema>,
    values: Box<[T]>,
}

impl<T> Record<T> {
    pub(crate) fn new(schema: Arc<RecordSchema>, values: Vec<T>) -> Record<T> {
        debug_assert_eq!(values.len(), schema.arity());
        Record {
            schema,
            values: values.into_boxed_slice(),
        }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn type_name(&self) -> &str {
        self.schema.type_name()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.values.get(index)
    }

    pub fn field(&self, name: &str) -> Option<&T> {
        self.schema.position(name).map(|index| &self.values[index])
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn into_values(self) -> Vec<T> {
        self.values.into_vec()
    }

    /// Field name/value pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &T)> {
        self.schema
            .fields()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl<T> Index<usize> for Record<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.values[index]
    }
}

impl<T> Index<&str> for Record<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics when the schema has no field of that name.
    fn index(&self, name: &str) -> &T {
        match self.field(name) {
            Some(value) => value,
            None => panic!(
                "record `{}` has no field `{}`",
                self.schema.type_name(),
                name
            ),
        }
    }
}

impl<T: PartialEq> PartialEq for Record<T> {
    fn eq(&self, other: &Record<T>) -> bool {
        self.schema == other.schema && self.values == other.values
    }
}

impl<T: Eq> Eq for Record<T> {}

impl<T: fmt::Debug> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.schema.type_name());
        for (name, value) in self.fields() {
            out.field(name, value);
        }
        out.finish()
    }
}

impl<T: Serialize> Serialize for Record<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "python")]
use pyo3::{
    types::{IntoPyDict, PyDict, PyDictMethods},
    Bound, Py, PyAny, PyResult, Python,
};

/// Utility to coerce a record into a Python dictionary keyed by field name.
#[cfg(feature = "python")]
impl<'py> IntoPyDict<'py> for Record<Py<PyAny>> {
    fn into_py_dict(self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        let schema = Arc::clone(&self.schema);
        for (name, value) in schema.fields().iter().zip(self.into_values()) {
            dict.set_item(name, value)?;
        }
        Ok(dict)
    }
}

#[cfg(test)]
mod record_tests {
    use super::*;
    use crate::schema::RecordSchema;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn pair(letter: &str, number: i64) -> Record<Value> {
        let schema = Arc::new(RecordSchema::new("Pair", &["letter", "number"]));
        Record::new(schema, vec![json!(letter), json!(number)])
    }

    #[test]
    fn test_positional_and_named_access_agree() {
        let record = pair("A", 1);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get(0), record.field("letter"));
        assert_eq!(record[1], record["number"]);
    }

    #[test]
    fn test_unknown_field_is_none() {
        assert!(pair("A", 1).field("missing").is_none());
        assert!(pair("A", 1).get(2).is_none());
    }

    #[test]
    #[should_panic(expected = "no field")]
    fn test_index_panics_on_unknown_field() {
        let _ = &pair("A", 1)["missing"];
    }

    #[test]
    fn test_equality_covers_schema_and_values() {
        assert_eq!(pair("A", 1), pair("A", 1));
        assert_ne!(pair("A", 1), pair("A", 2));

        let renamed = Record::new(
            Arc::new(RecordSchema::new("Other", &["letter", "number"])),
            vec![json!("A"), json!(1)],
        );
        assert_ne!(pair("A", 1), renamed);
    }

    #[test]
    fn test_fields_iterate_in_declaration_order() {
        let names: Vec<String> = pair("A", 1)
            .fields()
            .map(|(name, _)| name.to_string())
            .collect();
        assert_eq!(names, ["letter", "number"]);
    }

    #[test]
    fn test_debug_carries_type_and_field_names() {
        let rendered = format!("{:?}", pair("A", 1));
        assert!(rendered.starts_with("Pair"));
        assert!(rendered.contains("letter"));
        assert!(rendered.contains("number"));
    }

    #[test]
    fn test_serializes_as_named_map() {
        let value = serde_json::to_value(pair("A", 1)).unwrap();
        assert_eq!(value, json!({"letter": "A", "number": 1}));
    }
}
