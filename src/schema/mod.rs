use crate::aggregate::{self, NamedZip, NamedZipFill};
use crate::errors::{ZipError, ZipResult};
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A trait to define what can act as a record shape in this context: an ordered
/// list of field names, a type label and the arity derived from them. Anything
/// exposing these can drive an aggregation, no runtime type inspection needed.
pub trait FieldSchema {
    fn type_name(&self) -> &str;
    fn field_names(&self) -> &[String];
    fn arity(&self) -> usize {
        self.field_names().len()
    }
}

/// Ordered field names plus a type label. Built once per aggregation call and
/// shared by every record that call produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    type_name: String,
    fields: Vec<String>,
}

impl RecordSchema {
    /// Field names must be unique; duplicates are a caller bug and only
    /// trip an assertion in debug builds.
    pub fn new<S: AsRef<str>>(type_name: &str, field_names: &[S]) -> RecordSchema {
        let fields: Vec<String> = field_names
            .iter()
            .map(|field| field.as_ref().to_owned())
            .collect();
        debug_assert!(
            {
                let mut seen = std::collections::HashSet::new();
                fields.iter().all(|field| seen.insert(field.as_str()))
            },
            "field names must be unique"
        );
        RecordSchema {
            type_name: type_name.to_owned(),
            fields,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field == name)
    }
}

impl FieldSchema for RecordSchema {
    fn type_name(&self) -> &str {
        RecordSchema::type_name(self)
    }

    fn field_names(&self) -> &[String] {
        self.fields()
    }
}

/// A reusable record-type definition: a schema plus optional per-field default
/// values. Build it once, then aggregate any number of source sets against it
/// with `zip` or `zip_fill`. Defaults attach to the rightmost fields when fewer
/// defaults than fields are supplied, and fill in for exhausted sources during
/// fill-tolerant aggregation.
#[derive(Debug, Clone)]
pub struct RecordType<T> {
    schema: Arc<RecordSchema>,
    defaults: Vec<Option<T>>,
}

impl<T> RecordType<T> {
    pub fn new<S: AsRef<str>>(type_name: &str, field_names: &[S]) -> RecordType<T> {
        Self::from_schema(RecordSchema::new(type_name, field_names))
    }

    pub fn from_schema(schema: RecordSchema) -> RecordType<T> {
        let arity = schema.arity();
        RecordType {
            schema: Arc::new(schema),
            defaults: (0..arity).map(|_| None).collect(),
        }
    }

    /// Attach per-field defaults, aligned to the rightmost fields. Errors when
    /// more defaults than fields are supplied.
    pub fn with_defaults(mut self, defaults: Vec<T>) -> ZipResult<RecordType<T>> {
        let arity = self.schema.arity();
        if defaults.len() > arity {
            return Err(ZipError::DefaultsMismatch(arity, defaults.len()));
        }
        let offset = arity - defaults.len();
        for (i, value) in defaults.into_iter().enumerate() {
            self.defaults[offset + i] = Some(value);
        }
        Ok(self)
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn default_for(&self, index: usize) -> Option<&T> {
        self.defaults.get(index).and_then(Option::as_ref)
    }

    /// Build a single record of this type.
    ///
    /// # Panics
    ///
    /// Panics when the number of values does not match the field count.
    pub fn record(&self, values: Vec<T>) -> Record<T> {
        assert_eq!(
            values.len(),
            self.schema.arity(),
            "record `{}` takes {} values",
            self.schema.type_name(),
            self.schema.arity()
        );
        Record::new(Arc::clone(&self.schema), values)
    }

    /// Strict aggregation against this type: one record per index up to the
    /// shortest source.
    pub fn zip<S>(&self, sources: Vec<S>) -> ZipResult<NamedZip<S::IntoIter>>
    where
        S: IntoIterator<Item = T>,
    {
        aggregate::zip_named_schema(Arc::clone(&self.schema), sources)
    }

    /// Fill-tolerant aggregation against this type: runs to the longest source.
    /// Missing slots take the field's embedded default when it has one, the
    /// uniform fill value otherwise, and `T::default()` when neither is given.
    pub fn zip_fill<S>(
        &self,
        sources: Vec<S>,
        fill_value: Option<T>,
    ) -> ZipResult<NamedZipFill<S::IntoIter>>
    where
        S: IntoIterator<Item = T>,
        T: Clone + Default,
    {
        let fills: Vec<T> = self
            .defaults
            .iter()
            .map(|default| match default {
                Some(value) => value.clone(),
                None => match &fill_value {
                    Some(fill) => fill.clone(),
                    None => T::default(),
                },
            })
            .collect();
        aggregate::zip_fill_schema(Arc::clone(&self.schema), sources, fills)
    }
}

impl<T> FieldSchema for RecordType<T> {
    fn type_name(&self) -> &str {
        self.schema.type_name()
    }

    fn field_names(&self) -> &[String] {
        self.schema.fields()
    }
}
