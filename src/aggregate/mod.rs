use crate::errors::{ZipError, ZipResult};
use crate::record::Record;
use crate::schema::{FieldSchema, RecordSchema};
use std::iter::{Fuse, FusedIterator};
use std::sync::Arc;

/// Strict element-wise aggregation: builds a record type from `type_name` and
/// `field_names`, then yields one record per index up to the length of the
/// shortest source. Remaining elements of longer sources are dropped. Errors
/// before producing anything when the source count does not match the field
/// count.
pub fn zip_named<S, F>(
    type_name: &str,
    field_names: &[F],
    sources: Vec<S>,
) -> ZipResult<NamedZip<S::IntoIter>>
where
    S: IntoIterator,
    F: AsRef<str>,
{
    zip_named_schema(Arc::new(RecordSchema::new(type_name, field_names)), sources)
}

/// Fill-tolerant element-wise aggregation: yields records up to the length of
/// the longest source, padding exhausted sources per field. An explicit
/// `defaults` table overrides the uniform `fill_value` outright and must match
/// the field count; with neither supplied every missing slot takes
/// `T::default()`.
pub fn zip_named_fill<S, F>(
    type_name: &str,
    field_names: &[F],
    sources: Vec<S>,
    fill_value: Option<S::Item>,
    defaults: Option<Vec<S::Item>>,
) -> ZipResult<NamedZipFill<S::IntoIter>>
where
    S: IntoIterator,
    S::Item: Clone + Default,
    F: AsRef<str>,
{
    let schema = Arc::new(RecordSchema::new(type_name, field_names));
    check_arity(&*schema, sources.len())?;
    let fills = match defaults {
        Some(table) => {
            if table.len() != schema.arity() {
                return Err(ZipError::DefaultsMismatch(schema.arity(), table.len()));
            }
            table
        }
        None => vec![fill_value.unwrap_or_default(); schema.arity()],
    };
    Ok(NamedZipFill::new(into_sources(sources), schema, fills))
}

/// Fill-tolerant aggregation with an explicit per-field fill table and no
/// `Default` requirement on the element type. The table must match the field
/// count.
pub fn zip_named_fill_table<S, F>(
    type_name: &str,
    field_names: &[F],
    sources: Vec<S>,
    fills: Vec<S::Item>,
) -> ZipResult<NamedZipFill<S::IntoIter>>
where
    S: IntoIterator,
    S::Item: Clone,
    F: AsRef<str>,
{
    let schema = Arc::new(RecordSchema::new(type_name, field_names));
    check_arity(&*schema, sources.len())?;
    if fills.len() != schema.arity() {
        return Err(ZipError::DefaultsMismatch(schema.arity(), fills.len()));
    }
    Ok(NamedZipFill::new(into_sources(sources), schema, fills))
}

pub(crate) fn zip_named_schema<S>(
    schema: Arc<RecordSchema>,
    sources: Vec<S>,
) -> ZipResult<NamedZip<S::IntoIter>>
where
    S: IntoIterator,
{
    check_arity(&*schema, sources.len())?;
    Ok(NamedZip {
        schema,
        sources: into_sources(sources),
        done: false,
    })
}

pub(crate) fn zip_fill_schema<S>(
    schema: Arc<RecordSchema>,
    sources: Vec<S>,
    fills: Vec<S::Item>,
) -> ZipResult<NamedZipFill<S::IntoIter>>
where
    S: IntoIterator,
    S::Item: Clone,
{
    check_arity(&*schema, sources.len())?;
    debug_assert_eq!(fills.len(), schema.arity());
    Ok(NamedZipFill::new(into_sources(sources), schema, fills))
}

fn check_arity(schema: &dyn FieldSchema, source_count: usize) -> ZipResult<()> {
    if source_count != schema.arity() {
        return Err(ZipError::ArityMismatch(source_count, schema.arity()));
    }
    Ok(())
}

fn into_sources<S: IntoIterator>(sources: Vec<S>) -> Vec<S::IntoIter> {
    sources.into_iter().map(IntoIterator::into_iter).collect()
}

/// Erases a source's iterator type so differently-typed iterables can share
/// one source list. Usually reached through the `sources!` macro.
pub fn boxed<'a, S>(source: S) -> Box<dyn Iterator<Item = S::Item> + 'a>
where
    S: IntoIterator,
    S::IntoIter: 'a,
{
    Box::new(source.into_iter())
}

/// Iterator over records of strictly aggregated sources. Single pass; once any
/// source runs out the iterator is exhausted for good.
#[derive(Debug)]
pub struct NamedZip<I: Iterator> {
    schema: Arc<RecordSchema>,
    sources: Vec<I>,
    done: bool,
}

impl<I: Iterator> NamedZip<I> {
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }
}

impl<I: Iterator> Iterator for NamedZip<I> {
    type Item = Record<I::Item>;

    fn next(&mut self) -> Option<Record<I::Item>> {
        // Zero sources terminate immediately rather than looping on empty records.
        if self.done || self.sources.is_empty() {
            self.done = true;
            return None;
        }
        let mut values = Vec::with_capacity(self.sources.len());
        for source in self.sources.iter_mut() {
            match source.next() {
                Some(value) => values.push(value),
                None => {
                    self.done = true;
                    return None;
                }
            }
        }
        Some(Record::new(Arc::clone(&self.schema), values))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done || self.sources.is_empty() {
            return (0, Some(0));
        }
        let mut lower = usize::MAX;
        let mut upper: Option<usize> = None;
        for source in &self.sources {
            let (source_lower, source_upper) = source.size_hint();
            lower = lower.min(source_lower);
            upper = match (upper, source_upper) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
        }
        (lower, upper)
    }
}

impl<I: Iterator> FusedIterator for NamedZip<I> {}

/// Iterator over records of fill-tolerant aggregated sources. Runs until every
/// source is exhausted, substituting the per-field fill for sources that run
/// out early. Single pass.
pub struct NamedZipFill<I: Iterator> {
    schema: Arc<RecordSchema>,
    sources: Vec<Fuse<I>>,
    fills: Vec<I::Item>,
    done: bool,
}

impl<I: Iterator> std::fmt::Debug for NamedZipFill<I>
where
    I: std::fmt::Debug,
    I::Item: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedZipFill")
            .field("schema", &self.schema)
            .field("sources", &self.sources)
            .field("fills", &self.fills)
            .field("done", &self.done)
            .finish()
    }
}

impl<I: Iterator> NamedZipFill<I> {
    fn new(sources: Vec<I>, schema: Arc<RecordSchema>, fills: Vec<I::Item>) -> NamedZipFill<I> {
        NamedZipFill {
            schema,
            sources: sources.into_iter().map(Iterator::fuse).collect(),
            fills,
            done: false,
        }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }
}

impl<I: Iterator> Iterator for NamedZipFill<I>
where
    I::Item: Clone,
{
    type Item = Record<I::Item>;

    fn next(&mut self) -> Option<Record<I::Item>> {
        if self.done || self.sources.is_empty() {
            self.done = true;
            return None;
        }
        // Exhaustion is tracked as `None` from the source itself, never as a
        // fill value, so a caller-supplied "null" fill cannot read as a missing
        // position.
        let mut live = false;
        let mut values = Vec::with_capacity(self.sources.len());
        for (index, source) in self.sources.iter_mut().enumerate() {
            match source.next() {
                Some(value) => {
                    live = true;
                    values.push(value);
                }
                None => values.push(self.fills[index].clone()),
            }
        }
        if !live {
            self.done = true;
            return None;
        }
        Some(Record::new(Arc::clone(&self.schema), values))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done || self.sources.is_empty() {
            return (0, Some(0));
        }
        let mut lower = 0_usize;
        let mut upper: Option<usize> = Some(0);
        for source in &self.sources {
            let (source_lower, source_upper) = source.size_hint();
            lower = lower.max(source_lower);
            upper = match (upper, source_upper) {
                (Some(a), Some(b)) => Some(a.max(b)),
                _ => None,
            };
        }
        (lower, upper)
    }
}

impl<I: Iterator> FusedIterator for NamedZipFill<I> where I::Item: Clone {}

#[cfg(test)]
mod strict_tests {
    use super::*;
    use crate::sources;
    use serde_json::{json, Value};

    #[test]
    fn test_stops_at_shortest_source() {
        let zipper = zip_named(
            "Pair",
            &["letter", "number"],
            vec![vec![1, 2, 3], vec![10, 20]],
        )
        .unwrap();
        let records: Vec<_> = zipper.collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["letter"], 2);
        assert_eq!(records[1]["number"], 20);
    }

    #[test]
    fn test_equal_length_sources_keep_full_length() {
        let zipper = zip_named(
            "Pair",
            &["letter", "number"],
            vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]],
        )
        .unwrap();
        assert_eq!(zipper.count(), 4);
    }

    #[test]
    fn test_yields_named_records() {
        let zipper = zip_named(
            "P",
            &["x", "y"],
            vec![vec![json!(1), json!(2)], vec![json!("a"), json!("b")]],
        )
        .unwrap();
        let records: Vec<Record<Value>> = zipper.collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["x"], json!(1));
        assert_eq!(records[0]["y"], json!("a"));
        assert_eq!(records[1]["x"], json!(2));
        assert_eq!(records[1]["y"], json!("b"));
    }

    #[test]
    fn test_arity_mismatch_rejected_before_iteration() {
        let err = zip_named(
            "Pair",
            &["letter", "number", "extra"],
            vec![vec![1], vec![2]],
        )
        .unwrap_err();
        assert_eq!(err, ZipError::ArityMismatch(2, 3));

        let err = zip_named("Pair", &["letter"], vec![vec![1], vec![2]]).unwrap_err();
        assert_eq!(err, ZipError::ArityMismatch(2, 1));
    }

    #[test]
    fn test_one_empty_source_yields_nothing() {
        let sources: Vec<Vec<i32>> = vec![vec![1, 2, 3], vec![]];
        let mut zipper = zip_named("Pair", &["a", "b"], sources).unwrap();
        assert!(zipper.next().is_none());
    }

    #[test]
    fn test_zero_sources_zero_fields_is_empty() {
        let fields: [&str; 0] = [];
        let sources: Vec<Vec<i32>> = Vec::new();
        let mut zipper = zip_named("Unit", &fields, sources).unwrap();
        assert!(zipper.next().is_none());
        assert_eq!(zipper.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_consumed_zip_stays_exhausted() {
        let mut zipper = zip_named("Pair", &["a", "b"], vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(zipper.by_ref().count(), 2);
        assert!(zipper.next().is_none());
        assert!(zipper.next().is_none());
    }

    #[test]
    fn test_sources_macro_mixes_iterable_kinds() {
        let zipper = zip_named(
            "Square",
            &["squared", "base"],
            sources![(1..4).map(|n| n * n), vec![1, 2, 3]],
        )
        .unwrap();
        let records: Vec<_> = zipper.collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2]["squared"], 9);
        assert_eq!(records[2]["base"], 3);
    }

    #[test]
    fn test_size_hint_tracks_shortest() {
        let zipper = zip_named("Pair", &["a", "b"], vec![vec![1, 2, 3], vec![4, 5]]).unwrap();
        assert_eq!(zipper.size_hint(), (2, Some(2)));
    }
}
