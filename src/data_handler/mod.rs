use pyo3::prelude::*;
use pyo3::types::PyTuple;

/// Materializes each Python iterable into a vector of owned objects for the
/// core aggregation layer. Anything raised by an iterable while it is being
/// consumed propagates to the caller untouched.
pub(crate) fn collect_sources(iterables: &Bound<'_, PyTuple>) -> PyResult<Vec<Vec<Py<PyAny>>>> {
    let mut sources: Vec<Vec<Py<PyAny>>> = Vec::with_capacity(iterables.len());
    for iterable in iterables.iter() {
        let mut elements: Vec<Py<PyAny>> = Vec::new();
        for item in iterable.try_iter()? {
            elements.push(item?.unbind());
        }
        sources.push(elements);
    }
    Ok(sources)
}
