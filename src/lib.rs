pub mod aggregate;
pub mod errors;
mod macros;
pub mod record;
pub mod schema;

#[cfg(feature = "python")]
pub(crate) mod data_handler;

pub use aggregate::{boxed, zip_named, zip_named_fill, zip_named_fill_table, NamedZip, NamedZipFill};
pub use errors::{ZipError, ZipResult};
pub use record::Record;
pub use schema::{FieldSchema, RecordSchema, RecordType};

#[cfg(feature = "python")]
use data_handler::collect_sources;
#[cfg(feature = "python")]
use pyo3::{
    prelude::*,
    types::{IntoPyDict, PyList, PyTuple},
};

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(signature = (typename, field_names, *iterables))]
pub fn py_zip_named<'py>(
    py: Python<'py>,
    typename: &str,
    field_names: Vec<String>,
    iterables: &Bound<'py, PyTuple>,
) -> PyResult<Bound<'py, PyList>> {
    let sources = collect_sources(iterables)?;
    let zipper = match zip_named(typename, &field_names, sources) {
        Ok(zipper) => zipper,
        Err(e) => return Err(e.into()),
    };

    let records = PyList::empty(py);
    for record in zipper {
        records.append(record.into_py_dict(py)?)?;
    }
    Ok(records)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(signature = (typename, field_names, *iterables, fillvalue=None, defaults=None))]
pub fn py_zip_named_fill<'py>(
    py: Python<'py>,
    typename: &str,
    field_names: Vec<String>,
    iterables: &Bound<'py, PyTuple>,
    fillvalue: Option<Py<PyAny>>,
    defaults: Option<Vec<Py<PyAny>>>,
) -> PyResult<Bound<'py, PyList>> {
    let sources = collect_sources(iterables)?;
    // An explicit defaults table wins outright; otherwise every field shares
    // the fill value, with Python's None standing in when nothing was passed.
    let fills: Vec<Py<PyAny>> = match defaults {
        Some(table) => table,
        None => {
            let fill = match fillvalue {
                Some(value) => value,
                None => py.None(),
            };
            (0..field_names.len()).map(|_| fill.clone_ref(py)).collect()
        }
    };
    let zipper = match zip_named_fill_table(typename, &field_names, sources, fills) {
        Ok(zipper) => zipper,
        Err(e) => return Err(e.into()),
    };

    let records = PyList::empty(py);
    for record in zipper {
        records.append(record.into_py_dict(py)?)?;
    }
    Ok(records)
}

#[cfg(feature = "python")]
#[pymodule]
#[pyo3(name = "_record_zip")]
fn record_zip(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_zip_named, m)?)?;
    m.add_function(wrap_pyfunction!(py_zip_named_fill, m)?)?;
    Ok(())
}
