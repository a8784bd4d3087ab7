use thiserror::Error;

pub type ZipResult<T> = Result<T, ZipError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ZipError {
    #[error("Unequal number of input sequences ({0}) and field names ({1})")]
    ArityMismatch(usize, usize),
    #[error("Unequal number of field names ({0}) and default values ({1})")]
    DefaultsMismatch(usize, usize),
}

#[cfg(feature = "python")]
pub(crate) mod py_errors {
    use super::*;
    use pyo3::{exceptions, PyErr};

    impl Into<PyErr> for ZipError {
        fn into(self) -> PyErr {
            let err_msg = self.to_string();
            exceptions::PyValueError::new_err(err_msg)
        }
    }
}
