//! Error types and the warnings container of batch operations.
//!
//! None of the matching operations fail. Problems with single records are
//! collected as warnings in a [`PassResult`] and the batch goes on.

use thiserror::Error;

pub use crate::adapter::AdaptError;
pub use crate::config::ConfigError;
pub use crate::pantry::StoreError;
pub use crate::scale::ScaleError;

/// Output of a batch operation with the warnings generated along the way
#[derive(Debug)]
pub struct PassResult<T, W = Warning> {
    output: T,
    warnings: Vec<W>,
}

impl<T, W> PassResult<T, W> {
    pub(crate) fn new(output: T, warnings: Vec<W>) -> Self {
        Self { output, warnings }
    }

    /// Check if the result has warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get the output
    pub fn output(&self) -> &T {
        &self.output
    }

    /// Get the warnings
    pub fn warnings(&self) -> &[W] {
        &self.warnings
    }

    /// Transform into the ouput discarding warnings
    pub fn into_output(self) -> T {
        self.output
    }

    /// Transform into warnings discarding output
    pub fn into_warnings(self) -> Vec<W> {
        self.warnings
    }

    /// Get output and warnings in a tuple
    pub fn into_tuple(self) -> (T, Vec<W>) {
        (self.output, self.warnings)
    }

    /// Map the inner output
    pub fn map<F, O>(self, f: F) -> PassResult<O, W>
    where
        F: FnOnce(T) -> O,
    {
        PassResult {
            output: f(self.output),
            warnings: self.warnings,
        }
    }
}

/// A record that was skipped in a batch
#[derive(Debug, Error)]
#[error("record {index} skipped: {source}")]
pub struct Warning {
    /// Position of the record in the input
    pub index: usize,
    #[source]
    pub source: AdaptError,
}
