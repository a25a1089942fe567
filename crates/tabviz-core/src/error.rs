//! Error taxonomy for the conversion pipeline.
//!
//! Both variants are terminal for the request that produced them: nothing in
//! the core retries, and nothing here is fatal to the process. The HTTP layer
//! owns the mapping to status codes.

/// A failure in the size-guard → normalize → build pipeline.
///
/// Note what is deliberately absent: non-numeric cells are not an error.
/// They coerce to `0.0` in the chart builder with no warning channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// The input matched none of the three recognized table shapes.
    #[error("unsupported table format: expected {{headers, rows}}, an array of records, or a 2D array")]
    UnsupportedFormat,

    /// The pre-normalization cell-count guard tripped.
    #[error("table too large ({cells} cells, max {max})")]
    TableTooLarge { cells: usize, max: usize },
}
