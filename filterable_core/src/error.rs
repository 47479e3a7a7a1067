use crate::RowIdx;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A term targets a column the host does not have. Rows processed before this one already
    /// carry their new visibility.
    #[error("unknown column \"{column}\" referenced by filter (row {})", .row.0)]
    UnknownColumn { column: String, row: RowIdx },
}
