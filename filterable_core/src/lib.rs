use serde::{Deserialize, Serialize};

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod host;
pub mod term;

pub use config::FilterConfig;
pub use engine::{FilterEngine, TermMut};
pub use error::FilterError;
pub use grid::MemoryGrid;
pub use host::FilterHost;
pub use term::FilterTerm;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ColumnUid(pub u32);

/// Row position in the grid, including hidden rows.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RowIdx(pub usize);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct CellCoord {
    pub row: RowIdx,
    pub col_uid: ColumnUid,
}

impl From<(RowIdx, ColumnUid)> for CellCoord {
    fn from(value: (RowIdx, ColumnUid)) -> Self {
        CellCoord {
            row: value.0,
            col_uid: value.1,
        }
    }
}

#[derive(
    strum::EnumIter, strum::Display, PartialEq, Copy, Clone, Debug, Default, Serialize, Deserialize,
)]
pub enum Separator {
    #[default]
    Auto,
    Comma,
    Tab,
    Semicolon,
}

impl Separator {
    /// `None` for [`Separator::Auto`].
    pub fn as_byte(&self) -> Option<u8> {
        match self {
            Separator::Auto => None,
            Separator::Comma => Some(b','),
            Separator::Tab => Some(b'\t'),
            Separator::Semicolon => Some(b';'),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CsvImporterConfig {
    pub separator: Separator,
    pub skip_first_rows: usize,
    pub has_headers: bool,
}

impl Default for CsvImporterConfig {
    fn default() -> Self {
        CsvImporterConfig {
            separator: Default::default(),
            skip_first_rows: 0,
            has_headers: true,
        }
    }
}
