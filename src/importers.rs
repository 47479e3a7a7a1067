pub mod csv;

pub use self::csv::{load_csv, ImportError};
