use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Separates column names and needles inside a term, also denotes OR between them.
    pub delimiter: char,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig { delimiter: '|' }
    }
}
