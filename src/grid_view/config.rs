use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridViewConfig {
    /// Height of every body row.
    pub row_height: f32,
    /// Column width will not be lower than this value.
    pub minimum_column_width: f32,
    pub striped: bool,
}

impl Default for GridViewConfig {
    fn default() -> Self {
        GridViewConfig {
            row_height: 18.0,
            minimum_column_width: 40.0,
            striped: true,
        }
    }
}

impl super::GridView {
    pub fn config_mut(&mut self) -> &mut GridViewConfig {
        &mut self.config
    }
}
