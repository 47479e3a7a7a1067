pub mod filter_bar;
pub mod grid_view;
pub mod importers;
pub mod util;

pub use filter_bar::FilterBar;
pub use grid_view::GridView;
pub use filterable_core;
