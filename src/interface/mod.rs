pub mod export;
pub mod render;

pub use export::{write_selection, write_selection_csv};
pub use render::{display_item, display_item_list, display_selection};
