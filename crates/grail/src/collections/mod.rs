//! Collection state shared by widget behaviors.

mod selection;

pub use selection::{SelectionChange, SelectionModel, SelectionModelConfig};
