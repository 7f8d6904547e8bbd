pub mod constraint;
pub mod entity;
pub mod model;

pub use constraint::*;
pub use entity::*;
pub use model::*;
