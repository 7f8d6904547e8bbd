pub mod axis_box;
pub mod boolean;
pub mod extrude;
pub mod mesh;
pub mod types;

pub use axis_box::AxisBox;
pub use boolean::{apply_boolean, subtract, union, BooleanKind};
pub use extrude::extrude_tool;
pub use mesh::{build_box_mesh, MeshData};
pub use types::*;
