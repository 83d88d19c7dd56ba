pub mod bar;
pub mod edge;
pub mod hierarchy;
pub mod layout;
pub mod ruler;

pub use hierarchy::HierarchyController;
pub use layout::VisibleRow;
