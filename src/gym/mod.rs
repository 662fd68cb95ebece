pub mod classroom;
pub mod side_scroller;

pub use classroom::{Classroom, ClassroomAction, ClassroomConfig};
pub use side_scroller::{
    Level, ObjectKind, ScrollerAction, SideScroller, SideScrollerConfig, WorldObject,
};

/// The attribute-based classroom variant
pub type AttributeEnvironment = Classroom;

/// The spatial side-scrolling variant
pub type SpatialEnvironment = SideScroller;
