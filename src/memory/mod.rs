//! Memory Query Composer and record rendering.

pub mod ask;
pub mod render;

pub use ask::ask_memory;
pub use render::NodeView;
