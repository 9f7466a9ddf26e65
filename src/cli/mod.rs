pub mod nodes;
pub mod render;

pub use nodes::NodesCommand;
pub use render::RenderCommand;
