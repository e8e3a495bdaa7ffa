pub mod graph;
pub mod link;
pub mod topology;

pub use graph::*;
pub use link::*;
pub use topology::*;
