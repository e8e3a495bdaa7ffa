pub mod engine;
pub mod hop_table;
pub mod messages;
pub mod registry;
pub mod router;

pub use engine::*;
pub use hop_table::*;
pub use messages::*;
pub use registry::*;
pub use router::*;
