pub mod buffer;
#[allow(clippy::module_inception)]
pub mod pipeline;

pub use buffer::{Buffer, FrameBuffer, TermBuffer};
pub use pipeline::Pipeline;
