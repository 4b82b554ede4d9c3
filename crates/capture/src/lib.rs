pub mod frame;
pub mod source;

pub use frame::{Frame, FrameError, PixelFormat};
pub use source::{FrameSource, SyntheticSource};
