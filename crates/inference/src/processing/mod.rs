pub mod decode;
pub mod pre;
