mod avs;
mod bitmap;
mod errors;

pub use avs::*;
pub use bitmap::*;
pub use errors::*;
