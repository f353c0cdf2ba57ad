mod ais;
mod delta;
mod position;

pub use ais::*;
pub use delta::*;
pub use position::*;

pub(crate) use ais::as_number;
