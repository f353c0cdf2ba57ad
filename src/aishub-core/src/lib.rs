#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Translation of AisHub vessel records into normalized vessel deltas, and the
//! bounding box calculation used to query AisHub around the observer.

mod domain;
mod error;
mod geo;
mod ports;
mod ship_type;
mod translator;

pub mod mapping;

pub use domain::*;
pub use error::{Error, Result};
pub use geo::*;
pub use ports::*;
pub use ship_type::*;
pub use translator::*;
