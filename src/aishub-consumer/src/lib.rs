#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Periodically queries AisHub for the vessels around the observer and emits
//! them as normalized vessel deltas.

pub mod aishub;
pub mod error;
pub mod observer;
pub mod poller;
pub mod settings;
pub mod startup;
