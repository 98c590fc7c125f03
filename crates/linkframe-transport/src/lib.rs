//! Byte channel under a linkframe link.
//!
//! The data-link layer only needs something that moves raw bytes in both
//! directions. This crate provides:
//! - [`LinkStream`], a connected `Read + Write` endpoint
//! - [`UnixLink`] to bind/connect over Unix domain sockets
//! - [`NoisyStream`] to inject deterministic bit errors on the way out

pub mod error;
pub mod noise;
pub mod stream;

#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
pub use noise::{NoiseConfig, NoisyStream};
pub use stream::LinkStream;

#[cfg(unix)]
pub use uds::UnixLink;
