//! Domain models for campus IP policies.
//!
//! This module contains the core data structures used throughout the application:
//! - [`CidrBlock`] - aligned IPv4 block in CIDR notation
//! - [`IpRange`] - inclusive start/end address pair
//! - [`Campus`] - a campus and its summarized blocks
//! - [`AddressError`] - parse and range failures

mod campus;
mod error;
mod ipv4;

// Re-export public types
pub use campus::Campus;
pub use error::AddressError;
pub use ipv4::{lo_mask, parse_address, CidrBlock, IpRange, MAX_LENGTH};
