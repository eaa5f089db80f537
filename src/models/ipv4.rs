//! IPv4 address parsing and CIDR block utilities.
//!
//! Provides [`parse_address`] for the loosely formatted endpoints found in
//! campus exports, and [`CidrBlock`] for the summarized output.

use super::error::AddressError;
use serde::Serialize;
use std::error::Error;
use std::net::Ipv4Addr;

/// Maximum length for an IPv4 prefix (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Parse a dotted-decimal token into an [`Ipv4Addr`].
///
/// Each octet is parsed as an integer first, so zero padded octets
/// (`192.168.001.010`) and whitespace around octets are accepted.
///
/// # Examples
/// ```
/// use campus_ip_policy::models::parse_address;
/// use std::net::Ipv4Addr;
/// assert_eq!(
///     parse_address("192.168.001.010").unwrap(),
///     Ipv4Addr::new(192, 168, 1, 10)
/// );
/// ```
pub fn parse_address(token: &str) -> Result<Ipv4Addr, AddressError> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 4 {
        return Err(AddressError::InvalidOctet {
            token: token.to_string(),
            octet: format!("{} components", parts.len()),
        });
    }

    let mut octets = [0u8; 4];
    for (octet, part) in octets.iter_mut().zip(parts.iter()) {
        *octet = part
            .trim()
            .parse::<u8>()
            .map_err(|_| AddressError::InvalidOctet {
                token: token.to_string(),
                octet: part.to_string(),
            })?;
    }
    log::trace!("parse_address({token}) -> {:?}", octets);

    Ok(Ipv4Addr::from(octets))
}

/// Calculate the minimum mask for an IP address based on trailing zeros.
///
/// `0.0.0.0` is aligned to every prefix, so it returns 0.
pub fn lo_mask(ip: Ipv4Addr) -> u8 {
    let trailing_zeros = u32::from(ip).trailing_zeros() as u8;
    MAX_LENGTH - trailing_zeros
}

/// An aligned CIDR block: base address plus prefix length.
///
/// Ordering is by base address first, then by prefix length.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct CidrBlock {
    /// The network (base) address, aligned to `mask`.
    pub addr: Ipv4Addr,
    /// The prefix length (0-32).
    pub mask: u8,
}

impl CidrBlock {
    /// Create a block, checking the prefix length and the base alignment.
    pub fn from_parts(addr: Ipv4Addr, mask: u8) -> Result<CidrBlock, Box<dyn Error>> {
        if mask > MAX_LENGTH {
            return Err(format!("Network length /{mask} is too long").into());
        }
        if lo_mask(addr) > mask {
            return Err(format!("Address {addr} is not aligned to /{mask}").into());
        }
        Ok(CidrBlock { addr, mask })
    }

    /// Create a new [`CidrBlock`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<CidrBlock, Box<dyn Error>> {
        let addr_cidr = addr_cidr.trim();
        let parts: Vec<&str> = addr_cidr.split('/').collect();
        if parts.len() != 2 {
            return Err(format!("Invalid address/mask {addr_cidr}").into());
        }
        let addr: Ipv4Addr = parts[0]
            .parse()
            .map_err(|_| format!("Invalid address {}", parts[0]))?;
        let mask: u8 = parts[1]
            .parse()
            .map_err(|_| format!("Invalid mask {}", parts[1]))?;
        CidrBlock::from_parts(addr, mask)
    }

    /// Number of addresses covered by the block.
    pub fn size(&self) -> u64 {
        1u64 << (MAX_LENGTH - self.mask)
    }

    /// Lowest (network) address in the block.
    pub fn lo(&self) -> Ipv4Addr {
        self.addr
    }

    /// Highest (broadcast) address in the block.
    pub fn hi(&self) -> Ipv4Addr {
        // mask <= 32 holds for every constructed block
        let host_bits = (self.size() - 1) as u32;
        Ipv4Addr::from(u32::from(self.addr) | host_bits)
    }
}

impl Serialize for CidrBlock {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl std::fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

/// An inclusive address range with `start <= end`.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub struct IpRange {
    start: Ipv4Addr,
    end: Ipv4Addr,
}

impl IpRange {
    pub fn new(start: Ipv4Addr, end: Ipv4Addr) -> Result<IpRange, AddressError> {
        if start > end {
            return Err(AddressError::InvalidRange { start, end });
        }
        Ok(IpRange { start, end })
    }

    /// Parse both endpoints with [`parse_address`].
    pub fn parse(start: &str, end: &str) -> Result<IpRange, AddressError> {
        IpRange::new(parse_address(start)?, parse_address(end)?)
    }

    pub fn start(&self) -> Ipv4Addr {
        self.start
    }

    pub fn end(&self) -> Ipv4Addr {
        self.end
    }
}
