//! Errors raised while normalizing address ranges.

use std::fmt;
use std::net::Ipv4Addr;

/// Failure to turn a record's endpoints into CIDR blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// A component of `token` is not an integer in [0,255], or the token
    /// does not have exactly four components.
    InvalidOctet { token: String, octet: String },
    /// The range start is above the range end.
    InvalidRange { start: Ipv4Addr, end: Ipv4Addr },
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AddressError::InvalidOctet { token, octet } => {
                write!(f, "invalid octet '{octet}' in address '{token}'")
            }
            AddressError::InvalidRange { start, end } => {
                write!(f, "invalid range: start {start} is after end {end}")
            }
        }
    }
}

impl std::error::Error for AddressError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = AddressError::InvalidOctet {
            token: "1.2.3.256".to_string(),
            octet: "256".to_string(),
        };
        assert_eq!(err.to_string(), "invalid octet '256' in address '1.2.3.256'");

        let err = AddressError::InvalidRange {
            start: Ipv4Addr::new(1, 2, 3, 5),
            end: Ipv4Addr::new(1, 2, 3, 3),
        };
        assert_eq!(
            err.to_string(),
            "invalid range: start 1.2.3.5 is after end 1.2.3.3"
        );
    }
}
