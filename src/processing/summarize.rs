//! Range summarization.
//!
//! Collapses an inclusive address range into the minimal list of CIDR blocks
//! that exactly covers it.

use crate::models::{lo_mask, AddressError, CidrBlock, MAX_LENGTH};
use std::net::Ipv4Addr;

/// Summarize `[start, end]` into ascending, non-overlapping CIDR blocks.
///
/// Each step emits the biggest block that starts at the current address and
/// does not run past `end`.
///
/// # Examples
/// ```
/// use campus_ip_policy::processing::summarize_range;
/// use std::net::Ipv4Addr;
/// let blocks = summarize_range(Ipv4Addr::new(1, 2, 3, 0), Ipv4Addr::new(1, 2, 3, 255)).unwrap();
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].to_string(), "1.2.3.0/24");
/// ```
pub fn summarize_range(start: Ipv4Addr, end: Ipv4Addr) -> Result<Vec<CidrBlock>, AddressError> {
    if start > end {
        return Err(AddressError::InvalidRange { start, end });
    }

    // u64 so the bound can step past 255.255.255.255
    let last = u64::from(u32::from(end));
    let mut next_ip = u64::from(u32::from(start));
    let mut blocks = Vec::new();

    while next_ip <= last {
        let addr = Ipv4Addr::from(next_ip as u32);
        let mask = find_biggest_block(addr, last - next_ip + 1);
        let block = CidrBlock { addr, mask };
        log::trace!("summarize_range({start}-{end}) emit {block}");
        next_ip += block.size();
        blocks.push(block);
    }

    log::debug!(
        "summarize_range({start}-{end}) -> {} block(s)",
        blocks.len()
    );
    Ok(blocks)
}

/// Find the smallest mask (biggest block) usable at `start_ip`.
///
/// The mask is constrained by:
/// 1. The IP alignment - `start_ip` must be a valid network address for the mask
/// 2. The block must hold no more than `remaining` addresses
fn find_biggest_block(start_ip: Ipv4Addr, remaining: u64) -> u8 {
    debug_assert!(remaining > 0, "remaining[{remaining}] must be positive.");

    let min_mask_for_alignment = lo_mask(start_ip);
    // floor(log2(remaining)), at most 32 for a range of 2^32 addresses
    let fit_bits = (u64::BITS - 1 - remaining.leading_zeros()) as u8;
    let min_mask_for_size = MAX_LENGTH - fit_bits.min(MAX_LENGTH);

    min_mask_for_alignment.max(min_mask_for_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    fn cidrs(blocks: &[CidrBlock]) -> Vec<String> {
        blocks.iter().map(|b| b.to_string()).collect()
    }

    /// Check coverage, ordering, overlap and maximality of a summary.
    fn assert_exact_cover(start: Ipv4Addr, end: Ipv4Addr, blocks: &[CidrBlock]) {
        let total: u64 = blocks.iter().map(|b| b.size()).sum();
        assert_eq!(
            total,
            u64::from(u32::from(end)) - u64::from(u32::from(start)) + 1,
            "address count for {start}-{end}"
        );
        assert_eq!(blocks.first().unwrap().lo(), start);
        assert_eq!(blocks.last().unwrap().hi(), end);
        for pair in blocks.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!(
                u64::from(u32::from(a.hi())) + 1,
                u64::from(u32::from(b.lo())),
                "{a} and {b} must be adjacent"
            );
            let mergeable = a.mask == b.mask
                && a.mask > 0
                && CidrBlock::from_parts(a.addr, a.mask - 1).is_ok();
            assert!(!mergeable, "{a} and {b} could be merged");
        }
        for block in blocks {
            assert!(CidrBlock::from_parts(block.addr, block.mask).is_ok());
        }
    }

    #[test]
    fn test_single_address() {
        let blocks = summarize_range(ip("1.2.3.0"), ip("1.2.3.0")).unwrap();
        assert_eq!(cidrs(&blocks), vec!["1.2.3.0/32"]);
    }

    #[test]
    fn test_full_slash_24() {
        let blocks = summarize_range(ip("1.2.3.0"), ip("1.2.3.255")).unwrap();
        assert_eq!(cidrs(&blocks), vec!["1.2.3.0/24"]);
    }

    #[test]
    fn test_slash_24_minus_one() {
        let (start, end) = (ip("1.2.3.0"), ip("1.2.3.254"));
        let blocks = summarize_range(start, end).unwrap();
        assert_eq!(
            cidrs(&blocks),
            vec![
                "1.2.3.0/25",
                "1.2.3.128/26",
                "1.2.3.192/27",
                "1.2.3.224/28",
                "1.2.3.240/29",
                "1.2.3.248/30",
                "1.2.3.252/31",
                "1.2.3.254/32",
            ]
        );
        assert_eq!(blocks.iter().map(|b| b.size()).sum::<u64>(), 255);
        assert_exact_cover(start, end, &blocks);
    }

    #[test]
    fn test_unaligned_start() {
        let (start, end) = (ip("10.6.2.80"), ip("10.6.7.255"));
        let blocks = summarize_range(start, end).unwrap();
        assert_eq!(
            cidrs(&blocks),
            vec!["10.6.2.80/28", "10.6.2.96/27", "10.6.2.128/25", "10.6.3.0/24", "10.6.4.0/22"]
        );
        assert_exact_cover(start, end, &blocks);
    }

    #[test]
    fn test_invalid_range() {
        let err = summarize_range(ip("1.2.3.5"), ip("1.2.3.3")).unwrap_err();
        assert_eq!(
            err,
            AddressError::InvalidRange {
                start: ip("1.2.3.5"),
                end: ip("1.2.3.3")
            }
        );
    }

    #[test]
    fn test_whole_address_space() {
        let blocks = summarize_range(Ipv4Addr::UNSPECIFIED, Ipv4Addr::BROADCAST).unwrap();
        assert_eq!(cidrs(&blocks), vec!["0.0.0.0/0"]);
    }

    #[test]
    fn test_top_of_address_space() {
        let (start, end) = (ip("255.255.255.254"), Ipv4Addr::BROADCAST);
        let blocks = summarize_range(start, end).unwrap();
        assert_eq!(cidrs(&blocks), vec!["255.255.255.254/31"]);

        let blocks = summarize_range(Ipv4Addr::BROADCAST, Ipv4Addr::BROADCAST).unwrap();
        assert_eq!(cidrs(&blocks), vec!["255.255.255.255/32"]);

        let (start, end) = (ip("128.0.0.1"), Ipv4Addr::BROADCAST);
        let blocks = summarize_range(start, end).unwrap();
        assert_eq!(blocks.len(), 31);
        assert_exact_cover(start, end, &blocks);
    }

    #[test]
    fn test_address_count_property() {
        let ranges = [
            ("0.0.0.0", "0.0.0.0"),
            ("0.0.0.1", "0.0.0.14"),
            ("10.0.0.3", "10.0.1.17"),
            ("128.32.0.0", "128.32.255.255"),
            ("169.229.13.7", "169.230.0.0"),
            ("192.168.1.1", "192.168.254.254"),
            ("1.0.0.0", "254.255.255.255"),
            ("0.0.0.1", "255.255.255.254"),
        ];
        for (s, e) in ranges {
            let (start, end) = (ip(s), ip(e));
            let blocks = summarize_range(start, end).unwrap();
            assert_exact_cover(start, end, &blocks);
        }
    }

    #[test]
    fn test_summarize_parsed_range() {
        let range = crate::models::IpRange::parse("192.168.001.000", "192.168.001.127").unwrap();
        let blocks = summarize_range(range.start(), range.end()).unwrap();
        assert_eq!(cidrs(&blocks), vec!["192.168.1.0/25"]);
    }

    #[test]
    fn test_find_biggest_block() {
        // alignment limited
        assert_eq!(28, find_biggest_block(ip("10.6.2.80"), 1 << 20));
        // size limited
        assert_eq!(24, find_biggest_block(ip("10.0.0.0"), 511));
        assert_eq!(32, find_biggest_block(ip("10.0.0.0"), 1));
        assert_eq!(0, find_biggest_block(Ipv4Addr::UNSPECIFIED, 1 << 32));
    }
}
