//! Campus data model.

use super::CidrBlock;

/// One campus block from the export, with its summarized address blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campus {
    /// Lower-cased short name, used as the tag value in the policy.
    pub name: String,
    /// CIDR blocks in record order.
    pub ranges: Vec<CidrBlock>,
}

impl Campus {
    pub fn new(name: &str) -> Campus {
        Campus {
            name: name.to_string(),
            ranges: vec![],
        }
    }

    /// Total number of addresses covered by the campus blocks.
    pub fn address_count(&self) -> u64 {
        self.ranges.iter().map(|b| b.size()).sum()
    }
}
