//! Output formatting for campus policies.
//!
//! This module handles building and writing the policy document:
//! - [`policy`] - policy assembly and JSON output

mod policy;

pub use policy::{build_policy, write_policy, Condition, PolicyDocument, Statement};
