//! Job record pairing a content identifier with a transaction identifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of pending aggregation work.
///
/// The persisted field names are `cid` and `txID`; any other object shape is rejected on load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregatorJob {
    pub cid: String,
    #[serde(rename = "txID")]
    pub tx_id: String,
}

impl AggregatorJob {
    pub fn new(cid: impl Into<String>, tx_id: impl Into<String>) -> Self {
        Self {
            cid: cid.into(),
            tx_id: tx_id.into(),
        }
    }

    /// Check the composite key: `cid` against the first argument, `txID` against the second
    pub fn matches(&self, cid: &str, tx_id: &str) -> bool {
        self.cid == cid && self.tx_id == tx_id
    }
}

impl fmt::Display for AggregatorJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cid, self.tx_id)
    }
}
