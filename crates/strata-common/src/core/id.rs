// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// External node identifier (64 bits).
///
/// Embedders may use arbitrary, sparse u64 values. Algorithms never index
/// arrays by `NodeId` directly; they map ids to dense slots first (see
/// `strata-algo`'s `IdMap`).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    fn from(val: u64) -> Self {
        Self(val)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw: u64 = s
            .parse()
            .map_err(|e| anyhow!("Invalid NodeId '{}': {}", s, e))?;
        Ok(Self(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let id = NodeId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!("42".parse::<NodeId>().unwrap(), id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("4x2".parse::<NodeId>().is_err());
        assert!("-1".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(NodeId::new(1) < NodeId::new(2));
    }
}
