use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// The fixed set of players, each owning exactly one portfolio.
///
/// Declaration order is the display order, and `Ord` follows it so
/// `BTreeMap<Owner, _>` iterates columns left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Owner {
    Tom,
    Joe,
    Nic,
}

impl Owner {
    /// Every owner, in display order.
    pub const ALL: [Owner; 3] = [Owner::Tom, Owner::Joe, Owner::Nic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Owner::Tom => "Tom",
            Owner::Joe => "Joe",
            Owner::Nic => "Nic",
        }
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Owner {
    type Err = CoreError;

    /// Case-insensitive match on the owner name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Owner::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownOwner(s.to_string()))
    }
}
