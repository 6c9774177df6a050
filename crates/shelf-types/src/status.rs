use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Where a book currently stands in the owner's collection.
///
/// This is a closed set: free-text statuses are rejected at parse time.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum BookStatus {
    /// On the shelf and not in use.
    #[default]
    Available,
    /// Currently being read.
    Reading,
    /// Finished.
    Read,
    /// Lent to someone else.
    Borrowed,
    /// Not owned yet.
    Wishlist,
}

impl BookStatus {
    /// Every status, in declaration order.
    pub const ALL: [BookStatus; 5] = [
        Self::Available,
        Self::Reading,
        Self::Read,
        Self::Borrowed,
        Self::Wishlist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Reading => "Reading",
            Self::Read => "Read",
            Self::Borrowed => "Borrowed",
            Self::Wishlist => "Wishlist",
        }
    }
}

impl FromStr for BookStatus {
    type Err = TypeError;

    /// Case-insensitive match against the five status names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TypeError::UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_available() {
        assert_eq!(BookStatus::default(), BookStatus::Available);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("read".parse::<BookStatus>().unwrap(), BookStatus::Read);
        assert_eq!(" WISHLIST ".parse::<BookStatus>().unwrap(), BookStatus::Wishlist);
        assert_eq!("Borrowed".parse::<BookStatus>().unwrap(), BookStatus::Borrowed);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "Lost".parse::<BookStatus>().unwrap_err();
        assert_eq!(err, TypeError::UnknownStatus("Lost".into()));
        assert!("".parse::<BookStatus>().is_err());
    }

    #[test]
    fn display_matches_wire_name() {
        for status in BookStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn all_has_five_distinct_values() {
        let mut all = BookStatus::ALL.to_vec();
        all.dedup();
        assert_eq!(all.len(), 5);
    }
}
