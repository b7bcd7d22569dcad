//! Month/region filtering over the record store.

use crate::errors::{AppError, AppResult};
use crate::types::CallRecord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Token that disables filtering on one axis.
pub const ALL_TOKEN: &str = "all";

/// Values selected on one filter axis.
///
/// `All` mirrors the "select all" option of the filter lists. The default
/// option lists never produce it, so in normal operation it is unreachable;
/// it is kept as a pass-through branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T: Ord> {
    All,
    Only(BTreeSet<T>),
}

impl<T: Ord> Selection<T> {
    pub fn only<I: IntoIterator<Item = T>>(values: I) -> Self {
        Selection::Only(values.into_iter().collect())
    }

    pub fn none() -> Self {
        Selection::Only(BTreeSet::new())
    }

    pub fn contains(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(set) => set.contains(value),
        }
    }
}

impl<T> Selection<T>
where
    T: Ord + FromStr,
{
    /// Parse selection tokens. Any `all` token selects everything.
    pub fn from_tokens<I, S>(tokens: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        let mut all = false;
        for token in tokens {
            let token = token.as_ref().trim();
            if token.is_empty() {
                continue;
            }
            if token.eq_ignore_ascii_case(ALL_TOKEN) {
                all = true;
                continue;
            }
            let value = token
                .parse::<T>()
                .map_err(|_| AppError::InvalidSelection(token.to_string()))?;
            set.insert(value);
        }
        Ok(if all { Selection::All } else { Selection::Only(set) })
    }

    /// Comma-separated form used on the command line and in query strings.
    /// An empty string is the empty selection.
    pub fn parse_list(s: &str) -> AppResult<Self> {
        Self::from_tokens(s.split(','))
    }
}

impl<T: Ord + Serialize> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selection::All => serializer.collect_seq([ALL_TOKEN]),
            Selection::Only(set) => serializer.collect_seq(set),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Token {
    Int(i64),
    Text(String),
}

impl<'de, T> Deserialize<'de> for Selection<T>
where
    T: Ord + FromStr,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tokens = Vec::<Token>::deserialize(deserializer)?;
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|t| match t {
                Token::Int(i) => i.to_string(),
                Token::Text(s) => s,
            })
            .collect();
        Selection::from_tokens(tokens).map_err(serde::de::Error::custom)
    }
}

/// Records whose month and region are both selected. Borrows from the
/// input and never reorders or modifies it.
pub fn filter<'a>(
    records: &'a [CallRecord],
    months: &Selection<u32>,
    regions: &Selection<i32>,
) -> Vec<&'a CallRecord> {
    records
        .iter()
        .filter(|r| months.contains(&r.month) && regions.contains(&r.region_code))
        .collect()
}
