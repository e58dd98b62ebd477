//! Problem instance and candidate types.
//!
//! Instances come either from the whitespace-separated text format
//! (`n capacity` followed by `n` pairs of `value weight`) or from JSON.

use std::io::{BufReader, Read};
use std::str::{FromStr, SplitAsciiWhitespace};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::error::{KnapsackError, MalformedInstance, Result};

/// A single item. Its identity is its position in the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub value: u32,
    pub weight: u32,
}

impl Item {
    pub fn new(value: u32, weight: u32) -> Self {
        Self { value, weight }
    }
}

/// The items and capacity of one knapsack problem
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProblemInstance {
    pub capacity: u64,
    pub items: Vec<Item>,
}

impl ProblemInstance {
    pub fn new(capacity: u64, items: Vec<Item>) -> Self {
        Self { capacity, items }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when nothing can be carried, so the optimum is 0
    pub fn is_trivial(&self) -> bool {
        self.items.is_empty() || self.capacity == 0
    }

    /// Sum of all item weights
    pub fn total_weight(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.weight)).sum()
    }

    /// Sum of all item values
    pub fn total_value(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.value)).sum()
    }

    /// Parse the textual form `n capacity` then `n` lines of `value weight`.
    ///
    /// Line breaks carry no meaning; any whitespace separates tokens. Tokens
    /// left over after the last item are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = Tokens::new(text);

        let n: usize = tokens.next("item count")?;
        let capacity: u64 = tokens.next("capacity")?;

        let mut items = Vec::with_capacity(n.min(1 << 20));
        for index in 0..n {
            let value: u32 = tokens.next_for_item("value", index)?;
            let weight: u32 = tokens.next_for_item("weight", index)?;
            items.push(Item::new(value, weight));
        }

        let trailing = tokens.remaining();
        if trailing > 0 {
            warn!(tokens = trailing, "Ignoring trailing input after the last item");
        }

        debug!(items = n, capacity, "Parsed problem instance");
        Ok(Self { capacity, items })
    }

    /// Read a whole stream and parse it as text.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buffer = String::new();
        reader
            .read_to_string(&mut buffer)
            .map_err(|e| KnapsackError::io("Failed to read problem instance", e))?;
        Self::parse(&buffer)
    }

    /// Parse the JSON form `{"capacity": .., "items": [{"value": .., "weight": ..}]}`.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a JSON instance from a stream.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(BufReader::new(reader))?)
    }
}

/// A proposed solution: the value it claims and the items it picks
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub claimed_value: u64,
    pub indices: SmallVec<[usize; 16]>,
}

impl Candidate {
    pub fn new(claimed_value: u64, indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            claimed_value,
            indices: indices.into_iter().collect(),
        }
    }
}

/// Whitespace tokenizer that reports what it was looking for on failure
struct Tokens<'a> {
    inner: SplitAsciiWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_ascii_whitespace(),
        }
    }

    fn next<T: FromStr>(&mut self, expected: &str) -> std::result::Result<T, MalformedInstance> {
        let token = self
            .inner
            .next()
            .ok_or_else(|| MalformedInstance::MissingToken {
                expected: expected.to_string(),
            })?;
        token.parse().map_err(|_| MalformedInstance::InvalidToken {
            token: token.to_string(),
            expected: expected.to_string(),
        })
    }

    fn next_for_item<T: FromStr>(
        &mut self,
        field: &str,
        index: usize,
    ) -> std::result::Result<T, MalformedInstance> {
        self.next(&format!("{field} of item {index}"))
    }

    fn remaining(self) -> usize {
        self.inner.count()
    }
}
