use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One catalogue item as extracted from its detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub price: String,
    pub rating: Rating,
    pub stock: String,
    pub description: String,
    pub product_info: ProductInfo,
}

/// Entries in encounter order; `None` marks an item whose data could not be obtained.
pub type CrawlResult = Vec<Option<BookRecord>>;

/// Header/value rows of the product information table, in row order.
///
/// A repeated header replaces the earlier value and keeps its position.
pub type ProductInfo = IndexMap<String, String>;

/// Star rating, encoded on the site as a class token word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl FromStr for Rating {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "One" => Ok(Self::One),
            "Two" => Ok(Self::Two),
            "Three" => Ok(Self::Three),
            "Four" => Ok(Self::Four),
            "Five" => Ok(Self::Five),
            other => anyhow::bail!("unknown rating word: {other:?}"),
        }
    }
}
