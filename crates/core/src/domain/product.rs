use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Cleanser,
    Toner,
    Serum,
    Moisturizer,
    Sunscreen,
    Exfoliant,
}

impl Category {
    /// Allocation order used by the budget allocator.
    pub const CANONICAL_ORDER: [Category; 6] = [
        Category::Cleanser,
        Category::Toner,
        Category::Serum,
        Category::Moisturizer,
        Category::Sunscreen,
        Category::Exfoliant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cleanser => "Cleanser",
            Self::Toner => "Toner",
            Self::Serum => "Serum",
            Self::Moisturizer => "Moisturizer",
            Self::Sunscreen => "Sunscreen",
            Self::Exfoliant => "Exfoliant",
        }
    }

    /// Resolves free-text catalog categories such as "Gel Cleanser" or
    /// "SPF 50 sunscreen" by case-insensitive containment. Canonical order
    /// decides when several names appear in the same label.
    pub fn resolve(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return None;
        }

        Self::CANONICAL_ORDER
            .into_iter()
            .find(|category| normalized.contains(&category.as_str().to_ascii_lowercase()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::resolve(value).ok_or_else(|| {
            format!(
                "unknown category `{}` \
                 (expected cleanser|toner|serum|moisturizer|sunscreen|exfoliant)",
                value.trim()
            )
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkinType {
    Oily,
    Dry,
    Combination,
    Sensitive,
    Normal,
    /// Universal marker: the product suits every skin type.
    All,
}

impl SkinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oily => "Oily",
            Self::Dry => "Dry",
            Self::Combination => "Combination",
            Self::Sensitive => "Sensitive",
            Self::Normal => "Normal",
            Self::All => "All",
        }
    }

    pub fn parse_strict(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "oily" => Some(Self::Oily),
            "dry" => Some(Self::Dry),
            "combination" | "combo" => Some(Self::Combination),
            "sensitive" => Some(Self::Sensitive),
            "normal" => Some(Self::Normal),
            "all" | "any" => Some(Self::All),
            _ => None,
        }
    }

    /// Profile-side parsing. Unrecognized tokens fall back to the universal
    /// marker so the profile only matches products sold for every skin type.
    pub fn parse_lenient(value: &str) -> Self {
        Self::parse_strict(value).unwrap_or(Self::All)
    }

    pub fn accepts(&self, product_skin_type: SkinType) -> bool {
        product_skin_type == SkinType::All || product_skin_type == *self
    }
}

impl fmt::Display for SkinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased, trimmed concern labels ("acne", "pigmentation", ...).
pub type ConcernTags = BTreeSet<String>;

pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    (!tag.is_empty()).then_some(tag)
}

/// Splits a delimited concern field (`,`, `;` or `|`) into normalized tags.
pub fn parse_concern_tags(raw: &str) -> ConcernTags {
    raw.split([',', ';', '|']).filter_map(normalize_tag).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub brand: String,
    pub name: String,
    pub category: Category,
    pub skin_type: SkinType,
    pub concern_tags: ConcernTags,
    pub price: u64,
}

impl Product {
    pub fn mentions_concern(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.concern_tags.iter().any(|tag| tag.contains(&needle))
    }

    pub fn name_mentions(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}
