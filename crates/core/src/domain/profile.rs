use serde::{Deserialize, Serialize};

use crate::domain::product::{normalize_tag, parse_concern_tags, ConcernTags, SkinType};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinProfile {
    pub skin_type: SkinType,
    pub concern_tags: ConcernTags,
}

impl SkinProfile {
    pub fn new(skin_type: SkinType) -> Self {
        Self { skin_type, concern_tags: ConcernTags::new() }
    }

    /// Builds a profile from operator input. An unknown skin-type token is not
    /// an error; see [`SkinType::parse_lenient`].
    pub fn from_tokens<I, S>(skin_type: &str, concerns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let concern_tags =
            concerns.into_iter().filter_map(|concern| normalize_tag(concern.as_ref())).collect();
        Self { skin_type: SkinType::parse_lenient(skin_type), concern_tags }
    }

    pub fn with_concerns(mut self, raw: &str) -> Self {
        self.concern_tags.extend(parse_concern_tags(raw));
        self
    }

    pub fn intersects(&self, tags: &ConcernTags) -> bool {
        !self.concern_tags.is_disjoint(tags)
    }
}
