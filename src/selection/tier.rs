use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::elements::ElementRecord;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InterestTier {
    Primary,
    Secondary,
    #[default]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct InterestSets {
    #[serde(default)]
    pub primary: HashSet<String>,
    #[serde(default)]
    pub secondary: HashSet<String>,
}

impl InterestSets {
    pub fn new<P, S>(primary: P, secondary: S) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            primary: primary.into_iter().map(Into::into).collect(),
            secondary: secondary.into_iter().map(Into::into).collect(),
        }
    }

    pub fn classify(&self, record: &ElementRecord) -> InterestTier {
        classify(record, &self.primary, &self.secondary)
    }
}

/// Primary wins when a name appears in both sets.
pub fn classify(
    record: &ElementRecord,
    primary: &HashSet<String>,
    secondary: &HashSet<String>,
) -> InterestTier {
    if primary.contains(record.name()) {
        InterestTier::Primary
    } else if secondary.contains(record.name()) {
        InterestTier::Secondary
    } else {
        InterestTier::Other
    }
}
