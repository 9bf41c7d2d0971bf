use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::catalog::{Catalog, Glyph};
use crate::error::{Result, SurveyError};

/// Number of policies every respondent ranks.
pub const RANKED_CHOICES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub title: String,
    pub description: String,
    pub focus: String,
    pub icon_name: String,
    pub examples: Option<String>,
}

impl Policy {
    pub fn glyph(&self) -> Glyph {
        Glyph::resolve(&self.icon_name)
    }

    /// Leading characters of the title, used as a chart label.
    pub fn short_name(&self) -> String {
        self.title.chars().take(15).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationData {
    pub subdistrict: String,
    pub district: String,
    pub province: String,
    pub zipcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPolicy {
    pub policy_id: String,
    pub title: String,
    pub rank: u8,
}

/// A completed ballot that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewVote {
    pub location: LocationData,
    pub choices: Vec<RankedPolicy>,
    pub comment: Option<String>,
}

impl NewVote {
    /// Builds a ballot from policy ids in rank order. The ids must be three
    /// distinct catalog entries.
    pub fn new(
        catalog: &Catalog,
        location: LocationData,
        ranked_ids: &[String],
        comment: Option<String>,
    ) -> Result<Self> {
        if ranked_ids.len() != RANKED_CHOICES {
            return Err(SurveyError::SelectionIncomplete(ranked_ids.len()));
        }

        let mut seen = HashSet::new();
        let mut choices = Vec::with_capacity(RANKED_CHOICES);
        for (index, id) in ranked_ids.iter().enumerate() {
            if !seen.insert(id.as_str()) {
                return Err(SurveyError::InvalidRanking(format!("{} is ranked twice", id)));
            }
            let policy = catalog
                .find(id)
                .ok_or_else(|| SurveyError::UnknownPolicy(id.clone()))?;
            choices.push(RankedPolicy {
                policy_id: policy.id.clone(),
                title: policy.title.clone(),
                rank: index as u8 + 1,
            });
        }

        let comment = comment
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(Self {
            location,
            choices,
            comment,
        })
    }
}

/// A stored ballot as read back from the vote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub id: Uuid,
    pub location: LocationData,
    pub choices: Vec<RankedPolicy>,
    pub comment: Option<String>,
    /// Absent when the stored value could not be parsed.
    pub created_at: Option<DateTime<Utc>>,
}

impl VoteRecord {
    pub fn from_new(vote: &NewVote, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            location: vote.location.clone(),
            choices: vote.choices.clone(),
            comment: vote.comment.clone(),
            created_at: Some(created_at),
        }
    }

    /// Title of the policy ranked at `rank`, independent of storage order.
    pub fn title_at_rank(&self, rank: u8) -> Option<&str> {
        self.choices
            .iter()
            .find(|choice| choice.rank == rank)
            .map(|choice| choice.title.as_str())
    }
}
