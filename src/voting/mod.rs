pub mod ranked;
pub mod region;

use serde::Serialize;

use crate::catalog::Glyph;
use crate::models::VoteRecord;
use region::{Region, RegionFilter};

/// Which records take part in a tally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VoteFilter {
    #[default]
    All,
    Province(String),
    Region(Region),
}

impl VoteFilter {
    pub fn matches(&self, vote: &VoteRecord) -> bool {
        match self {
            VoteFilter::All => true,
            VoteFilter::Province(province) => vote.location.province == *province,
            VoteFilter::Region(region) => RegionFilter::Only(*region).matches(&vote.location),
        }
    }

    /// Province filter from a query value, where `all` or nothing means no filter.
    pub fn province(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("all") => VoteFilter::All,
            Some(province) => VoteFilter::Province(province.to_string()),
        }
    }
}

impl From<RegionFilter> for VoteFilter {
    fn from(filter: RegionFilter) -> Self {
        match filter {
            RegionFilter::All => VoteFilter::All,
            RegionFilter::Only(region) => VoteFilter::Region(region),
        }
    }
}

// Score of one policy in a tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyScore {
    pub policy_id: String,
    pub title: String,
    pub short_name: String,
    pub focus: String,
    pub glyph: Glyph,
    pub score: u32,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Every catalog policy, highest score first.
    pub scores: Vec<PolicyScore>,
    /// Records that passed the filter.
    pub respondents: usize,
    pub total_points: u32,
}

impl Tally {
    pub fn top(&self, n: usize) -> &[PolicyScore] {
        &self.scores[..n.min(self.scores.len())]
    }

    pub fn score_of(&self, policy_id: &str) -> u32 {
        self.scores
            .iter()
            .find(|s| s.policy_id == policy_id)
            .map_or(0, |s| s.score)
    }
}
