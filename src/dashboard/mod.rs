use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::feed::Snapshot;
use crate::models::{LocationData, VoteRecord};
use crate::thai_time;
use crate::voting::ranked::calculate_scores;
use crate::voting::region::RegionFilter;
use crate::voting::{PolicyScore, VoteFilter};

const PUBLIC_TOP: usize = 5;
const MONITOR_TOP: usize = 10;
const PREVIEW_ROWS: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    #[serde(flatten)]
    pub score: PolicyScore,
    pub picked_by_you: bool,
}

/// Results page shown to a respondent after voting.
#[derive(Debug, Clone, Serialize)]
pub struct PublicResults {
    pub national: Vec<LeaderboardEntry>,
    pub province: String,
    pub provincial: Vec<LeaderboardEntry>,
    pub loaded: bool,
}

impl PublicResults {
    pub fn build(
        catalog: &Catalog,
        snapshot: &Snapshot,
        location: &LocationData,
        picked: &[String],
    ) -> Self {
        let flag = |score: &PolicyScore| LeaderboardEntry {
            score: score.clone(),
            picked_by_you: picked.iter().any(|id| *id == score.policy_id),
        };

        let national = calculate_scores(catalog, &snapshot.votes, &VoteFilter::All);
        let provincial = calculate_scores(
            catalog,
            &snapshot.votes,
            &VoteFilter::Province(location.province.clone()),
        );

        Self {
            national: national.top(PUBLIC_TOP).iter().map(flag).collect(),
            province: location.province.clone(),
            provincial: provincial
                .scores
                .iter()
                .filter(|s| s.score > 0)
                .take(PUBLIC_TOP)
                .map(flag)
                .collect(),
            loaded: snapshot.loaded,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionOption {
    pub id: &'static str,
    pub name: &'static str,
}

/// Internal monitoring board.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorBoard {
    pub region: RegionOption,
    pub regions: Vec<RegionOption>,
    pub top: Vec<PolicyScore>,
    pub scores: Vec<PolicyScore>,
    pub respondents: usize,
    pub total_points: u32,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl MonitorBoard {
    pub fn build(catalog: &Catalog, snapshot: &Snapshot, region: RegionFilter) -> Self {
        let tally = calculate_scores(catalog, &snapshot.votes, &VoteFilter::from(region));
        Self {
            region: option(region),
            regions: region_options(),
            top: tally.top(MONITOR_TOP).to_vec(),
            respondents: tally.respondents,
            total_points: tally.total_points,
            scores: tally.scores,
            refreshed_at: snapshot.refreshed_at,
        }
    }
}

fn option(filter: RegionFilter) -> RegionOption {
    RegionOption {
        id: filter.id(),
        name: filter.label(),
    }
}

pub fn region_options() -> Vec<RegionOption> {
    use crate::voting::region::Region;

    [
        RegionFilter::All,
        RegionFilter::Only(Region::North),
        RegionFilter::Only(Region::Northeast),
        RegionFilter::Only(Region::Central),
        RegionFilter::Only(Region::South),
        RegionFilter::Only(Region::Bangkok),
    ]
    .into_iter()
    .map(option)
    .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewRow {
    pub id: Uuid,
    pub date: String,
    pub time: String,
    pub location: LocationData,
    pub ranked_titles: [String; 3],
    pub comment: Option<String>,
}

impl PreviewRow {
    fn from_record(vote: &VoteRecord) -> Self {
        let (date, time) = match vote.created_at {
            Some(at) => (thai_time::date(at), thai_time::time(at)),
            None => (thai_time::NOT_AVAILABLE.to_string(), String::new()),
        };
        let title = |rank| vote.title_at_rank(rank).unwrap_or_default().to_string();
        Self {
            id: vote.id,
            date,
            time,
            location: vote.location.clone(),
            ranked_titles: [title(1), title(2), title(3)],
            comment: vote.comment.clone(),
        }
    }
}

/// Record browser for the analytics team.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsView {
    pub loading: bool,
    pub province: String,
    pub provinces: Vec<String>,
    pub total: usize,
    pub matching: usize,
    pub preview: Vec<PreviewRow>,
}

impl AnalyticsView {
    pub fn build(snapshot: &Snapshot, filter: &VoteFilter) -> Self {
        let provinces: BTreeSet<&str> = snapshot
            .votes
            .iter()
            .map(|v| v.location.province.as_str())
            .filter(|p| !p.is_empty())
            .collect();
        let matching = filtered(snapshot, filter);

        Self {
            loading: !snapshot.loaded,
            province: match filter {
                VoteFilter::Province(p) => p.clone(),
                _ => "all".to_string(),
            },
            provinces: provinces.into_iter().map(str::to_string).collect(),
            total: snapshot.votes.len(),
            matching: matching.len(),
            preview: matching
                .iter()
                .take(PREVIEW_ROWS)
                .map(|v| PreviewRow::from_record(v))
                .collect(),
        }
    }
}

/// Records of `snapshot` that pass `filter`, newest first.
pub fn filtered<'a>(snapshot: &'a Snapshot, filter: &VoteFilter) -> Vec<&'a VoteRecord> {
    snapshot.votes.iter().filter(|v| filter.matches(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RankedPolicy;
    use crate::voting::region::Region;

    fn vote(province: &str, region: Option<&str>, ranked: [&str; 3]) -> VoteRecord {
        let catalog = Catalog::builtin();
        VoteRecord {
            id: Uuid::new_v4(),
            location: LocationData {
                subdistrict: "ในเมือง".into(),
                district: "เมือง".into(),
                province: province.into(),
                zipcode: "00000".into(),
                region: region.map(str::to_string),
            },
            choices: ranked
                .iter()
                .enumerate()
                .map(|(i, id)| RankedPolicy {
                    policy_id: id.to_string(),
                    title: catalog.find(id).unwrap().title.clone(),
                    rank: i as u8 + 1,
                })
                .collect(),
            comment: None,
            created_at: None,
        }
    }

    fn snapshot(votes: Vec<VoteRecord>) -> Snapshot {
        Snapshot {
            votes,
            refreshed_at: Some(Utc::now()),
            loaded: true,
        }
    }

    fn khon_kaen() -> LocationData {
        vote("ขอนแก่น", None, ["jobs", "housing", "energy"]).location
    }

    #[test]
    fn public_results_flag_the_respondents_picks() {
        let snapshot = snapshot(vec![
            vote("ขอนแก่น", None, ["jobs", "housing", "energy"]),
            vote("เชียงใหม่", None, ["clean-air", "tourism", "jobs"]),
        ]);
        let picked = vec!["jobs".to_string(), "housing".to_string(), "energy".to_string()];
        let results = PublicResults::build(&Catalog::builtin(), &snapshot, &khon_kaen(), &picked);

        assert_eq!(results.national.len(), 5);
        assert_eq!(results.national[0].score.policy_id, "jobs");
        assert_eq!(results.national[0].score.score, 4);
        assert!(results.national[0].picked_by_you);
        assert!(!results.national[1].picked_by_you); // clean-air

        // Only Khon Kaen's three scored policies show up.
        let ids: Vec<&str> = results.provincial.iter().map(|e| e.score.policy_id.as_str()).collect();
        assert_eq!(ids, vec!["jobs", "housing", "energy"]);
    }

    #[test]
    fn public_results_before_any_votes() {
        let results = PublicResults::build(&Catalog::builtin(), &Snapshot::default(), &khon_kaen(), &[]);
        assert!(!results.loaded);
        assert_eq!(results.national.len(), 5);
        assert!(results.provincial.is_empty());
    }

    #[test]
    fn monitor_board_filters_by_region() {
        let snapshot = snapshot(vec![
            vote("ขอนแก่น", Some("ภาคตะวันออกเฉียงเหนือ"), ["jobs", "housing", "energy"]),
            vote("เชียงใหม่", Some("ภาคเหนือ"), ["clean-air", "tourism", "jobs"]),
            vote("สงขลา", None, ["tourism", "jobs", "education"]),
        ]);
        let catalog = Catalog::builtin();

        let all = MonitorBoard::build(&catalog, &snapshot, RegionFilter::All);
        assert_eq!(all.respondents, 3);
        assert_eq!(all.total_points, 18);
        assert_eq!(all.top.len(), 10);
        assert_eq!(all.scores.len(), 20);
        assert_eq!(all.regions.len(), 6);

        let north = MonitorBoard::build(&catalog, &snapshot, RegionFilter::Only(Region::North));
        assert_eq!(north.respondents, 1);
        assert_eq!(north.top[0].policy_id, "clean-air");
        assert_eq!(north.region.id, "north");

        let south = MonitorBoard::build(&catalog, &snapshot, RegionFilter::Only(Region::South));
        assert_eq!(south.respondents, 1);
        assert_eq!(south.top[0].policy_id, "tourism");
    }

    #[test]
    fn analytics_lists_provinces_and_previews() {
        let mut votes: Vec<VoteRecord> = (0..60)
            .map(|_| vote("ขอนแก่น", None, ["jobs", "housing", "energy"]))
            .collect();
        votes.push(vote("เชียงใหม่", None, ["clean-air", "tourism", "jobs"]));
        let snapshot = snapshot(votes);

        let view = AnalyticsView::build(&snapshot, &VoteFilter::All);
        assert!(!view.loading);
        assert_eq!(view.provinces.len(), 2);
        assert_eq!(view.total, 61);
        assert_eq!(view.matching, 61);
        assert_eq!(view.preview.len(), 50);
        assert_eq!(view.preview[0].date, "N/A");
        assert_eq!(view.preview[0].ranked_titles[0], "การจ้างงานและค่าแรง");

        let view = AnalyticsView::build(&snapshot, &VoteFilter::province(Some("เชียงใหม่")));
        assert_eq!(view.province, "เชียงใหม่");
        assert_eq!(view.matching, 1);
    }
}
