use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::models::{VoteRecord, RANKED_CHOICES};
use crate::voting::{PolicyScore, Tally, VoteFilter};

/// Points for a choice: 3 for first place, 2 for second, 1 for third.
pub fn points(rank: u8) -> u32 {
    match rank {
        1..=3 => (RANKED_CHOICES as u32 + 1) - u32::from(rank),
        _ => 0,
    }
}

/// Weighted ranked-choice totals over the records that match `filter`.
///
/// Every catalog policy appears in the result, unvoted ones with 0. Choices
/// naming a policy outside the catalog are ignored. Equal scores keep
/// catalog order.
pub fn calculate_scores(catalog: &Catalog, votes: &[VoteRecord], filter: &VoteFilter) -> Tally {
    let mut totals: HashMap<&str, u32> = catalog
        .policies()
        .iter()
        .map(|policy| (policy.id.as_str(), 0))
        .collect();
    let mut respondents = 0;

    for vote in votes.iter().filter(|vote| filter.matches(vote)) {
        respondents += 1;
        for choice in &vote.choices {
            if let Some(total) = totals.get_mut(choice.policy_id.as_str()) {
                *total += points(choice.rank);
            }
        }
    }

    let mut scores: Vec<PolicyScore> = catalog
        .policies()
        .iter()
        .map(|policy| PolicyScore {
            policy_id: policy.id.clone(),
            title: policy.title.clone(),
            short_name: policy.short_name(),
            focus: policy.focus.clone(),
            glyph: policy.glyph(),
            score: totals.get(policy.id.as_str()).copied().unwrap_or(0),
            rank: 0,
        })
        .collect();

    // Stable, so ties stay in catalog order
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    for (i, score) in scores.iter_mut().enumerate() {
        score.rank = i + 1;
    }

    let total_points = scores.iter().map(|s| s.score).sum();

    Tally {
        scores,
        respondents,
        total_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocationData, Policy, RankedPolicy};
    use crate::voting::region::Region;
    use uuid::Uuid;

    fn policy(id: &str) -> Policy {
        Policy {
            id: id.to_string(),
            title: format!("Policy {}", id),
            description: String::new(),
            focus: String::new(),
            icon_name: "Wallet".to_string(),
            examples: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_policies(["A", "B", "C", "D", "E"].iter().map(|id| policy(id)).collect())
    }

    fn vote(province: &str, region: Option<&str>, ranked: [&str; 3]) -> VoteRecord {
        VoteRecord {
            id: Uuid::new_v4(),
            location: LocationData {
                subdistrict: String::new(),
                district: String::new(),
                province: province.to_string(),
                zipcode: String::new(),
                region: region.map(str::to_string),
            },
            choices: ranked
                .iter()
                .enumerate()
                .map(|(i, id)| RankedPolicy {
                    policy_id: id.to_string(),
                    title: format!("Policy {}", id),
                    rank: i as u8 + 1,
                })
                .collect(),
            comment: None,
            created_at: None,
        }
    }

    #[test]
    fn points_per_rank() {
        assert_eq!(points(1), 3);
        assert_eq!(points(2), 2);
        assert_eq!(points(3), 1);
        assert_eq!(points(0), 0);
        assert_eq!(points(4), 0);
    }

    #[test]
    fn single_vote_scores_three_two_one() {
        let tally = calculate_scores(&catalog(), &[vote("X", None, ["A", "B", "C"])], &VoteFilter::All);
        assert_eq!(tally.score_of("A"), 3);
        assert_eq!(tally.score_of("B"), 2);
        assert_eq!(tally.score_of("C"), 1);
        assert_eq!(tally.score_of("D"), 0);
        assert_eq!(tally.respondents, 1);
        assert_eq!(tally.total_points, 6);
    }

    #[test]
    fn identical_votes_double() {
        let votes = vec![vote("X", None, ["A", "B", "C"]), vote("X", None, ["A", "B", "C"])];
        let tally = calculate_scores(&catalog(), &votes, &VoteFilter::All);
        assert_eq!(tally.score_of("A"), 6);
        assert_eq!(tally.score_of("B"), 4);
        assert_eq!(tally.score_of("C"), 2);
    }

    #[test]
    fn ties_keep_catalog_order() {
        let tally = calculate_scores(&catalog(), &[vote("X", None, ["E", "D", "B"])], &VoteFilter::All);
        let order: Vec<&str> = tally.scores.iter().map(|s| s.policy_id.as_str()).collect();
        assert_eq!(order, vec!["E", "D", "B", "A", "C"]);
        assert_eq!(tally.scores[3].rank, 4);
    }

    #[test]
    fn empty_input_scores_everything_zero() {
        let tally = calculate_scores(&catalog(), &[], &VoteFilter::All);
        assert_eq!(tally.scores.len(), 5);
        assert!(tally.scores.iter().all(|s| s.score == 0));
        assert_eq!(tally.respondents, 0);
        assert_eq!(tally.top(3).len(), 3);
        assert_eq!(tally.top(10).len(), 5);
    }

    #[test]
    fn unknown_policies_are_ignored() {
        let tally = calculate_scores(&catalog(), &[vote("X", None, ["Z", "A", "B"])], &VoteFilter::All);
        assert_eq!(tally.score_of("A"), 2);
        assert_eq!(tally.score_of("Z"), 0);
        assert_eq!(tally.total_points, 3);
    }

    #[test]
    fn province_filter_is_exact() {
        let votes = vec![
            vote("ขอนแก่น", None, ["A", "B", "C"]),
            vote("เชียงใหม่", None, ["C", "B", "A"]),
        ];
        let tally = calculate_scores(&catalog(), &votes, &VoteFilter::Province("ขอนแก่น".into()));
        assert_eq!(tally.respondents, 1);
        assert_eq!(tally.score_of("A"), 3);
    }

    #[test]
    fn northeast_votes_count_only_under_northeast() {
        let votes = vec![vote("ขอนแก่น", Some("ภาคตะวันออกเฉียงเหนือ"), ["A", "B", "C"])];
        let catalog = catalog();

        let northeast = calculate_scores(&catalog, &votes, &VoteFilter::Region(Region::Northeast));
        assert_eq!(northeast.respondents, 1);
        assert_eq!(northeast.score_of("A"), 3);

        for other in [Region::North, Region::Central] {
            let tally = calculate_scores(&catalog, &votes, &VoteFilter::Region(other));
            assert_eq!(tally.respondents, 0);
            assert_eq!(tally.total_points, 0);
        }
    }

    #[test]
    fn recomputing_gives_the_same_result() {
        let votes = vec![
            vote("X", None, ["B", "A", "C"]),
            vote("Y", None, ["A", "B", "D"]),
            vote("Y", None, ["D", "E", "A"]),
        ];
        let catalog = catalog();
        let first = calculate_scores(&catalog, &votes, &VoteFilter::All);
        let second = calculate_scores(&catalog, &votes, &VoteFilter::All);
        assert_eq!(first, second);
    }
}
