use std::collections::HashMap;

use crate::model::{Candidate, Coalition, Position};

/// Heading for candidates whose position isn't in the lookup table.
pub const OTHER_POSITIONS: &str = "Other Positions";

/// Heading for candidates running without a coalition.
pub const INDEPENDENT: &str = "Independent";

/// Heading for candidates whose coalition isn't in the lookup table.
pub const OTHER_COALITIONS: &str = "Other Coalitions";

/// A titled section of candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateGroup<'a> {
    pub title: String,
    pub candidates: Vec<&'a Candidate>,
}

/// Position id → position name.
pub fn position_name_table(positions: &[Position]) -> HashMap<&str, &str> {
    positions
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str()))
        .collect()
}

/// Coalition id → display name.
pub fn coalition_name_table(coalitions: &[Coalition]) -> HashMap<&str, &str> {
    coalitions
        .iter()
        .map(|c| (c.id.as_str(), c.display_name()))
        .collect()
}

/// Partition candidates by position name. Groups appear in the order their
/// first candidate does; candidates keep their source order within a group.
pub fn group_by_position<'a>(
    candidates: &'a [Candidate],
    position_names: &HashMap<&str, &str>,
) -> Vec<CandidateGroup<'a>> {
    group_by(candidates, |candidate| {
        position_names
            .get(candidate.position_id.as_str())
            .copied()
            .unwrap_or(OTHER_POSITIONS)
    })
}

/// Partition candidates by coalition display name.
pub fn group_by_coalition<'a>(
    candidates: &'a [Candidate],
    coalition_names: &HashMap<&str, &str>,
) -> Vec<CandidateGroup<'a>> {
    group_by(candidates, |candidate| match &candidate.coalition_id {
        Some(id) => coalition_names.get(id.as_str()).copied().unwrap_or(OTHER_COALITIONS),
        None => INDEPENDENT,
    })
}

fn group_by<'a, 'n>(
    candidates: &'a [Candidate],
    title_of: impl Fn(&Candidate) -> &'n str,
) -> Vec<CandidateGroup<'a>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CandidateGroup<'a>> = Vec::new();
    for candidate in candidates {
        let title = title_of(candidate);
        let slot = *index.entry(title).or_insert_with(|| {
            groups.push(CandidateGroup {
                title: title.to_string(),
                candidates: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].candidates.push(candidate);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate::example("c1", "Achieng", "p2").in_coalition("k1"),
            Candidate::example("c2", "Brian", "p1"),
            Candidate::example("c3", "Chebet", "p2").in_coalition("k2"),
            Candidate::example("c4", "Daudi", "p9").in_coalition("k1"),
            Candidate::example("c5", "Esther", "p1").in_coalition("k404"),
        ]
    }

    fn positions() -> Vec<Position> {
        vec![
            Position::example("p1", "President"),
            Position::example("p2", "Secretary General"),
        ]
    }

    fn titles<'a>(groups: &'a [CandidateGroup<'_>]) -> Vec<&'a str> {
        groups.iter().map(|g| g.title.as_str()).collect()
    }

    fn ids<'a>(group: &CandidateGroup<'a>) -> Vec<&'a str> {
        group.candidates.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn groups_by_position_in_first_seen_order() {
        let candidates = candidates();
        let positions = positions();
        let groups = group_by_position(&candidates, &position_name_table(&positions));

        assert_eq!(
            titles(&groups),
            ["Secretary General", "President", OTHER_POSITIONS]
        );
        assert_eq!(ids(&groups[0]), ["c1", "c3"]);
        assert_eq!(ids(&groups[1]), ["c2", "c5"]);
        assert_eq!(ids(&groups[2]), ["c4"]);
    }

    #[test]
    fn grouping_is_total_for_any_lookup_table() {
        let candidates = candidates();
        let positions = positions();
        let full = position_name_table(&positions);
        let partial = position_name_table(&positions[..1]);
        let empty = HashMap::new();

        for table in [&full, &partial, &empty] {
            let groups = group_by_position(&candidates, table);
            let mut seen: Vec<&str> = groups.iter().flat_map(|g| ids(g)).collect();
            seen.sort_unstable();
            assert_eq!(seen, ["c1", "c2", "c3", "c4", "c5"]);
        }

        let groups = group_by_position(&candidates, &empty);
        assert_eq!(titles(&groups), [OTHER_POSITIONS]);
        assert_eq!(groups[0].candidates.len(), candidates.len());
    }

    #[test]
    fn groups_by_coalition_display_name() {
        let candidates = candidates();
        let coalitions = vec![
            Coalition::example("k1", "Students First Alliance", Some("SFA")),
            Coalition::example("k2", "Unity Movement", None),
        ];
        let groups = group_by_coalition(&candidates, &coalition_name_table(&coalitions));

        assert_eq!(
            titles(&groups),
            ["SFA", INDEPENDENT, "Unity Movement", OTHER_COALITIONS]
        );
        assert_eq!(ids(&groups[0]), ["c1", "c4"]);
        assert_eq!(ids(&groups[1]), ["c2"]);
        // k404 isn't a known coalition, but the candidate still has one.
        assert_eq!(ids(&groups[3]), ["c5"]);
    }

    #[test]
    fn no_candidates_no_groups() {
        assert!(group_by_position(&[], &HashMap::new()).is_empty());
    }
}
