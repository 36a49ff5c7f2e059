use crate::model::Candidate;

/// The candidate screen's filter selections. Search and position filter are
/// mutually exclusive: setting one clears the other. The coalition filter
/// narrows whichever list is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    search: Option<String>,
    position_id: Option<String>,
    coalition_id: Option<String>,
}

/// The candidate lists a screen has fetched so far. `search` and
/// `by_position` are `None` until their reads have resolved.
#[derive(Debug, Clone, Copy)]
pub struct CandidateSources<'a> {
    pub all: &'a [Candidate],
    pub search: Option<&'a [Candidate]>,
    pub by_position: Option<&'a [Candidate]>,
}

impl CandidateFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text search. A blank term clears it. Setting a search
    /// clears the position filter.
    pub fn set_search(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            self.search = None;
        } else {
            self.search = Some(term.to_string());
            self.position_id = None;
        }
    }

    /// Select a position, or `None` for all positions. Selecting one clears
    /// the search.
    pub fn set_position(&mut self, position_id: Option<&str>) {
        self.position_id = position_id.map(str::to_string);
        if self.position_id.is_some() {
            self.search = None;
        }
    }

    pub fn set_coalition(&mut self, coalition_id: Option<&str>) {
        self.coalition_id = coalition_id.map(str::to_string);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn position_id(&self) -> Option<&str> {
        self.position_id.as_deref()
    }

    pub fn coalition_id(&self) -> Option<&str> {
        self.coalition_id.as_deref()
    }

    /// True when grouping should be by coalition instead of by position.
    pub fn groups_by_coalition(&self) -> bool {
        self.coalition_id.is_some()
    }

    /// The list to show: search results when a search is active, else the
    /// position's candidates when a position is selected, else everything;
    /// then narrowed by coalition.
    ///
    /// A selection whose results haven't arrived yet falls through to the
    /// next list rather than showing nothing.
    pub fn select<'a>(&self, sources: CandidateSources<'a>) -> Vec<&'a Candidate> {
        let primary = match (&self.search, sources.search, &self.position_id, sources.by_position) {
            (Some(_), Some(found), _, _) => found,
            (_, _, Some(_), Some(by_position)) => by_position,
            _ => sources.all,
        };
        let primary: Vec<&Candidate> = primary.iter().collect();
        match &self.coalition_id {
            Some(coalition_id) => narrow_by_coalition(&primary, coalition_id),
            None => primary,
        }
    }
}

/// Keep only members of `coalition_id`. Applying it twice changes nothing.
pub fn narrow_by_coalition<'a>(candidates: &[&'a Candidate], coalition_id: &str) -> Vec<&'a Candidate> {
    candidates
        .iter()
        .copied()
        .filter(|c| c.coalition_id.as_deref() == Some(coalition_id))
        .collect()
}

/// Case-insensitive match on name, student id or school, for narrowing an
/// already-fetched list without a round trip.
pub fn matches_search(candidate: &Candidate, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    [
        Some(candidate.name.as_str()),
        Some(candidate.student_id.as_str()),
        candidate.school.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&term))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all() -> Vec<Candidate> {
        vec![
            Candidate::example("c1", "Achieng Odhiambo", "p1").in_coalition("k1"),
            Candidate::example("c2", "Brian Mwangi", "p1"),
            Candidate::example("c3", "Chebet Rono", "p2").in_coalition("k1"),
            Candidate::example("c4", "Daudi Achieng", "p2").in_coalition("k2"),
        ]
    }

    fn ids(list: &[&Candidate]) -> Vec<String> {
        list.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn search_and_position_are_exclusive() {
        let mut filter = CandidateFilter::new();
        filter.set_position(Some("p1"));
        filter.set_search("achieng");
        assert_eq!(filter.search(), Some("achieng"));
        assert_eq!(filter.position_id(), None);

        filter.set_position(Some("p2"));
        assert_eq!(filter.search(), None);
        assert_eq!(filter.position_id(), Some("p2"));

        filter.set_search("   ");
        assert_eq!(filter.position_id(), Some("p2"));
    }

    #[test]
    fn search_dominates_position() {
        let all = all();
        let found = vec![all[0].clone(), all[3].clone()];
        let by_position = vec![all[2].clone(), all[3].clone()];
        let sources = CandidateSources {
            all: &all,
            search: Some(&found),
            by_position: Some(&by_position),
        };

        // Both present in state at once, bypassing the exclusivity setters.
        let filter = CandidateFilter {
            search: Some("achieng".to_string()),
            position_id: Some("p2".to_string()),
            coalition_id: None,
        };
        assert_eq!(ids(&filter.select(sources)), ["c1", "c4"]);

        let mut filter = CandidateFilter::new();
        filter.set_position(Some("p2"));
        assert_eq!(ids(&filter.select(sources)), ["c3", "c4"]);

        assert_eq!(ids(&CandidateFilter::new().select(sources)).len(), 4);
    }

    #[test]
    fn pending_results_fall_back_to_all() {
        let all = all();
        let sources = CandidateSources {
            all: &all,
            search: None,
            by_position: None,
        };
        let mut filter = CandidateFilter::new();
        filter.set_search("brian");
        assert_eq!(filter.select(sources).len(), 4);
    }

    #[test]
    fn coalition_narrows_selected_list() {
        let all = all();
        let by_position = vec![all[2].clone(), all[3].clone()];
        let sources = CandidateSources {
            all: &all,
            search: None,
            by_position: Some(&by_position),
        };
        let mut filter = CandidateFilter::new();
        filter.set_position(Some("p2"));
        filter.set_coalition(Some("k1"));
        assert!(filter.groups_by_coalition());
        assert_eq!(ids(&filter.select(sources)), ["c3"]);

        filter.set_position(None);
        assert_eq!(ids(&filter.select(sources)), ["c1", "c3"]);

        filter.clear();
        assert_eq!(filter, CandidateFilter::default());
    }

    #[test]
    fn coalition_narrowing_is_idempotent() {
        let all = all();
        let everyone: Vec<&Candidate> = all.iter().collect();
        for coalition in ["k1", "k2", "missing"] {
            let once = narrow_by_coalition(&everyone, coalition);
            let twice = narrow_by_coalition(&once, coalition);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn local_search_is_case_insensitive() {
        let all = all();
        assert!(matches_search(&all[0], "ODHIAMBO"));
        assert!(matches_search(&all[1], "sc2"));
        assert!(matches_search(&all[2], "computing"));
        assert!(matches_search(&all[2], ""));
        assert!(!matches_search(&all[1], "achieng"));
        let hits: Vec<_> = all.iter().filter(|c| matches_search(c, "achieng")).collect();
        assert_eq!(hits.len(), 2);
    }
}
