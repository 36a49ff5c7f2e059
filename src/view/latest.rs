use chrono::{DateTime, Utc};

use crate::model::Election;

/// The most recently created election. Elections the server sent without a
/// creation time are ranked by their start date instead. Ties go to the
/// election with the greater id so the answer never depends on input order.
pub fn latest_election(elections: &[Election]) -> Option<&Election> {
    elections
        .iter()
        .max_by(|a, b| recency(a).cmp(&recency(b)).then_with(|| a.id.cmp(&b.id)))
}

fn recency(election: &Election) -> DateTime<Utc> {
    election.created_at.unwrap_or(election.start_date)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, month, day, 9, 0, 0).unwrap()
    }

    #[test]
    fn picks_greatest_creation_time_regardless_of_order() {
        let elections = vec![
            Election::example("e1", at(1, 10)),
            Election::example("e2", at(2, 1)),
            Election::example("e3", at(1, 20)),
        ];
        assert_eq!(latest_election(&elections).unwrap().id, "e2");

        let mut reversed = elections.clone();
        reversed.reverse();
        assert_eq!(latest_election(&reversed).unwrap().id, "e2");

        let mut rotated = elections;
        rotated.rotate_left(2);
        assert_eq!(latest_election(&rotated).unwrap().id, "e2");
    }

    #[test]
    fn missing_creation_time_falls_back_to_start() {
        let mut undated = Election::example("e9", at(1, 1));
        undated.created_at = None;
        undated.start_date = at(5, 1);
        let elections = vec![Election::example("e1", at(2, 1)), undated];
        assert_eq!(latest_election(&elections).unwrap().id, "e9");
    }

    #[test]
    fn empty_list_has_no_latest() {
        assert!(latest_election(&[]).is_none());
    }
}
