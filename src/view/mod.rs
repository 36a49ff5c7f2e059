//! Pure functions that shape fetched data for display.

pub mod filter;
pub mod grouping;
pub mod latest;

pub use filter::{matches_search, narrow_by_coalition, CandidateFilter, CandidateSources};
pub use grouping::{
    coalition_name_table, group_by_coalition, group_by_position, position_name_table,
    CandidateGroup, INDEPENDENT, OTHER_COALITIONS, OTHER_POSITIONS,
};
pub use latest::latest_election;
