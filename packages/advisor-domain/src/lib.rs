//! Pure stages of the recommendation pipeline.
//!
//! Nothing in this crate performs I/O. Validation turns the raw change payload into a typed
//! [`changes::ChangeSet`], merging layers it over store and external state, ranking orders
//! the candidate catalog, and explanation renders the rationale shown to advisors. The
//! best-interest summary restates that rationale as a compliance record.

pub mod best_interest;
pub mod changes;
pub mod explain;
pub mod merge;
pub mod recommend;

pub use best_interest::{BestInterestSummary, best_interest_summary, profile_characteristics};
pub use changes::{
	ChangeSet, ClientGoals, ClientProfile, CustomerSelection, Suitability, ValidationError,
	validate_changes,
};
pub use explain::{CurrentProduct, Explanation, build_explanation, selection_sentence};
pub use merge::{MergedProfile, ProfileState, merge_profile};
pub use recommend::{
	ProductCandidate, Recommendation, choice_criteria, format_rate, parse_rate, rank_candidates,
};
