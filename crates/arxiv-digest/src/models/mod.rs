//! Data models for topic profiles and papers.
//!
//! Profiles are validated at load time; papers are normalized by the
//! result filter before anything else sees them.

mod paper;
mod profile;

pub use paper::{PaperRecord, SearchHit, minute_format};
pub use profile::{TopicProfile, load_profiles, parse_profiles};
