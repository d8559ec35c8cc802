//! Statistics over loaded sheets.
//!
//! - `metadata`: question blocks and category column groups of a banner
//! - `significance`: group percentages and significance letters
//! - `penalty`: penalty tables for just-about-right questions

pub mod letters;
pub mod metadata;
pub mod penalty;
pub mod significance;
pub mod ztest;

pub use metadata::{BannerMetadata, CategoryColumnGroup, QuestionBlock};
pub use penalty::{PenaltyRow, PenaltyTable};
pub use significance::{CombinedTable, SignificanceOutcome};
pub use ztest::{is_significant, two_proportion_ztest, ZTest};
