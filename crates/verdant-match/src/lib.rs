//! Entity resolution for Verdant.
//!
//! Maps free-text company mentions to canonical company ids with a
//! confidence score, using a precomputed index of name variants:
//!
//! - [`NameVariationGenerator`] derives the strings that could refer to a
//!   company from its name and ticker.
//! - [`VariationIndex`] is an immutable variant→company snapshot;
//!   [`IndexHandle`] rebuilds and atomically republishes it.
//! - [`Matcher`] finds the best-matching company in a text snippet.
//! - [`AttributionBatch`] applies the matcher over unattributed documents.
//! - [`MatchValidator`] re-checks existing attributions for drift.

pub mod attribution;
pub mod error;
pub mod index;
pub mod matcher;
pub mod validate;
pub mod variations;

pub use attribution::AttributionBatch;
pub use error::{Error, Result};
pub use index::{IndexHandle, VariationIndex};
pub use matcher::{Matcher, MatchHit};
pub use validate::{MatchValidator, ValidationStats};
pub use variations::NameVariationGenerator;
