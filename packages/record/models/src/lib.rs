#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw death-record types shared across the registry watch workspace.
//!
//! Records arrive from the external registry exactly as the fetcher parsed
//! them and are never mutated after insertion. Deduplication uses the
//! natural key returned by [`DeathRecord::natural_key`].

use serde::{Deserialize, Serialize};

/// One row retrieved from the civil death-record registry, verbatim.
///
/// All fields carry the source's own text; no normalization is applied at
/// this layer. Matching-time normalization lives in the matcher package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeathRecord {
    /// Full name of the deceased.
    pub name: String,
    /// Gender cell, verbatim (e.g., "Male", "F").
    pub gender: String,
    /// Date of death as printed by the registry (kept as text; source
    /// formatting is inconsistent across district offices).
    pub date_of_death: String,
    /// Father's name.
    pub fathers_name: String,
    /// Mother's name.
    pub mothers_name: String,
}

impl DeathRecord {
    /// Returns the natural key identifying this record for deduplication.
    ///
    /// Gender is excluded: registry rows occasionally re-appear with a
    /// corrected gender cell but identical identity fields.
    #[must_use]
    pub fn natural_key(&self) -> RecordKey {
        RecordKey {
            name: self.name.clone(),
            date_of_death: self.date_of_death.clone(),
            fathers_name: self.fathers_name.clone(),
            mothers_name: self.mothers_name.clone(),
        }
    }
}

/// The tuple that identifies a record as a duplicate:
/// (name, date of death, father's name, mother's name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    /// Full name of the deceased.
    pub name: String,
    /// Date of death text.
    pub date_of_death: String,
    /// Father's name.
    pub fathers_name: String,
    /// Mother's name.
    pub mothers_name: String,
}
