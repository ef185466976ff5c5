//! Selectable values per filter dimension, for whatever front end collects criteria.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::CanonicalTable;
use crate::filter::AgeRange;
use crate::parse::month_number;
use crate::schema::Field;

/// A competition choice: the filter key plus its display label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompetitionOption {
    pub key: String,
    pub label: String,
}

/// Values a user can pick from, computed from the canonical table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriteriaOptions {
    /// Sorted by label.
    pub competitions: Vec<CompetitionOption>,
    /// Ascending.
    pub years: Vec<i32>,
    /// Calendar order; unrecognized month labels sort last, alphabetically.
    pub months: Vec<String>,
    /// Observed age bounds, the natural slider default.
    pub age: Option<AgeRange>,
    pub max_minutes: Option<u32>,
}

impl CriteriaOptions {
    pub fn from_table(table: &CanonicalTable) -> Self {
        let schema = &table.schema;
        let records = &table.records;

        let competitions = if schema.contains(Field::FilterKey) {
            let by_key: BTreeMap<&str, &str> = records
                .iter()
                .filter_map(|r| Some((r.filter_key.as_deref()?, r.display_label.as_deref()?)))
                .collect();
            let mut options: Vec<CompetitionOption> = by_key
                .into_iter()
                .map(|(key, label)| CompetitionOption {
                    key: key.to_string(),
                    label: label.to_string(),
                })
                .collect();
            options.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.key.cmp(&b.key)));
            options
        } else {
            Vec::new()
        };

        let years: BTreeSet<i32> = records.iter().filter_map(|r| r.debut_year).collect();

        let mut months: Vec<String> = records
            .iter()
            .filter_map(|r| r.debut_month.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        months.sort_by_key(|m| (month_number(m).unwrap_or(13), m.clone()));

        let ages = records.iter().filter_map(|r| r.age_at_debut);
        let age = ages
            .clone()
            .min()
            .zip(ages.max())
            .map(|(min, max)| AgeRange::new(min, max));

        let max_minutes = records.iter().filter_map(|r| r.minutes_played).max();

        Self {
            competitions,
            years: years.into_iter().collect(),
            months,
            age,
            max_minutes,
        }
    }
}
