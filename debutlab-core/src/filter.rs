//! Filter engine: narrows the canonical table by a criteria set.
//!
//! Each active dimension becomes one [`RecordFilter`]. A record survives iff
//! every filter matches, so filters combine as a pure conjunction and the
//! order they are applied in never changes the result.
//!
//! # Sentinel
//! An empty categorical selection, or one containing [`ALL_MARKER`], means
//! "no restriction": every record passes, including records whose value is
//! absent. Criteria referencing a field missing from the table's schema are
//! likewise treated as "no restriction".

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{CanonicalTable, Record};
use crate::schema::{Field, Schema};

/// Explicit "everything" marker accepted in categorical selections.
pub const ALL_MARKER: &str = "All";

/// Categorical selection: either no restriction or a set of allowed values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Label>", into = "Vec<String>")]
pub enum Selection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl Selection {
    /// Build a selection from user input. Values are trimmed and blanks
    /// dropped; empty input or the all-marker yields [`Selection::All`].
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values
            .into_iter()
            .map(|v| Into::<String>::into(v).trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        if values.is_empty() || values.contains(ALL_MARKER) {
            Selection::All
        } else {
            Selection::Only(values)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Whether a record value passes this selection.
    pub fn allows(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(allowed) => value.is_some_and(|v| allowed.contains(v)),
        }
    }
}

impl From<Vec<String>> for Selection {
    fn from(values: Vec<String>) -> Self {
        Selection::from_values(values)
    }
}

/// One selection entry as written in a criteria file. Years may be bare integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum Label {
    Str(String),
    Int(i64),
}

impl From<Vec<Label>> for Selection {
    fn from(labels: Vec<Label>) -> Self {
        Selection::from_values(labels.into_iter().map(|label| match label {
            Label::Str(s) => s,
            Label::Int(n) => n.to_string(),
        }))
    }
}

impl From<Selection> for Vec<String> {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::All => Vec::new(),
            Selection::Only(values) => values.into_iter().collect(),
        }
    }
}

/// Inclusive age bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// One resolved set of filter constraints for a pipeline run.
///
/// `Default` is "no restriction" on every dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    /// Compound competition keys (`"<competition>|<country>"`).
    pub competitions: Selection,
    pub years: Selection,
    pub months: Selection,
    pub age: Option<AgeRange>,
    pub min_minutes: Option<u32>,
}

impl Criteria {
    /// The active filters for a table with the given schema.
    ///
    /// Sentinel dimensions and dimensions whose field is missing from the
    /// schema produce no filter.
    pub fn filters(&self, schema: &Schema) -> Vec<Box<dyn RecordFilter>> {
        let mut filters: Vec<Box<dyn RecordFilter>> = Vec::new();

        let categorical = [
            (Field::FilterKey, &self.competitions),
            (Field::DebutYear, &self.years),
            (Field::DebutMonth, &self.months),
        ];
        for (field, selection) in categorical {
            if let Selection::Only(allowed) = selection {
                if schema.contains(field) {
                    filters.push(Box::new(MembershipFilter::new(field, allowed.clone())));
                }
            }
        }

        if let Some(age) = self.age {
            if schema.contains(Field::AgeAtDebut) {
                filters.push(Box::new(RangeFilter::new(
                    Field::AgeAtDebut,
                    i64::from(age.min),
                    i64::from(age.max),
                )));
            }
        }

        if let Some(min) = self.min_minutes {
            if schema.contains(Field::MinutesPlayed) {
                filters.push(Box::new(ThresholdFilter::new(
                    Field::MinutesPlayed,
                    i64::from(min),
                )));
            }
        }

        filters
    }
}

/// A single predicate over records.
///
/// Implementations are pure: the verdict depends only on the record.
pub trait RecordFilter: Send + Sync {
    /// Human-readable name (e.g., "membership", "range").
    fn name(&self) -> &str;

    /// The canonical field this filter inspects.
    fn field(&self) -> Field;

    fn matches(&self, record: &Record) -> bool;
}

/// Passes records whose categorical value is in the allowed set.
#[derive(Debug, Clone)]
pub struct MembershipFilter {
    field: Field,
    allowed: BTreeSet<String>,
}

impl MembershipFilter {
    pub fn new(field: Field, allowed: BTreeSet<String>) -> Self {
        Self { field, allowed }
    }
}

impl RecordFilter for MembershipFilter {
    fn name(&self) -> &str {
        "membership"
    }

    fn field(&self) -> Field {
        self.field
    }

    fn matches(&self, record: &Record) -> bool {
        record
            .category(self.field)
            .is_some_and(|v| self.allowed.contains(v.as_ref()))
    }
}

/// Passes records with `low <= value <= high`. An inverted range matches nothing.
#[derive(Debug, Clone)]
pub struct RangeFilter {
    field: Field,
    low: i64,
    high: i64,
}

impl RangeFilter {
    pub fn new(field: Field, low: i64, high: i64) -> Self {
        Self { field, low, high }
    }
}

impl RecordFilter for RangeFilter {
    fn name(&self) -> &str {
        "range"
    }

    fn field(&self) -> Field {
        self.field
    }

    fn matches(&self, record: &Record) -> bool {
        record
            .integer(self.field)
            .is_some_and(|v| self.low <= v && v <= self.high)
    }
}

/// Passes records with `value >= min`.
#[derive(Debug, Clone)]
pub struct ThresholdFilter {
    field: Field,
    min: i64,
}

impl ThresholdFilter {
    pub fn new(field: Field, min: i64) -> Self {
        Self { field, min }
    }
}

impl RecordFilter for ThresholdFilter {
    fn name(&self) -> &str {
        "threshold"
    }

    fn field(&self) -> Field {
        self.field
    }

    fn matches(&self, record: &Record) -> bool {
        record.integer(self.field).is_some_and(|v| v >= self.min)
    }
}

/// Keep the records that pass every filter, preserving source order.
pub fn apply_filters(records: &[Record], filters: &[Box<dyn RecordFilter>]) -> Vec<Record> {
    records
        .iter()
        .filter(|r| filters.iter().all(|f| f.matches(r)))
        .cloned()
        .collect()
}

/// Filter a canonical table by a criteria set.
pub fn filter_table(table: &CanonicalTable, criteria: &Criteria) -> Vec<Record> {
    let filters = criteria.filters(&table.schema);
    apply_filters(&table.records, &filters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: Option<&str>, age: Option<u32>, minutes: Option<u32>) -> Record {
        Record {
            filter_key: key.map(String::from),
            age_at_debut: age,
            minutes_played: minutes,
            ..Default::default()
        }
    }

    fn full_schema() -> Schema {
        Schema::from_source_fields([
            Field::Competition,
            Field::DebutDate,
            Field::AgeAtDebut,
            Field::MinutesPlayed,
        ])
    }

    fn table(records: Vec<Record>) -> CanonicalTable {
        CanonicalTable::new(full_schema(), records, vec![])
    }

    #[test]
    fn empty_selection_means_all() {
        assert_eq!(Selection::from_values(Vec::<String>::new()), Selection::All);
        assert_eq!(Selection::from_values(["All", "x"]), Selection::All);
        assert!(Selection::All.allows(None));
    }

    #[test]
    fn concrete_selection_rejects_absent_values() {
        let sel = Selection::from_values(["a"]);
        assert!(sel.allows(Some("a")));
        assert!(!sel.allows(Some("b")));
        assert!(!sel.allows(None));
    }

    #[test]
    fn age_range_is_inclusive() {
        let t = table(vec![
            record(None, Some(17), None),
            record(None, Some(18), None),
            record(None, Some(23), None),
            record(None, Some(24), None),
            record(None, None, None),
        ]);
        let criteria = Criteria {
            age: Some(AgeRange::new(18, 23)),
            ..Default::default()
        };
        let ages: Vec<_> = filter_table(&t, &criteria)
            .iter()
            .map(|r| r.age_at_debut)
            .collect();
        assert_eq!(ages, vec![Some(18), Some(23)]);
    }

    #[test]
    fn inverted_age_range_matches_nothing() {
        let t = table(vec![record(None, Some(20), None)]);
        let criteria = Criteria {
            age: Some(AgeRange::new(25, 18)),
            ..Default::default()
        };
        assert!(filter_table(&t, &criteria).is_empty());
    }

    #[test]
    fn minutes_threshold_is_inclusive_and_rejects_absent() {
        let t = table(vec![
            record(None, None, Some(89)),
            record(None, None, Some(90)),
            record(None, None, None),
        ]);
        let criteria = Criteria {
            min_minutes: Some(90),
            ..Default::default()
        };
        let kept = filter_table(&t, &criteria);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].minutes_played, Some(90));
    }

    #[test]
    fn unknown_selection_value_matches_nothing() {
        let t = table(vec![record(Some("Serie A|Italy"), None, None)]);
        let criteria = Criteria {
            competitions: Selection::from_values(["Atlantis League|Atlantis"]),
            ..Default::default()
        };
        assert!(filter_table(&t, &criteria).is_empty());
    }

    #[test]
    fn criteria_on_missing_field_are_no_restriction() {
        let t = CanonicalTable::new(
            Schema::from_source_fields([Field::PlayerName]),
            vec![Record::default(), Record::default()],
            vec![],
        );
        let criteria = Criteria {
            competitions: Selection::from_values(["Serie A|Italy"]),
            age: Some(AgeRange::new(18, 23)),
            min_minutes: Some(10),
            ..Default::default()
        };
        assert!(criteria.filters(&t.schema).is_empty());
        assert_eq!(filter_table(&t, &criteria).len(), 2);
    }

    #[test]
    fn year_membership_uses_integer_labels() {
        let mut r = Record::default();
        r.debut_year = Some(2021);
        let t = table(vec![r, Record::default()]);
        let criteria = Criteria {
            years: Selection::from_values(["2021"]),
            ..Default::default()
        };
        assert_eq!(filter_table(&t, &criteria).len(), 1);
    }

    #[test]
    fn filtering_does_not_touch_the_source_table() {
        let t = table(vec![record(Some("a|b"), Some(20), Some(10))]);
        let before = t.clone();
        let criteria = Criteria {
            min_minutes: Some(1_000),
            ..Default::default()
        };
        let _ = filter_table(&t, &criteria);
        assert_eq!(t, before);
    }

    #[test]
    fn criteria_deserialize_from_toml() {
        let criteria: Criteria = toml::from_str(
            r#"
            competitions = ["Serie A|Italy"]
            months = []
            min_minutes = 90
            age = { min = 18, max = 23 }
            "#,
        )
        .unwrap();
        assert_eq!(
            criteria.competitions,
            Selection::from_values(["Serie A|Italy"])
        );
        assert!(criteria.months.is_all());
        assert!(criteria.years.is_all());
        assert_eq!(criteria.age, Some(AgeRange::new(18, 23)));
        assert_eq!(criteria.min_minutes, Some(90));
    }

    #[test]
    fn years_accept_integers_and_strings() {
        let criteria: Criteria = toml::from_str(r#"years = [2021, "2022"]"#).unwrap();
        assert_eq!(criteria.years, Selection::from_values(["2021", "2022"]));

        let mut r = Record::default();
        r.debut_year = Some(2021);
        assert_eq!(filter_table(&table(vec![r]), &criteria).len(), 1);
    }

    #[test]
    fn selection_values_are_trimmed() {
        let sel = Selection::from_values([" 2021", "Serie A|Italy ", "  "]);
        assert_eq!(sel, Selection::from_values(["2021", "Serie A|Italy"]));
        assert!(sel.allows(Some("Serie A|Italy")));
        assert_eq!(Selection::from_values([" All "]), Selection::All);
        assert_eq!(Selection::from_values(["   "]), Selection::All);
    }
}
