//! Normalizer: raw table to canonical table.
//!
//! Four steps per row:
//! 1. Rename source columns to canonical fields and coerce cells (parse-or-absent)
//! 2. Derive calendar attributes (debut year, and debut month when the source has none)
//! 3. Apply conditional value rewrites
//! 4. Build the compound filter key and display label

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::domain::{CanonicalTable, RawTable, Record};
use crate::parse::{month_name, parse_count, parse_date, parse_money};
use crate::schema::{Field, Schema};

/// Default separator between competition and country in the filter key.
pub const DEFAULT_KEY_SEPARATOR: &str = "|";

/// Source column name to canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<String, Field>);

impl ColumnMapping {
    pub fn new(entries: impl IntoIterator<Item = (String, Field)>) -> Self {
        Self(entries.into_iter().collect())
    }

    pub fn get(&self, column: &str) -> Option<Field> {
        self.0.get(column.trim()).copied()
    }

    pub fn insert(&mut self, column: impl Into<String>, field: Field) {
        self.0.insert(column.into(), field);
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::new(
            [
                ("comp_name", Field::Competition),
                ("country", Field::Country),
                ("comp_url", Field::CompetitionUrl),
                ("player_name", Field::PlayerName),
                ("player_url", Field::PlayerUrl),
                ("position", Field::Position),
                ("nationality", Field::Nationality),
                ("second_nationality", Field::SecondNationality),
                ("debut_for", Field::Club),
                ("opponent", Field::Opponent),
                ("debut_type", Field::DebutType),
                ("debut_date", Field::DebutDate),
                ("debut_month", Field::DebutMonth),
                ("goals_for", Field::GoalsFor),
                ("goals_against", Field::GoalsAgainst),
                ("age_debut", Field::AgeAtDebut),
                ("value_at_debut", Field::ValueAtDebut),
                ("player_market_value", Field::CurrentValue),
                ("appearances", Field::Appearances),
                ("goals", Field::Goals),
                ("minutes_played", Field::MinutesPlayed),
            ]
            .into_iter()
            .map(|(column, field)| (column.to_string(), field)),
        )
    }
}

/// What happens to source columns with no canonical mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedColumns {
    #[default]
    Drop,
    PassThrough,
}

/// Rewrite `field` from `value` to `replacement` when `when_field == when_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRewrite {
    pub field: Field,
    pub value: String,
    pub when_field: Field,
    pub when_value: String,
    pub replacement: String,
}

impl ConditionalRewrite {
    /// The German top flight is listed as plain "Bundesliga" in the source,
    /// which collides with the Austrian league of the same name.
    pub fn bundesliga() -> Self {
        Self {
            field: Field::Competition,
            value: "Bundesliga".into(),
            when_field: Field::Country,
            when_value: "Germany".into(),
            replacement: "1. Bundesliga".into(),
        }
    }

    fn apply(&self, record: &mut Record) {
        if record.text(self.field) != Some(self.value.as_str())
            || record.text(self.when_field) != Some(self.when_value.as_str())
        {
            return;
        }
        if let Some(slot) = record.text_slot_mut(self.field) {
            *slot = Some(self.replacement.clone());
        }
    }
}

/// Normalizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub unmapped: UnmappedColumns,
    pub key_separator: String,
    pub columns: ColumnMapping,
    pub rewrites: Vec<ConditionalRewrite>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            unmapped: UnmappedColumns::default(),
            key_separator: DEFAULT_KEY_SEPARATOR.to_string(),
            columns: ColumnMapping::default(),
            rewrites: vec![ConditionalRewrite::bundesliga()],
        }
    }
}

/// Builds the canonical table from a raw table.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

/// Where a raw column's cells go.
#[derive(Debug, Clone)]
enum ColumnTarget {
    Field(Field),
    Extra(String),
    Skip,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize every row. Missing optional columns are not errors: their
    /// fields are simply absent from the schema and from every record.
    pub fn normalize(&self, raw: &RawTable) -> CanonicalTable {
        let (targets, source_fields, extra_columns) = self.resolve_columns(raw.headers());
        let schema = Schema::from_source_fields(source_fields);

        let records: Vec<Record> = raw
            .rows()
            .iter()
            .map(|row| self.normalize_row(&targets, row))
            .collect();

        tracing::debug!(
            rows = records.len(),
            extra_columns = extra_columns.len(),
            "normalized raw table"
        );
        CanonicalTable::new(schema, records, extra_columns)
    }

    fn resolve_columns(&self, headers: &[String]) -> (Vec<ColumnTarget>, Vec<Field>, Vec<String>) {
        let mut seen: HashSet<Field> = HashSet::new();
        let mut seen_extra: HashSet<String> = HashSet::new();
        let mut fields = Vec::new();
        let mut extra_columns = Vec::new();

        let targets = headers
            .iter()
            .map(|header| {
                let header = header.trim();
                match self.config.columns.get(header) {
                    Some(field) if field.is_derived() => {
                        tracing::warn!(column = header, ?field, "column maps to a derived field; ignored");
                        ColumnTarget::Skip
                    }
                    Some(field) if !seen.insert(field) => {
                        tracing::warn!(column = header, ?field, "duplicate column for field; keeping first");
                        ColumnTarget::Skip
                    }
                    Some(field) => {
                        fields.push(field);
                        ColumnTarget::Field(field)
                    }
                    None => match self.config.unmapped {
                        UnmappedColumns::PassThrough if seen_extra.insert(header.to_string()) => {
                            extra_columns.push(header.to_string());
                            ColumnTarget::Extra(header.to_string())
                        }
                        _ => ColumnTarget::Skip,
                    },
                }
            })
            .collect();

        (targets, fields, extra_columns)
    }

    fn normalize_row(&self, targets: &[ColumnTarget], row: &[Option<String>]) -> Record {
        let mut record = Record::default();

        for (target, cell) in targets.iter().zip(row) {
            let Some(cell) = cell.as_deref() else {
                continue;
            };
            match target {
                ColumnTarget::Field(field) => assign(&mut record, *field, cell),
                ColumnTarget::Extra(name) => {
                    record.extra.insert(name.clone(), cell.to_string());
                }
                ColumnTarget::Skip => {}
            }
        }

        if let Some(date) = record.debut_date {
            record.debut_year = Some(date.year());
            if record.debut_month.is_none() {
                record.debut_month = Some(month_name(date).to_string());
            }
        }

        for rewrite in &self.config.rewrites {
            rewrite.apply(&mut record);
        }

        if let Some(competition) = record.competition.as_deref() {
            let country = record.country.as_deref().unwrap_or("");
            record.filter_key = Some(compound_key(competition, country, &self.config.key_separator));
            record.display_label = Some(compound_label(competition, record.country.as_deref()));
        }

        record
    }
}

/// Filter key for a (competition, country) pair.
pub fn compound_key(competition: &str, country: &str, separator: &str) -> String {
    format!("{competition}{separator}{country}")
}

/// Display label for a (competition, country) pair.
pub fn compound_label(competition: &str, country: Option<&str>) -> String {
    match country {
        Some(country) => format!("{competition} ({country})"),
        None => competition.to_string(),
    }
}

fn assign(record: &mut Record, field: Field, cell: &str) {
    match field {
        Field::DebutDate => record.debut_date = parse_date(cell),
        Field::AgeAtDebut => record.age_at_debut = parse_count(cell),
        Field::GoalsFor => record.goals_for = parse_count(cell),
        Field::GoalsAgainst => record.goals_against = parse_count(cell),
        Field::Appearances => record.appearances = parse_count(cell),
        Field::Goals => record.goals = parse_count(cell),
        Field::MinutesPlayed => record.minutes_played = parse_count(cell),
        Field::ValueAtDebut => record.value_at_debut = parse_money(cell),
        Field::CurrentValue => record.current_value = parse_money(cell),
        other => {
            if let Some(slot) = record.text_slot_mut(other) {
                *slot = Some(cell.to_string());
            }
        }
    }
}
