//! Canonical field catalogue and per-table schema.
//!
//! Every stage asks the [`Schema`] whether a field exists instead of probing
//! raw columns. A field missing from the source is missing from every record,
//! and operations that reference it degrade to a no-op.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Semantic type of a canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Date,
    Integer,
    Money,
    Percent,
}

/// A canonical record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Competition,
    Country,
    CompetitionUrl,
    PlayerName,
    PlayerUrl,
    Position,
    Nationality,
    SecondNationality,
    Club,
    Opponent,
    DebutType,
    DebutDate,
    DebutYear,
    DebutMonth,
    AgeAtDebut,
    GoalsFor,
    GoalsAgainst,
    Appearances,
    Goals,
    MinutesPlayed,
    ValueAtDebut,
    CurrentValue,
    PercentChange,
    FilterKey,
    DisplayLabel,
}

impl Field {
    /// Fields shown in the presentation table, in column order.
    pub const DISPLAY: [Field; 20] = [
        Field::Competition,
        Field::Country,
        Field::PlayerName,
        Field::Position,
        Field::Nationality,
        Field::SecondNationality,
        Field::Club,
        Field::Opponent,
        Field::DebutType,
        Field::DebutDate,
        Field::DebutMonth,
        Field::AgeAtDebut,
        Field::GoalsFor,
        Field::GoalsAgainst,
        Field::Appearances,
        Field::Goals,
        Field::MinutesPlayed,
        Field::ValueAtDebut,
        Field::CurrentValue,
        Field::PercentChange,
    ];

    /// Column header used for display and export.
    pub fn header(self) -> &'static str {
        match self {
            Field::Competition => "Competition",
            Field::Country => "Country",
            Field::CompetitionUrl => "Competition URL",
            Field::PlayerName => "Player Name",
            Field::PlayerUrl => "Player URL",
            Field::Position => "Position",
            Field::Nationality => "Nationality",
            Field::SecondNationality => "Second Nationality",
            Field::Club => "Debut Club",
            Field::Opponent => "Opponent",
            Field::DebutType => "Debut Type",
            Field::DebutDate => "Debut Date",
            Field::DebutYear => "Debut Year",
            Field::DebutMonth => "Debut Month",
            Field::AgeAtDebut => "Age at Debut",
            Field::GoalsFor => "Goals For",
            Field::GoalsAgainst => "Goals Against",
            Field::Appearances => "Appearances",
            Field::Goals => "Goals",
            Field::MinutesPlayed => "Minutes Played",
            Field::ValueAtDebut => "Value at Debut",
            Field::CurrentValue => "Current Market Value",
            Field::PercentChange => "Value Change",
            Field::FilterKey => "Competition Key",
            Field::DisplayLabel => "Competition (Country)",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::DebutDate => FieldKind::Date,
            Field::DebutYear
            | Field::AgeAtDebut
            | Field::GoalsFor
            | Field::GoalsAgainst
            | Field::Appearances
            | Field::Goals
            | Field::MinutesPlayed => FieldKind::Integer,
            Field::ValueAtDebut | Field::CurrentValue => FieldKind::Money,
            Field::PercentChange => FieldKind::Percent,
            _ => FieldKind::Text,
        }
    }

    /// True for fields computed by the pipeline rather than read from the source.
    pub fn is_derived(self) -> bool {
        matches!(
            self,
            Field::DebutYear | Field::PercentChange | Field::FilterKey | Field::DisplayLabel
        )
    }
}

/// The set of canonical fields present in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: BTreeSet<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from source fields, adding the fields derived from them.
    pub fn from_source_fields(fields: impl IntoIterator<Item = Field>) -> Self {
        let mut schema = Schema {
            fields: fields.into_iter().collect(),
        };
        if schema.contains(Field::DebutDate) {
            schema.fields.insert(Field::DebutYear);
            schema.fields.insert(Field::DebutMonth);
        }
        if schema.contains(Field::Competition) {
            schema.fields.insert(Field::FilterKey);
            schema.fields.insert(Field::DisplayLabel);
        }
        if schema.contains(Field::ValueAtDebut) && schema.contains(Field::CurrentValue) {
            schema.fields.insert(Field::PercentChange);
        }
        schema
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().copied()
    }

    /// Display columns present in this schema, in display order.
    pub fn display_fields(&self) -> Vec<Field> {
        Field::DISPLAY
            .iter()
            .copied()
            .filter(|f| self.contains(*f))
            .collect()
    }
}
