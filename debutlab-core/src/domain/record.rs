//! Record: one player debut.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::schema::{Field, FieldKind};

/// One debut event with its primitive fields and the fields derived from them.
///
/// Derived fields (`debut_year`, `filter_key`, `display_label`,
/// `percent_change`) depend only on this record's own primitive fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub competition: Option<String>,
    pub country: Option<String>,
    pub competition_url: Option<String>,
    pub player_name: Option<String>,
    pub player_url: Option<String>,
    pub position: Option<String>,
    pub nationality: Option<String>,
    pub second_nationality: Option<String>,
    pub club: Option<String>,
    pub opponent: Option<String>,
    pub debut_type: Option<String>,

    pub debut_date: Option<NaiveDate>,
    pub debut_year: Option<i32>,
    pub debut_month: Option<String>,

    pub age_at_debut: Option<u32>,
    pub goals_for: Option<u32>,
    pub goals_against: Option<u32>,
    pub appearances: Option<u32>,
    pub goals: Option<u32>,
    pub minutes_played: Option<u32>,

    /// Baseline value.
    pub value_at_debut: Option<f64>,
    /// Current value.
    pub current_value: Option<f64>,
    /// Set by the derivation stage; absent on canonical records.
    pub percent_change: Option<f64>,

    pub filter_key: Option<String>,
    pub display_label: Option<String>,

    /// Unmapped source columns kept under their raw header.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Record {
    /// Text value of a text field. `None` for absent values and non-text fields.
    pub fn text(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Competition => &self.competition,
            Field::Country => &self.country,
            Field::CompetitionUrl => &self.competition_url,
            Field::PlayerName => &self.player_name,
            Field::PlayerUrl => &self.player_url,
            Field::Position => &self.position,
            Field::Nationality => &self.nationality,
            Field::SecondNationality => &self.second_nationality,
            Field::Club => &self.club,
            Field::Opponent => &self.opponent,
            Field::DebutType => &self.debut_type,
            Field::DebutMonth => &self.debut_month,
            Field::FilterKey => &self.filter_key,
            Field::DisplayLabel => &self.display_label,
            _ => return None,
        };
        value.as_deref()
    }

    /// Mutable slot of a text field, used by the normalizer's rewrite step.
    pub fn text_slot_mut(&mut self, field: Field) -> Option<&mut Option<String>> {
        let slot = match field {
            Field::Competition => &mut self.competition,
            Field::Country => &mut self.country,
            Field::CompetitionUrl => &mut self.competition_url,
            Field::PlayerName => &mut self.player_name,
            Field::PlayerUrl => &mut self.player_url,
            Field::Position => &mut self.position,
            Field::Nationality => &mut self.nationality,
            Field::SecondNationality => &mut self.second_nationality,
            Field::Club => &mut self.club,
            Field::Opponent => &mut self.opponent,
            Field::DebutType => &mut self.debut_type,
            Field::DebutMonth => &mut self.debut_month,
            Field::FilterKey => &mut self.filter_key,
            Field::DisplayLabel => &mut self.display_label,
            _ => return None,
        };
        Some(slot)
    }

    /// Integer value of an integer field.
    pub fn integer(&self, field: Field) -> Option<i64> {
        match field {
            Field::DebutYear => self.debut_year.map(i64::from),
            Field::AgeAtDebut => self.age_at_debut.map(i64::from),
            Field::GoalsFor => self.goals_for.map(i64::from),
            Field::GoalsAgainst => self.goals_against.map(i64::from),
            Field::Appearances => self.appearances.map(i64::from),
            Field::Goals => self.goals.map(i64::from),
            Field::MinutesPlayed => self.minutes_played.map(i64::from),
            _ => None,
        }
    }

    /// Monetary or percentage value of a float field.
    pub fn number(&self, field: Field) -> Option<f64> {
        match field {
            Field::ValueAtDebut => self.value_at_debut,
            Field::CurrentValue => self.current_value,
            Field::PercentChange => self.percent_change,
            _ => None,
        }
    }

    /// Value of a field as a categorical label, for membership filters and
    /// option lists.
    pub fn category(&self, field: Field) -> Option<Cow<'_, str>> {
        match field.kind() {
            FieldKind::Text => self.text(field).map(Cow::Borrowed),
            FieldKind::Integer => self.integer(field).map(|v| Cow::Owned(v.to_string())),
            FieldKind::Date => self
                .debut_date
                .map(|d| Cow::Owned(d.format("%Y-%m-%d").to_string())),
            FieldKind::Money | FieldKind::Percent => None,
        }
    }
}
