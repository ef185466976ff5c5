//! Pipeline: filter, derive, annotate, format.
//!
//! A run reads the canonical table and returns a fresh presentation table. It
//! performs no I/O and never mutates its input, so repeated runs over the same
//! table and criteria produce identical output.

use crate::annotate::annotate;
use crate::derive::derive;
use crate::domain::CanonicalTable;
use crate::filter::{filter_table, Criteria};
use crate::format::DisplayOptions;
use crate::present::{Column, PresentationTable};

pub fn run_pipeline(
    table: &CanonicalTable,
    criteria: &Criteria,
    options: &DisplayOptions,
) -> PresentationTable {
    let filtered = filter_table(table, criteria);
    tracing::debug!(
        canonical = table.len(),
        filtered = filtered.len(),
        "filter stage"
    );

    let derived = derive(&filtered);
    let annotation = annotate(&derived);
    let columns = Column::for_schema(&table.schema, &table.extra_columns);

    PresentationTable::build(columns, derived, &annotation, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::Highlight;
    use crate::domain::RawTable;
    use crate::filter::{AgeRange, Selection};
    use crate::normalize::Normalizer;

    fn canonical() -> CanonicalTable {
        let raw = RawTable::from_strs(
            &[
                "comp_name",
                "country",
                "player_name",
                "age_debut",
                "value_at_debut",
                "player_market_value",
            ],
            &[
                &["Serie A", "Italy", "Rossi", "19", "1000000", "1500000"],
                &["Bundesliga", "Germany", "Müller", "17", "", "500000"],
                &["Serie A", "Italy", "Bianchi", "22", "800000", "400000"],
            ],
        )
        .unwrap();
        Normalizer::default().normalize(&raw)
    }

    #[test]
    fn default_criteria_keep_every_row() {
        let table = canonical();
        let out = run_pipeline(&table, &Criteria::default(), &DisplayOptions::default());
        assert_eq!(out.row_count(), 3);
        assert_eq!(
            out.headers(),
            vec![
                "Competition",
                "Country",
                "Player Name",
                "Age at Debut",
                "Value at Debut",
                "Current Market Value",
                "Value Change",
            ]
        );
    }

    #[test]
    fn filtered_rows_are_derived_and_annotated() {
        let table = canonical();
        let criteria = Criteria {
            competitions: Selection::from_values(["Serie A|Italy"]),
            age: Some(AgeRange::new(18, 23)),
            ..Default::default()
        };
        let out = run_pipeline(&table, &criteria, &DisplayOptions::default());
        assert_eq!(out.row_count(), 2);

        let value_col = out.column_index("Current Market Value").unwrap();
        let change_col = out.column_index("Value Change").unwrap();
        assert_eq!(out.rows[0].cells[value_col], "€1,500,000 (+50.0%)");
        assert_eq!(out.rows[0].cells[change_col], "+50.0%");
        assert_eq!(out.rows[0].highlight, Highlight::Increased);
        assert_eq!(out.rows[1].cells[change_col], "-50.0%");
        assert_eq!(out.rows[1].highlight, Highlight::Decreased);
    }

    #[test]
    fn canonical_table_is_not_mutated() {
        let table = canonical();
        let before = table.clone();
        let _ = run_pipeline(&table, &Criteria::default(), &DisplayOptions::default());
        assert_eq!(table, before);
        assert!(table.records.iter().all(|r| r.percent_change.is_none()));
    }
}
