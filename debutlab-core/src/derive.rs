//! Derivation engine: value change between baseline and current value.

use crate::domain::Record;

/// Percentage change from `baseline` to `current`.
///
/// Absent unless both values are present and the baseline is non-zero.
pub fn percent_change(baseline: Option<f64>, current: Option<f64>) -> Option<f64> {
    let baseline = baseline?;
    let current = current?;
    if baseline == 0.0 {
        return None;
    }
    Some((current - baseline) / baseline * 100.0)
}

/// Return new records with `percent_change` filled in from the numeric fields.
pub fn derive(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .map(|r| Record {
            percent_change: percent_change(r.value_at_debut, r.current_value),
            ..r.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_percent_gain() {
        assert_eq!(percent_change(Some(1_000_000.0), Some(1_500_000.0)), Some(50.0));
    }

    #[test]
    fn loss_is_negative() {
        let pct = percent_change(Some(200.0), Some(150.0)).unwrap();
        assert!((pct + 25.0).abs() < 1e-9);
    }

    #[test]
    fn missing_or_zero_baseline_is_absent() {
        assert_eq!(percent_change(None, Some(500_000.0)), None);
        assert_eq!(percent_change(Some(0.0), Some(500_000.0)), None);
        assert_eq!(percent_change(Some(100.0), None), None);
    }

    #[test]
    fn derive_keeps_inputs_untouched() {
        let input = vec![Record {
            value_at_debut: Some(100.0),
            current_value: Some(110.0),
            ..Default::default()
        }];
        let derived = derive(&input);
        assert_eq!(input[0].percent_change, None);
        let pct = derived[0].percent_change.unwrap();
        assert!((pct - 10.0).abs() < 1e-9);
        assert_eq!(derived[0].current_value, Some(110.0));
    }
}
