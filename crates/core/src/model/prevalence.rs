use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use thiserror::Error;
use timesweep_protocol::{GenotypeId, PrevalenceRecord};

/// Label of the synthetic timepoint preceding every observation.
pub const ORIGIN_TIMEPOINT: &str = "T0";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrevalenceError {
    #[error("timepoint label {0:?} is reserved for the synthetic origin")]
    ReservedTimepoint(String),
}

/// Sparse prevalence observations reshaped into time- and genotype-indexed
/// lookups. Index 0 is always the synthetic origin and holds no data.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PrevalenceTable {
    timepoints: Vec<String>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
    by_timepoint: Vec<BTreeMap<GenotypeId, f64>>,
    /// Chronological `(timepoint index, prevalence)` pairs per genotype.
    by_genotype: BTreeMap<GenotypeId, Vec<(usize, f64)>>,
}

impl PrevalenceTable {
    /// Reshape raw records.
    ///
    /// `order` fixes the chronology when given; timepoints that only appear
    /// in the records are appended after it. Zero observations mean absence
    /// and are dropped; so are negative or non-finite values. A repeated
    /// `(timepoint, genotype)` pair keeps the last value.
    pub fn from_records(
        records: &[PrevalenceRecord],
        order: Option<&[String]>,
    ) -> Result<Self, PrevalenceError> {
        let mut timepoints = vec![ORIGIN_TIMEPOINT.to_string()];
        let mut positions = HashMap::from([(ORIGIN_TIMEPOINT.to_string(), 0)]);

        let mut push_timepoint = |tp: &str, timepoints: &mut Vec<String>| {
            if !positions.contains_key(tp) {
                positions.insert(tp.to_string(), timepoints.len());
                timepoints.push(tp.to_string());
                true
            } else {
                false
            }
        };

        for tp in order.unwrap_or_default() {
            if tp == ORIGIN_TIMEPOINT {
                return Err(PrevalenceError::ReservedTimepoint(tp.clone()));
            }
            push_timepoint(tp, &mut timepoints);
        }
        for record in records {
            if record.timepoint == ORIGIN_TIMEPOINT {
                return Err(PrevalenceError::ReservedTimepoint(record.timepoint.clone()));
            }
            if push_timepoint(&record.timepoint, &mut timepoints) && order.is_some() {
                tracing::warn!(
                    timepoint = %record.timepoint,
                    "timepoint missing from the explicit order, appended at the end"
                );
            }
        }

        let mut by_timepoint = vec![BTreeMap::new(); timepoints.len()];
        for record in records {
            let value = record.clonal_prev;
            if value == 0.0 {
                continue;
            }
            if !value.is_finite() || value < 0.0 {
                tracing::warn!(
                    timepoint = %record.timepoint,
                    genotype = %record.clone_id,
                    value,
                    "ignoring invalid prevalence"
                );
                continue;
            }
            let tp = positions[&record.timepoint];
            by_timepoint[tp].insert(record.clone_id.clone(), value);
        }

        let mut by_genotype: BTreeMap<GenotypeId, Vec<(usize, f64)>> = BTreeMap::new();
        for (tp, column) in by_timepoint.iter().enumerate() {
            for (genotype, &value) in column {
                by_genotype.entry(genotype.clone()).or_default().push((tp, value));
            }
        }

        tracing::debug!(
            timepoints = timepoints.len(),
            genotypes = by_genotype.len(),
            "reshaped prevalence records"
        );

        Ok(Self {
            timepoints,
            positions,
            by_timepoint,
            by_genotype,
        })
    }

    /// Chronological timepoint labels, origin first.
    pub fn timepoints(&self) -> &[String] {
        &self.timepoints
    }

    pub fn timepoint_index(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// Observed prevalence of `genotype` at timepoint index `tp`.
    pub fn get(&self, tp: usize, genotype: &str) -> Option<f64> {
        self.by_timepoint.get(tp)?.get(genotype).copied()
    }

    pub fn is_observed(&self, tp: usize, genotype: &str) -> bool {
        self.get(tp, genotype).is_some()
    }

    /// Every observation at timepoint index `tp`.
    pub fn at(&self, tp: usize) -> Option<&BTreeMap<GenotypeId, f64>> {
        self.by_timepoint.get(tp)
    }

    /// Chronological observations of one genotype, by timepoint label.
    pub fn of_genotype(&self, genotype: &str) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.by_genotype
            .get(genotype)
            .into_iter()
            .flatten()
            .map(|&(tp, value)| (self.timepoints[tp].as_str(), value))
    }

    /// Genotypes with at least one observation.
    pub fn genotypes(&self) -> impl Iterator<Item = &GenotypeId> {
        self.by_genotype.keys()
    }

    /// Prevalence at the first timepoint the genotype was observed.
    pub fn emergence_value(&self, genotype: &str) -> Option<f64> {
        self.by_genotype.get(genotype)?.first().map(|&(_, v)| v)
    }

    pub fn max_prevalence(&self, genotype: &str) -> Option<f64> {
        self.by_genotype
            .get(genotype)?
            .iter()
            .map(|&(_, v)| v)
            .reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(tp: &str, g: &str, p: f64) -> PrevalenceRecord {
        PrevalenceRecord::new(tp, g, p)
    }

    fn table(records: &[PrevalenceRecord]) -> PrevalenceTable {
        PrevalenceTable::from_records(records, None).unwrap()
    }

    #[test]
    fn origin_is_prepended() {
        let t = table(&[rec("Dx", "A", 1.0), rec("Rx", "A", 0.5)]);
        assert_eq!(t.timepoints(), ["T0", "Dx", "Rx"]);
        assert_eq!(t.timepoint_index("Rx"), Some(2));
        assert!(t.at(0).is_some_and(BTreeMap::is_empty));
    }

    #[test]
    fn zero_means_absent() {
        let t = table(&[rec("Dx", "A", 1.0), rec("Dx", "B", 0.0)]);
        assert!(t.is_observed(1, "A"));
        assert!(!t.is_observed(1, "B"));
        assert_eq!(t.genotypes().count(), 1);
    }

    #[test]
    fn invalid_values_dropped() {
        let t = table(&[rec("Dx", "A", f64::NAN), rec("Dx", "B", -0.2), rec("Dx", "C", 0.3)]);
        assert_eq!(t.get(1, "A"), None);
        assert_eq!(t.get(1, "B"), None);
        assert_eq!(t.get(1, "C"), Some(0.3));
    }

    #[test]
    fn transpose_and_emergence() {
        let t = table(&[
            rec("T1", "A", 0.9),
            rec("T2", "A", 0.4),
            rec("T2", "B", 0.6),
            rec("T3", "B", 0.8),
        ]);
        let a: Vec<(&str, f64)> = t.of_genotype("A").collect();
        assert_eq!(a, vec![("T1", 0.9), ("T2", 0.4)]);
        assert_eq!(t.emergence_value("B"), Some(0.6));
        assert_eq!(t.max_prevalence("B"), Some(0.8));
        assert_eq!(t.emergence_value("Z"), None);
    }

    #[test]
    fn explicit_order_wins() {
        let order = vec!["T2".to_string(), "T1".to_string()];
        let t = PrevalenceTable::from_records(
            &[rec("T1", "A", 0.5), rec("T2", "A", 0.5), rec("T3", "A", 0.5)],
            Some(&order),
        )
        .unwrap();
        assert_eq!(t.timepoints(), ["T0", "T2", "T1", "T3"]);
    }

    #[test]
    fn last_duplicate_wins() {
        let t = table(&[rec("Dx", "A", 0.2), rec("Dx", "A", 0.7)]);
        assert_eq!(t.get(1, "A"), Some(0.7));
    }

    #[test]
    fn origin_label_is_reserved() {
        let err = PrevalenceTable::from_records(&[rec("T0", "A", 1.0)], None).err();
        assert_eq!(err, Some(PrevalenceError::ReservedTimepoint("T0".into())));
    }
}
