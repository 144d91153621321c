//! Reduction of a processed dataset to one peak-infection record per region.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::PipelineError;
use crate::metrics::ProcessedRecord;

/// The day a region's infected count peaked and the value it reached.
/// Ties resolve to the earliest day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakRecord {
    pub region: u32,
    pub peak_day: u32,
    pub max_infected: f64,
}

/// Extracts one [`PeakRecord`] per region, in ascending region order.
///
/// The running maximum uses a strictly-greater comparison, so the first day
/// attaining the maximum wins.
pub fn extract_peaks(records: &[ProcessedRecord]) -> Vec<PeakRecord> {
    let mut best: BTreeMap<u32, (u32, f64)> = BTreeMap::new();

    for rec in records {
        match best.get(&rec.region) {
            Some((_, max_i)) if rec.i <= *max_i => {}
            _ => {
                best.insert(rec.region, (rec.day, rec.i));
            }
        }
    }

    best.into_iter()
        .map(|(region, (peak_day, max_infected))| PeakRecord {
            region,
            peak_day,
            max_infected,
        })
        .collect()
}

/// Peak for a single region. Errors with [`PipelineError::EmptyGroup`] when
/// the region has no records.
pub fn peak_for_region(
    records: &[ProcessedRecord],
    region: u32,
) -> Result<PeakRecord, PipelineError> {
    let mut peak: Option<(u32, f64)> = None;

    for rec in records.iter().filter(|r| r.region == region) {
        match peak {
            Some((_, max_i)) if rec.i <= max_i => {}
            _ => peak = Some((rec.day, rec.i)),
        }
    }

    let (peak_day, max_infected) = peak.ok_or(PipelineError::EmptyGroup { region })?;
    Ok(PeakRecord {
        region,
        peak_day,
        max_infected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::read_records;
    use crate::metrics::derive_metrics;

    fn processed_from(csv: &str) -> Vec<ProcessedRecord> {
        derive_metrics(&read_records(csv.as_bytes()).unwrap())
    }

    #[test]
    fn test_peak_tie_breaks_to_earliest_day() {
        let processed = processed_from(
            "Region,Dia,S,I,R\n0,0,0,5,0\n0,1,0,12,0\n0,2,0,8,0\n0,3,0,12,0\n0,4,0,3,0\n",
        );
        let peaks = extract_peaks(&processed);

        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].peak_day, 1);
        assert_eq!(peaks[0].max_infected, 12.0);
    }

    #[test]
    fn test_one_peak_per_region() {
        let processed = processed_from(
            "Region,Dia,S,I,R\n0,0,0,5,0\n0,1,0,9,0\n1,0,0,20,0\n1,1,0,3,0\n",
        );
        let peaks = extract_peaks(&processed);

        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks[0], PeakRecord { region: 0, peak_day: 1, max_infected: 9.0 });
        assert_eq!(peaks[1], PeakRecord { region: 1, peak_day: 0, max_infected: 20.0 });
    }

    #[test]
    fn test_peak_for_missing_region_is_empty_group() {
        let processed = processed_from("Region,Dia,S,I,R\n0,0,0,5,0\n");
        let err = peak_for_region(&processed, 7).unwrap_err();

        assert!(matches!(err, PipelineError::EmptyGroup { region: 7 }));
    }

    #[test]
    fn test_peak_for_region_matches_extract() {
        let processed = processed_from("Region,Dia,S,I,R\n0,0,0,5,0\n0,1,0,9,0\n");
        let single = peak_for_region(&processed, 0).unwrap();
        let all = extract_peaks(&processed);

        assert_eq!(single, all[0]);
    }
}
