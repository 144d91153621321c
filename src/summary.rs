//! Scalar summary of a processed run.
//!
//! Serialized field names follow the original report keys consumed downstream.

use serde::Serialize;

use crate::metrics::ProcessedRecord;
use crate::peaks::PeakRecord;

/// Scalar aggregate over one topology's processed records and peaks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    /// Mean effective reproduction rate over non-missing values; 0 when all
    /// values are missing.
    pub r0_efectivo: f64,
    /// Largest peak infected count across regions.
    pub max_infectados: f64,
    /// Mean of the per-region peak days.
    pub dia_pico_promedio: f64,
    /// Mean recovered count across regions on the global final day.
    pub recuperados_finales: f64,
    /// Span in days between the earliest and latest regional peak.
    pub tiempo_epidemia: u32,
}

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Folds processed records and peaks into a [`SummaryReport`].
pub fn reduce(records: &[ProcessedRecord], peaks: &[PeakRecord]) -> SummaryReport {
    let effective: Vec<f64> = records.iter().filter_map(|r| r.effective_r).collect();
    let r0 = mean(&effective);

    let max_infectados = peaks
        .iter()
        .map(|p| p.max_infected)
        .fold(f64::NEG_INFINITY, f64::max);
    let max_infectados = if max_infectados.is_finite() {
        max_infectados
    } else {
        0.0
    };

    let peak_days: Vec<f64> = peaks.iter().map(|p| f64::from(p.peak_day)).collect();

    let final_day = records.iter().map(|r| r.day).max().unwrap_or(0);
    let finals: Vec<f64> = records
        .iter()
        .filter(|r| r.day == final_day)
        .map(|r| r.r)
        .collect();

    let earliest = peaks.iter().map(|p| p.peak_day).min().unwrap_or(0);
    let latest = peaks.iter().map(|p| p.peak_day).max().unwrap_or(0);

    SummaryReport {
        r0_efectivo: if r0.is_finite() { r0 } else { 0.0 },
        max_infectados,
        dia_pico_promedio: mean(&peak_days),
        recuperados_finales: mean(&finals),
        tiempo_epidemia: latest - earliest,
    }
}

/// Number of days a region's infected share of the total exceeds
/// `threshold_pct` percent.
pub fn days_above_pct(records: &[ProcessedRecord], region: u32, threshold_pct: f64) -> usize {
    records
        .iter()
        .filter(|r| r.region == region && r.pct_infected > threshold_pct)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::read_records;
    use crate::metrics::derive_metrics;
    use crate::peaks::extract_peaks;

    fn run(csv: &str) -> (Vec<ProcessedRecord>, Vec<PeakRecord>) {
        let processed = derive_metrics(&read_records(csv.as_bytes()).unwrap());
        let peaks = extract_peaks(&processed);
        (processed, peaks)
    }

    #[test]
    fn test_mean_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_peak_day_mean_and_epidemic_span() {
        // region 0 peaks day 3, region 1 peaks day 7
        let (processed, peaks) = run(
            "Region,Dia,S,I,R\n\
             0,2,0,1,0\n0,3,0,9,0\n0,7,0,2,0\n\
             1,2,0,1,0\n1,3,0,4,0\n1,7,0,8,0\n",
        );
        let report = reduce(&processed, &peaks);

        assert_eq!(report.dia_pico_promedio, 5.0);
        assert_eq!(report.tiempo_epidemia, 4);
        assert_eq!(report.max_infectados, 9.0);
    }

    #[test]
    fn test_final_day_recovered_mean() {
        let (processed, peaks) = run(
            "Region,Dia,S,I,R\n0,0,0,1,0\n0,1,0,1,10\n1,0,0,1,0\n1,1,0,1,30\n",
        );
        let report = reduce(&processed, &peaks);

        assert_eq!(report.recuperados_finales, 20.0);
    }

    #[test]
    fn test_all_missing_effective_r_reports_zero() {
        // S is 0 everywhere, so every effective_r is missing
        let (processed, peaks) = run("Region,Dia,S,I,R\n0,0,0,5,0\n0,1,0,8,0\n");
        let report = reduce(&processed, &peaks);

        assert_eq!(report.r0_efectivo, 0.0);
    }

    #[test]
    fn test_guarded_rows_stay_out_of_r0_mean() {
        // day 1 is the only row with S > 0 and I > 0
        let (processed, peaks) = run(
            "Region,Dia,S,I,R\n0,0,990,10,0\n0,1,970,25,5\n0,2,0,25,5\n",
        );
        let report = reduce(&processed, &peaks);

        let expected = (15.0 / 970.0) * (1000.0 / 25.0);
        assert_eq!(report.r0_efectivo, expected);
        assert!(report.r0_efectivo.is_finite());
    }

    #[test]
    fn test_empty_input_is_all_zeros() {
        let report = reduce(&[], &[]);

        assert_eq!(report.r0_efectivo, 0.0);
        assert_eq!(report.max_infectados, 0.0);
        assert_eq!(report.dia_pico_promedio, 0.0);
        assert_eq!(report.recuperados_finales, 0.0);
        assert_eq!(report.tiempo_epidemia, 0);
    }

    #[test]
    fn test_days_above_pct() {
        let (processed, _) = run(
            "Region,Dia,S,I,R\n0,0,99,1,0\n0,1,90,10,0\n0,2,50,50,0\n",
        );

        assert_eq!(days_above_pct(&processed, 0, 1.0), 2);
        assert_eq!(days_above_pct(&processed, 0, 25.0), 1);
        assert_eq!(days_above_pct(&processed, 1, 1.0), 0);
    }
}
