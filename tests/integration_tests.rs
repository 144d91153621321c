use sir_metrics::ingest::read_records;
use sir_metrics::metrics::derive_metrics;
use sir_metrics::peaks::extract_peaks;
use sir_metrics::summary::reduce;
use sir_metrics::topology::{Topology, canned};

#[test]
fn test_full_pipeline() {
    let csv = include_str!("fixtures/resultados_ring.csv");
    let store = read_records(csv.as_bytes()).expect("Failed to ingest fixture");

    let records = derive_metrics(&store);
    let peaks = extract_peaks(&records);
    let summary = reduce(&records, &peaks);
    let graph = canned(Topology::Ring);

    assert_eq!(store.regions(), vec![0, 1, 2]);
    assert_eq!(records.len(), 18);

    // peaks: region 0 day 3 (I=60), region 1 day 3 (I=25), region 2 day 3 (I=22)
    assert_eq!(peaks.len(), 3);
    assert_eq!(peaks[0].peak_day, 3);
    assert_eq!(peaks[0].max_infected, 60.0);
    assert_eq!(peaks[1].max_infected, 25.0);
    assert_eq!(peaks[2].max_infected, 22.0);

    assert_eq!(summary.max_infectados, 60.0);
    assert_eq!(summary.dia_pico_promedio, 3.0);
    assert_eq!(summary.tiempo_epidemia, 0);
    // final-day R: (85 + 36 + 31) / 3
    assert!((summary.recuperados_finales - 152.0 / 3.0).abs() < 1e-9);
    assert!(summary.r0_efectivo.is_finite());

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn test_pipeline_is_pure() {
    let csv = include_str!("fixtures/resultados_ring.csv");

    let run = || {
        let store = read_records(csv.as_bytes()).unwrap();
        let records = derive_metrics(&store);
        let peaks = extract_peaks(&records);
        let summary = reduce(&records, &peaks);
        (records, peaks, summary)
    };

    assert_eq!(run(), run());
}
