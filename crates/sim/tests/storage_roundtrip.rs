//! Integration tests for recording projections and reading them back.

use pva_sim::analysis::{ExtinctionCriterion, QuasiExtinctionResult};
use pva_sim::errors::DatabaseError;
use pva_sim::simulation::{ProjectionResult, SimulationBuilder, SimulationConfig};
use pva_sim::storage::{QueryBuilder, Recorder};
use tempfile::tempdir;

fn small_config(seed: u64) -> SimulationConfig {
    SimulationBuilder::new()
        .replicates(12)
        .years(15)
        .initial_population(40.0)
        .birth_rate(0.3)
        .death_rate(0.3)
        .birth_rate_sd(0.05)
        .death_rate_sd(0.05)
        .environmental_stochasticity(true)
        .demographic_stochasticity(true)
        .threshold(30.0)
        .seed(seed)
        .build_config()
        .unwrap()
}

fn run(config: &SimulationConfig) -> ProjectionResult {
    pva_sim::run_projection(config).expect("projection should succeed")
}

#[test]
fn test_result_roundtrip() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("roundtrip.sqlite");
    let config = small_config(42);
    let result = run(&config);

    let mut recorder = Recorder::new(&db_path, &config).unwrap();
    recorder.record_result(&result).unwrap();
    let stats = recorder.close().unwrap();
    assert_eq!(stats.replicates_recorded, 12);
    assert_eq!(stats.rows_written, 12 * 15);

    let query = QueryBuilder::new(&db_path).unwrap();
    assert!(query.has_result().unwrap());
    assert_eq!(query.get_full_config().unwrap(), config);

    let loaded = query.get_result().unwrap();
    assert_eq!(loaded, result);

    let finals = query.get_final_sizes().unwrap();
    assert_eq!(finals.len(), 12);
    for ((id, size), rep) in finals.iter().zip(result.replicates()) {
        assert_eq!(*id, rep.id());
        assert_eq!(*size, rep.final_size());
    }

    let meta = query.get_metadata().unwrap();
    assert_eq!(meta.get("seed").map(String::as_str), Some("42"));
    assert_eq!(meta.get("year_count").map(String::as_str), Some("15"));
    query.close().unwrap();
}

#[test]
fn test_configured_database_has_no_result() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("configured.sqlite");
    let config = small_config(1);

    Recorder::new(&db_path, &config).unwrap().close().unwrap();

    let query = QueryBuilder::new(&db_path).unwrap();
    assert!(!query.has_result().unwrap());
    assert_eq!(query.get_full_config().unwrap(), config);
    assert!(matches!(query.get_result(), Err(DatabaseError::Query(_))));
}

#[test]
fn test_mismatched_result_is_rejected() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("mismatch.sqlite");
    let config = small_config(3);
    let other = run(&small_config(4));

    let mut recorder = Recorder::new(&db_path, &config).unwrap();
    assert!(matches!(
        recorder.record_result(&other),
        Err(DatabaseError::ConfigMismatch)
    ));
    assert_eq!(recorder.stats().rows_written, 0);
}

#[test]
fn test_new_recorder_discards_previous_run() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("rerun.sqlite");

    let first = small_config(10);
    let mut recorder = Recorder::new(&db_path, &first).unwrap();
    recorder.record_result(&run(&first)).unwrap();
    recorder
        .record_extinction(&QuasiExtinctionResult {
            threshold: 30.0,
            probability: 0.5,
            criterion: ExtinctionCriterion::FinalYear,
        })
        .unwrap();
    recorder.close().unwrap();

    let mut second = small_config(11);
    second.replicate_count = 5;
    second.year_count = 8;
    let recorder = Recorder::new(&db_path, &second).unwrap();
    recorder.close().unwrap();

    let query = QueryBuilder::new(&db_path).unwrap();
    let stats = query.database().stats().unwrap();
    assert_eq!(stats.replicate_records, 0);
    assert_eq!(stats.trajectory_records, 0);
    assert_eq!(stats.extinction_records, 0);
    assert_eq!(query.get_full_config().unwrap(), second);
    assert!(!query.has_result().unwrap());
}

#[test]
fn test_extinction_results_roundtrip() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("extinction.sqlite");
    let config = small_config(8);
    let result = run(&config);

    let mut recorder = Recorder::new(&db_path, &config).unwrap();
    recorder.record_result(&result).unwrap();

    let mut expected = Vec::new();
    for criterion in [ExtinctionCriterion::FinalYear, ExtinctionCriterion::RunningMinimum] {
        for t in [10.0, 30.0] {
            let evaluated = QuasiExtinctionResult::evaluate(&result, t, criterion).unwrap();
            recorder.record_extinction(&evaluated).unwrap();
            expected.push(evaluated);
        }
    }
    // Re-recording the same threshold replaces the earlier row
    recorder.record_extinction(&expected[0]).unwrap();
    assert_eq!(recorder.close().unwrap().extinction_results, 5);

    let query = QueryBuilder::new(&db_path).unwrap();
    let mut stored = query.get_extinction_results().unwrap();
    stored.sort_by(|a, b| {
        (a.criterion.as_str(), a.threshold)
            .partial_cmp(&(b.criterion.as_str(), b.threshold))
            .unwrap()
    });
    expected.sort_by(|a, b| {
        (a.criterion.as_str(), a.threshold)
            .partial_cmp(&(b.criterion.as_str(), b.threshold))
            .unwrap()
    });
    assert_eq!(stored, expected);
}
