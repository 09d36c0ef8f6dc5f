use oz_project::{GridDef, RangeDef, RunConfig};
use oz_results::*;
use oz_sweep::execute_sweep;

fn manifest(run_id: &str, timestamp: &str) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        name: "test".to_string(),
        timestamp: timestamp.to_string(),
        solver_version: "v1".to_string(),
        potential: "HS".to_string(),
        closure: "PY".to_string(),
        method: "real_space".to_string(),
        grid_points: 100,
        domain_length: 5.0,
        total_points: 1,
        converged_points: 1,
        cancelled: false,
    }
}

fn point(density: f64) -> PointRecord {
    PointRecord {
        index: 0,
        temperature: 1.0,
        density,
        status: "converged".to_string(),
        iterations: 42,
        dg: Some(9.5e-6),
        g_max: 1.8,
        h_max: 0.8,
        bridge_fallback: false,
        thermo: ThermoRecord {
            pressure: 0.3,
            pressure_moment: 0.35,
            energy: 0.0,
            chemical_potential: -0.4,
            temperature: 1.0,
            density,
        },
        profile: None,
    }
}

#[test]
fn save_and_load_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = RunStore::new(dir.path().join("runs")).unwrap();
    let m = manifest("abc", "2026-01-01T00:00:00+00:00");
    store.save_run(&m, &[point(0.3), point(0.4)]).unwrap();

    assert!(store.has_run("abc"));
    assert_eq!(store.load_manifest("abc").unwrap(), m);
    let points = store.load_points("abc").unwrap();
    assert_eq!(points, vec![point(0.3), point(0.4)]);
}

#[test]
fn missing_run_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let store = RunStore::new(dir.path().to_path_buf()).unwrap();
    assert!(matches!(
        store.load_manifest("nope"),
        Err(ResultsError::RunNotFound { .. })
    ));
}

#[test]
fn list_and_delete_runs() {
    let dir = tempfile::tempdir().unwrap();
    let store = RunStore::new(dir.path().to_path_buf()).unwrap();
    store
        .save_run(&manifest("b", "2026-01-02T00:00:00+00:00"), &[])
        .unwrap();
    store
        .save_run(&manifest("a", "2026-01-01T00:00:00+00:00"), &[])
        .unwrap();
    let ids: Vec<_> = store.list_runs().unwrap().into_iter().map(|m| m.run_id).collect();
    assert_eq!(ids, vec!["a", "b"]);
    store.delete_run("a").unwrap();
    assert!(!store.has_run("a"));
    assert_eq!(store.list_runs().unwrap().len(), 1);
}

#[test]
fn sweep_record_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        grid: GridDef {
            points: 100,
            length: 5.0,
        },
        potential: oz_core::PotentialKind::HardSphere,
        temperature: RangeDef::single(1.0),
        density: RangeDef::single(0.3),
        ..RunConfig::default()
    };
    let outcome = execute_sweep(&config, None, None).unwrap();
    let record = RunRecord::from_outcome(&config, &outcome, true);
    assert_eq!(record.manifest.run_id, compute_run_id(&config, SOLVER_VERSION));
    assert_eq!(record.points.len(), 1);
    let profile = record.points[0].profile.as_ref().unwrap();
    assert_eq!(profile.g.len(), 100);

    let path = dir.path().join("result.json");
    save_results(&path, &record).unwrap();
    assert_eq!(load_results(&path).unwrap(), record);

    let store = RunStore::new(dir.path().join("runs")).unwrap();
    store.save_record(&record).unwrap();
    assert_eq!(store.load_record(&record.manifest.run_id).unwrap(), record);
}
