//! Benchmark state points solved end to end through the session API.

use oz_core::{ClosureKind, PotentialKind, SolutionMethod};
use oz_solver::{Session, SolveConfig, SolverStatus, SpectralConfig, StatePoint};

fn hard_sphere_session() -> Session {
    Session::initialize(500, 10.0, PotentialKind::HardSphere).unwrap()
}

#[test]
fn hard_sphere_percus_yevick_real_space() {
    let mut session = hard_sphere_session();
    session
        .set_state(StatePoint::new(1.0, 0.5), SolveConfig::default())
        .unwrap();
    let report = session.run_to_convergence(None).unwrap();

    assert_eq!(report.status, SolverStatus::Converged);
    assert!(report.iterations <= 1000);
    assert!(report.dg.unwrap() < 1e-5);

    let state = session.state();
    assert_eq!(state.g[0], 0.0);
    assert_eq!(state.h[0], -1.0);
    assert!(state.g.iter().all(|v| v.is_finite()));
}

#[test]
fn hard_sphere_percus_yevick_lm() {
    let mut session = hard_sphere_session();
    let config = SolveConfig {
        method: SolutionMethod::Lm,
        ..SolveConfig::default()
    };
    session.set_state(StatePoint::new(1.0, 0.5), config).unwrap();
    let report = session.run_to_convergence(None).unwrap();

    assert_eq!(report.status, SolverStatus::Converged, "{report:?}");
    let state = session.state();
    // Contact value of g is well above one at this packing fraction.
    let contact = state.g[51];
    assert!(contact > 1.5 && contact < 3.0, "contact value {contact}");
    assert!(state.g[1..49].iter().all(|&g| g == 0.0));
    // Far field decays to the bulk.
    assert!((state.g[490] - 1.0).abs() < 0.05);
}

#[test]
fn lm_carries_reciprocal_state_between_points() {
    let mut session = hard_sphere_session();
    let config = SolveConfig {
        method: SolutionMethod::Lm,
        spectral: SpectralConfig {
            harmonics: 32,
            ..SpectralConfig::default()
        },
        ..SolveConfig::default()
    };
    session.set_state(StatePoint::new(1.0, 0.4), config).unwrap();
    let cold = session.run_to_convergence(None).unwrap();
    session.set_state(StatePoint::new(1.0, 0.41), config).unwrap();
    let warm = session.run_to_convergence(None).unwrap();
    assert!(cold.converged() && warm.converged());
    assert!(warm.iterations <= cold.iterations);
}

#[test]
fn fourier_iteration_converges_for_dilute_hard_spheres() {
    let mut session = hard_sphere_session();
    let config = SolveConfig {
        method: SolutionMethod::Fourier,
        ..SolveConfig::default()
    };
    session.set_state(StatePoint::new(1.0, 0.2), config).unwrap();
    let report = session.run_to_convergence(None).unwrap();
    assert_eq!(report.status, SolverStatus::Converged, "{report:?}");
}

#[test]
fn zero_temperature_is_degenerate_not_fatal() {
    let mut session = Session::initialize(500, 10.0, PotentialKind::LennardJones).unwrap();
    for closure in ClosureKind::ALL {
        let config = SolveConfig {
            closure,
            ..SolveConfig::default()
        };
        session.set_state(StatePoint::new(0.0, 0.5), config).unwrap();
        let report = session.run_to_convergence(None).unwrap();
        assert!(report.status.is_terminal());
        let state = session.state();
        assert!(state.g.iter().all(|v| !v.is_nan()), "{closure}");
        assert!(state.h.iter().all(|v| !v.is_nan()), "{closure}");
        let thermo = session.derive_thermodynamics().unwrap();
        assert!(!thermo.chemical_potential.is_nan());
    }
}

#[test]
fn mhnc_with_zero_bridge_table_runs() {
    let mut session = Session::initialize(500, 10.0, PotentialKind::LennardJones).unwrap();
    session.set_bridge_table(Some(vec![0.0; 10_000]));
    let config = SolveConfig {
        closure: ClosureKind::ModifiedHnc,
        ..SolveConfig::default()
    };
    session.set_state(StatePoint::new(1.5, 0.37), config).unwrap();
    let report = session.run_to_convergence(None).unwrap();
    assert!(report.status.is_terminal());
    assert!(session.state().g.iter().all(|v| v.is_finite()));
}

#[test]
fn thermodynamics_is_idempotent() {
    let mut session = Session::initialize(500, 10.0, PotentialKind::LennardJones).unwrap();
    let config = SolveConfig {
        closure: ClosureKind::Hnc,
        ..SolveConfig::default()
    };
    session.set_state(StatePoint::new(2.0, 0.3), config).unwrap();
    session.run_to_convergence(None).unwrap();

    let before = session.state().clone();
    let first = session.derive_thermodynamics().unwrap();
    let second = session.derive_thermodynamics().unwrap();
    assert_eq!(first.pressure.to_bits(), second.pressure.to_bits());
    assert_eq!(first.energy.to_bits(), second.energy.to_bits());
    assert_eq!(
        first.chemical_potential.to_bits(),
        second.chemical_potential.to_bits()
    );
    assert_eq!(&before, session.state());
    assert!(first.energy < 0.0);
}
