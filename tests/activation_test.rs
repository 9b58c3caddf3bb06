use std::sync::Arc;

use buildledger_core::activation::{
    ActivationOutcome, ActivationRepository, ActivationRepositoryTrait, ActivationService,
    ActivationServiceTrait,
};
use buildledger_core::errors::Error;
use buildledger_core::materials::{MaterialRepository, MaterialRepositoryTrait};
use buildledger_core::projects::{
    NewPhase, NewProject, NewProjectFinances, ProjectRepository, ProjectRepositoryTrait,
};

mod common;

struct Fixture {
    material_repo: Arc<dyn MaterialRepositoryTrait>,
    project_repo: Arc<dyn ProjectRepositoryTrait>,
    service: ActivationService,
}

fn fixture(test_id: &str) -> Fixture {
    let ctx = common::setup_test_db(test_id);
    let material_repo: Arc<dyn MaterialRepositoryTrait> = Arc::new(MaterialRepository::new(
        ctx.pool.clone(),
        ctx.writer.clone(),
    ));
    let project_repo: Arc<dyn ProjectRepositoryTrait> = Arc::new(ProjectRepository::new(
        ctx.pool.clone(),
        ctx.writer.clone(),
    ));
    let activation_repo: Arc<dyn ActivationRepositoryTrait> =
        Arc::new(ActivationRepository::new(ctx.writer.clone()));
    let service = ActivationService::new(
        activation_repo,
        project_repo.clone(),
        material_repo.clone(),
    );

    Fixture {
        material_repo,
        project_repo,
        service,
    }
}

fn project(f: &Fixture, budget: Option<f64>) -> String {
    tokio_test::block_on(f.project_repo.create_project(NewProject {
        id: None,
        name: "Tower A".to_string(),
        budget,
        alert_variance_percentage: None,
        alert_variance_amount: None,
        alert_loss_percentage: None,
        alert_loss_amount: None,
        alert_wastage_percentage: None,
    }))
    .unwrap()
    .id
}

#[test]
fn budget_activation_captures_prior_spending_once() {
    let f = fixture("activation-budget");
    let pid = project(&f, None);

    let mut cement = common::material(&pid, "Cement", 100.0, 100.0, 100.0, 10.0);
    cement.category = Some("cement".to_string());
    tokio_test::block_on(f.material_repo.create_material(cement)).unwrap();
    let mut rebar = common::material(&pid, "Rebar", 50.0, 50.0, 50.0, 20.0);
    rebar.category = Some("steel".to_string());
    tokio_test::block_on(f.material_repo.create_material(rebar)).unwrap();

    let outcome =
        tokio_test::block_on(f.service.ensure_project_budget_activation(&pid, 50_000.0)).unwrap();
    match outcome {
        ActivationOutcome::Activated { baseline, .. } => {
            assert_eq!(baseline.total_spending, 2000.0);
            assert_eq!(baseline.by_category.get("cement"), Some(&1000.0));
            assert_eq!(baseline.by_category.get("steel"), Some(&1000.0));
        }
        other => panic!("expected a fresh capture, got {:?}", other),
    }

    let stored = f.project_repo.get_project(&pid).unwrap().unwrap();
    assert!(stored.budget_activated_at.is_some());
    assert_eq!(stored.pre_budget_spending, Some(2000.0));

    // The capture is terminal.
    let again =
        tokio_test::block_on(f.service.ensure_project_budget_activation(&pid, 75_000.0)).unwrap();
    assert_eq!(again, ActivationOutcome::AlreadyActivated);
}

#[test]
fn activation_is_not_required_outside_a_zero_to_positive_transition() {
    let f = fixture("activation-notrequired");

    let funded = project(&f, Some(10_000.0));
    let outcome =
        tokio_test::block_on(f.service.ensure_project_budget_activation(&funded, 20_000.0))
            .unwrap();
    assert_eq!(outcome, ActivationOutcome::NotRequired);

    let unfunded = project(&f, None);
    let outcome =
        tokio_test::block_on(f.service.ensure_project_budget_activation(&unfunded, 0.0)).unwrap();
    assert_eq!(outcome, ActivationOutcome::NotRequired);
}

#[test]
fn missing_entities_are_reported_not_swallowed() {
    let f = fixture("activation-missing");

    let err = tokio_test::block_on(
        f.service
            .ensure_project_budget_activation("no-such-project", 50_000.0),
    )
    .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = f.service.effective_project_spending("no-such-project").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = f.service.capital_usage("no-such-project").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn effective_spending_offsets_the_captured_baseline() {
    let f = fixture("activation-effective");
    let pid = project(&f, None);

    tokio_test::block_on(
        f.material_repo
            .create_material(common::material(&pid, "Cement", 100.0, 100.0, 100.0, 10.0)),
    )
    .unwrap();

    // Before activation there is nothing to offset.
    let before = f.service.effective_project_spending(&pid).unwrap();
    assert_eq!(before.baseline, 0.0);
    assert_eq!(before.effective_spending, 1000.0);

    tokio_test::block_on(f.service.ensure_project_budget_activation(&pid, 50_000.0)).unwrap();
    tokio_test::block_on(
        f.material_repo
            .create_material(common::material(&pid, "Rebar", 25.0, 25.0, 25.0, 20.0)),
    )
    .unwrap();

    let after = f.service.effective_project_spending(&pid).unwrap();
    assert_eq!(after.current_spending, 1500.0);
    assert_eq!(after.baseline, 1000.0);
    assert_eq!(after.effective_spending, 500.0);
}

#[test]
fn phase_activation_scopes_the_baseline_to_the_phase() {
    let f = fixture("activation-phase");
    let pid = project(&f, None);

    let phase = tokio_test::block_on(f.project_repo.create_phase(NewPhase {
        id: None,
        project_id: pid.clone(),
        name: "Foundation".to_string(),
        budget: None,
    }))
    .unwrap();

    let mut in_phase = common::material(&pid, "Concrete", 10.0, 10.0, 10.0, 100.0);
    in_phase.phase_id = Some(phase.id.clone());
    tokio_test::block_on(f.material_repo.create_material(in_phase)).unwrap();
    // Same project, different phase: excluded from the phase baseline.
    tokio_test::block_on(
        f.material_repo
            .create_material(common::material(&pid, "Rebar", 50.0, 50.0, 50.0, 20.0)),
    )
    .unwrap();

    let outcome =
        tokio_test::block_on(f.service.ensure_phase_budget_activation(&phase.id, 5_000.0))
            .unwrap();
    match outcome {
        ActivationOutcome::Activated { baseline, .. } => {
            assert_eq!(baseline.total_spending, 1000.0);
        }
        other => panic!("expected a fresh capture, got {:?}", other),
    }

    let stored = f.project_repo.get_phase(&phase.id).unwrap().unwrap();
    assert_eq!(stored.pre_budget_spending, Some(1000.0));
}

#[test]
fn capital_checks_always_see_true_usage() {
    let f = fixture("activation-capital");
    let pid = project(&f, None);

    tokio_test::block_on(f.project_repo.create_project_finances(NewProjectFinances {
        id: None,
        project_id: pid.clone(),
        capital: None,
        capital_used: 1200.0,
        capital_committed: 300.0,
    }))
    .unwrap();

    let before = f.service.capital_usage(&pid).unwrap();
    assert_eq!(before.capital_used, 1200.0);
    assert!(before.baseline.is_none());

    let outcome =
        tokio_test::block_on(f.service.ensure_capital_activation(&pid, 100_000.0)).unwrap();
    match outcome {
        ActivationOutcome::Activated { baseline, .. } => {
            assert_eq!(baseline.used, 1200.0);
            assert_eq!(baseline.committed, 300.0);
        }
        other => panic!("expected a fresh capture, got {:?}", other),
    }

    // The baseline is informational; usage is never offset by it.
    let after = f.service.capital_usage(&pid).unwrap();
    assert_eq!(after.capital_used, 1200.0);
    assert_eq!(after.capital_committed, 300.0);
    assert_eq!(after.baseline.map(|b| b.used), Some(1200.0));

    let again =
        tokio_test::block_on(f.service.ensure_capital_activation(&pid, 200_000.0)).unwrap();
    assert_eq!(again, ActivationOutcome::AlreadyActivated);
}
