use std::sync::Arc;

use buildledger_core::materials::{MaterialFilters, MaterialRepository, MaterialRepositoryTrait};
use buildledger_core::projects::{NewProject, ProjectRepository, ProjectRepositoryTrait};
use buildledger_core::suppliers::{SupplierService, SupplierServiceTrait};

mod common;

struct Fixture {
    material_repo: Arc<dyn MaterialRepositoryTrait>,
    project_repo: Arc<dyn ProjectRepositoryTrait>,
    service: SupplierService,
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
    let service = SupplierService::new(material_repo.clone());

    Fixture {
        material_repo,
        project_repo,
        service,
    }
}

fn project(f: &Fixture, name: &str) -> String {
    tokio_test::block_on(f.project_repo.create_project(NewProject {
        id: None,
        name: name.to_string(),
        budget: None,
        alert_variance_percentage: None,
        alert_variance_amount: None,
        alert_loss_percentage: None,
        alert_loss_amount: None,
        alert_wastage_percentage: None,
    }))
    .unwrap()
    .id
}

fn supplied(
    project_id: &str,
    supplier: Option<&str>,
    name: &str,
    purchased: f64,
    delivered: f64,
    unit_cost: f64,
) -> buildledger_core::materials::NewMaterial {
    let mut m = common::material(project_id, name, purchased, delivered, delivered, unit_cost);
    m.supplier_name = supplier.map(|s| s.to_string());
    m
}

#[test]
fn suppliers_rank_by_variance_cost_with_unknown_bucket() {
    let f = fixture("suppliers");
    let pid = project(&f, "Tower A");

    for m in [
        supplied(&pid, Some("Acme Steel"), "Rebar", 1000.0, 800.0, 10.0),
        supplied(&pid, Some("Acme Steel"), "Mesh", 500.0, 500.0, 10.0),
        supplied(&pid, Some("BuildCo"), "Cement", 100.0, 100.0, 50.0),
        supplied(&pid, None, "Gravel", 200.0, 150.0, 20.0),
    ] {
        tokio_test::block_on(f.material_repo.create_material(m)).unwrap();
    }

    let performance = f
        .service
        .supplier_performance(Some(&pid), &MaterialFilters::default())
        .unwrap();

    assert_eq!(performance.len(), 3);
    let names: Vec<&str> = performance.iter().map(|p| p.supplier_name.as_str()).collect();
    assert_eq!(names, vec!["Acme Steel", "Unknown", "BuildCo"]);

    let acme = &performance[0];
    assert_eq!(acme.material_count, 2);
    assert_eq!(acme.total_purchased, 1500.0);
    assert_eq!(acme.total_delivered, 1300.0);
    assert_eq!(acme.total_variance, 200.0);
    assert_eq!(acme.total_variance_cost, 2000.0);
    // (20% + 0%) / 2 materials.
    assert_eq!(acme.average_variance_percentage, 10.0);
    assert_eq!(acme.delivery_accuracy, 86.67);

    let unknown = &performance[1];
    assert_eq!(unknown.total_variance_cost, 1000.0);
    assert_eq!(unknown.delivery_accuracy, 75.0);

    let buildco = &performance[2];
    assert_eq!(buildco.total_variance_cost, 0.0);
    assert_eq!(buildco.delivery_accuracy, 100.0);
}

#[test]
fn zero_purchased_totals_do_not_break_the_accuracy_ratio() {
    let f = fixture("suppliers-zero");
    let pid = project(&f, "Tower A");

    tokio_test::block_on(
        f.material_repo
            .create_material(supplied(&pid, Some("DropShip"), "Sealant", 0.0, 5.0, 4.0)),
    )
    .unwrap();

    let performance = f
        .service
        .supplier_performance(Some(&pid), &MaterialFilters::default())
        .unwrap();

    assert_eq!(performance.len(), 1);
    assert_eq!(performance[0].total_variance, 0.0);
    // Divisor falls back to 1 when nothing was purchased.
    assert_eq!(performance[0].delivery_accuracy, 500.0);
}

#[test]
fn project_scope_is_optional() {
    let f = fixture("suppliers-scope");
    let tower = project(&f, "Tower A");
    let plaza = project(&f, "Plaza B");

    tokio_test::block_on(
        f.material_repo
            .create_material(supplied(&tower, Some("Acme Steel"), "Rebar", 100.0, 90.0, 10.0)),
    )
    .unwrap();
    tokio_test::block_on(
        f.material_repo
            .create_material(supplied(&plaza, Some("BuildCo"), "Cement", 100.0, 100.0, 5.0)),
    )
    .unwrap();

    let scoped = f
        .service
        .supplier_performance(Some(&tower), &MaterialFilters::default())
        .unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].supplier_name, "Acme Steel");

    let global = f
        .service
        .supplier_performance(None, &MaterialFilters::default())
        .unwrap();
    assert_eq!(global.len(), 2);
}
