use std::sync::Arc;

use buildledger_core::db;
use buildledger_core::db::{DbPool, WriteHandle};
use buildledger_core::materials::NewMaterial;
use chrono::NaiveDateTime;
use uuid::Uuid;

pub struct TestContext {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
}

pub fn setup_test_db(test_id: &str) -> TestContext {
    let dir = format!("./tests/output/{}-{}", test_id, Uuid::new_v4());

    let db_path = db::init(&dir).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");
    let writer = db::write_actor::spawn_writer(&db_path).expect("Failed to spawn db writer");

    TestContext { pool, writer }
}

#[allow(dead_code)]
pub fn material(
    project_id: &str,
    name: &str,
    purchased: f64,
    delivered: f64,
    used: f64,
    unit_cost: f64,
) -> NewMaterial {
    NewMaterial {
        id: None,
        project_id: project_id.to_string(),
        phase_id: None,
        supplier_id: None,
        supplier_name: None,
        name: name.to_string(),
        category: None,
        quantity_purchased: Some(purchased),
        quantity_delivered: Some(delivered),
        quantity_used: Some(used),
        unit_cost: Some(unit_cost),
        date_delivered: None,
        date_used: None,
    }
}

#[allow(dead_code)]
pub fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}
