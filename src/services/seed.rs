//! First-run reference data: the hospital's departments and doctor roster.

use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use super::ServiceError;
use crate::db;
use crate::models::*;

const REFERENCE_DATA: &str = include_str!("../../resources/seed/reference_data.json");

#[derive(Debug, Deserialize)]
struct ReferenceData {
    departments: Vec<DepartmentInput>,
    doctors: Vec<DoctorInput>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub departments_inserted: usize,
    pub doctors_inserted: usize,
}

/// Insert the bundled reference data into empty tables. Tables that
/// already hold rows are left alone.
pub fn seed_reference_data(conn: &Connection) -> Result<SeedReport, ServiceError> {
    let data: ReferenceData = serde_json::from_str(REFERENCE_DATA)
        .map_err(|e| ServiceError::Validation(format!("bundled reference data: {e}")))?;
    let mut report = SeedReport::default();

    let tx = conn.unchecked_transaction()?;
    if db::count_departments(&tx)? == 0 {
        for input in data.departments {
            db::insert_department(&tx, &input.into_department(Uuid::new_v4()))?;
            report.departments_inserted += 1;
        }
    }
    if db::count_doctors(&tx)? == 0 {
        for input in data.doctors {
            db::insert_doctor(&tx, &input.into_doctor(Uuid::new_v4()))?;
            report.doctors_inserted += 1;
        }
    }
    tx.commit()?;

    if report == SeedReport::default() {
        tracing::debug!("Reference data already present, nothing seeded");
    } else {
        tracing::info!(
            departments = report.departments_inserted,
            doctors = report.doctors_inserted,
            "Seeded reference data"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    #[test]
    fn seeds_empty_database() {
        let conn = open_memory_database().unwrap();
        let report = seed_reference_data(&conn).unwrap();
        assert_eq!(report.departments_inserted, 10);
        assert_eq!(report.doctors_inserted, 30);
        assert_eq!(db::count_departments(&conn).unwrap(), 10);
        assert_eq!(db::count_doctors(&conn).unwrap(), 30);
    }

    #[test]
    fn second_run_is_noop() {
        let conn = open_memory_database().unwrap();
        seed_reference_data(&conn).unwrap();
        let report = seed_reference_data(&conn).unwrap();
        assert_eq!(report, SeedReport::default());
        assert_eq!(db::count_doctors(&conn).unwrap(), 30);
    }

    #[test]
    fn populated_table_is_left_alone() {
        let conn = open_memory_database().unwrap();
        db::insert_department(
            &conn,
            &DepartmentInput {
                name: "Custom".into(),
                description: None,
                head: None,
                active: true,
            }
            .into_department(Uuid::new_v4()),
        )
        .unwrap();

        let report = seed_reference_data(&conn).unwrap();
        assert_eq!(report.departments_inserted, 0);
        assert_eq!(report.doctors_inserted, 30);
        assert_eq!(db::count_departments(&conn).unwrap(), 1);
    }

    #[test]
    fn every_seeded_doctor_belongs_to_a_seeded_department() {
        let conn = open_memory_database().unwrap();
        seed_reference_data(&conn).unwrap();
        for doctor in db::list_doctors(&conn).unwrap() {
            assert!(
                db::get_department_by_name(&conn, &doctor.department).unwrap().is_some(),
                "{} has unknown department {}",
                doctor.email,
                doctor.department
            );
        }
    }
}
