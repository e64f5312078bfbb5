use rusqlite::Connection;
use uuid::Uuid;

use super::{require_non_blank, ServiceError};
use crate::db;
use crate::models::*;

fn validate(input: &DoctorInput) -> Result<(), ServiceError> {
    require_non_blank("name", &input.name)?;
    require_non_blank("email", &input.email)
}

pub fn create(conn: &Connection, input: DoctorInput) -> Result<Doctor, ServiceError> {
    validate(&input)?;
    let doctor = input.into_doctor(Uuid::new_v4());
    db::insert_doctor(conn, &doctor)?;
    Ok(doctor)
}

pub fn list(conn: &Connection) -> Result<Vec<Doctor>, ServiceError> {
    Ok(db::list_doctors(conn)?)
}

pub fn available(conn: &Connection) -> Result<Vec<Doctor>, ServiceError> {
    Ok(db::list_available_doctors(conn)?)
}

pub fn by_department(conn: &Connection, department: &str) -> Result<Vec<Doctor>, ServiceError> {
    Ok(db::list_doctors_by_department(conn, department)?)
}

pub fn by_specialization(conn: &Connection, specialization: &str) -> Result<Vec<Doctor>, ServiceError> {
    Ok(db::list_doctors_by_specialization(conn, specialization)?)
}

pub fn by_email(conn: &Connection, email: &str) -> Result<Doctor, ServiceError> {
    db::get_doctor_by_email(conn, email)?.ok_or_else(|| ServiceError::not_found("Doctor", email))
}

pub fn get(conn: &Connection, id: &Uuid) -> Result<Doctor, ServiceError> {
    db::get_doctor(conn, id)?.ok_or_else(|| ServiceError::not_found("Doctor", id))
}

/// Replace every field of an existing doctor.
pub fn update(conn: &Connection, id: &Uuid, input: DoctorInput) -> Result<Doctor, ServiceError> {
    validate(&input)?;
    let doctor = input.into_doctor(*id);
    db::update_doctor(conn, &doctor)?;
    Ok(doctor)
}

pub fn delete(conn: &Connection, id: &Uuid) -> Result<(), ServiceError> {
    db::delete_doctor(conn, id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn input(email: &str, department: &str) -> DoctorInput {
        DoctorInput {
            name: "Dr Rao".into(),
            email: email.into(),
            department: department.into(),
            specialization: "Neurology".into(),
            phone: "555-0101".into(),
            available: true,
            experience_years: 8,
            qualification: "DM".into(),
        }
    }

    #[test]
    fn create_then_get() {
        let conn = open_memory_database().unwrap();
        let doctor = create(&conn, input("rao@h.org", "Neurology")).unwrap();
        assert_eq!(get(&conn, &doctor.id).unwrap(), doctor);
        assert_eq!(by_email(&conn, "rao@h.org").unwrap().id, doctor.id);
    }

    #[test]
    fn duplicate_email_conflicts() {
        let conn = open_memory_database().unwrap();
        create(&conn, input("rao@h.org", "Neurology")).unwrap();
        let err = create(&conn, input("rao@h.org", "ENT")).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn update_replaces_all_fields() {
        let conn = open_memory_database().unwrap();
        let doctor = create(&conn, input("rao@h.org", "Neurology")).unwrap();
        let mut change = input("rao@h.org", "ENT");
        change.available = false;
        let updated = update(&conn, &doctor.id, change).unwrap();

        assert_eq!(get(&conn, &doctor.id).unwrap(), updated);
        assert!(available(&conn).unwrap().is_empty());
        assert_eq!(by_department(&conn, "ENT").unwrap().len(), 1);
        assert_eq!(by_specialization(&conn, "Neurology").unwrap().len(), 1);
    }

    #[test]
    fn missing_doctor_not_found() {
        let conn = open_memory_database().unwrap();
        let id = Uuid::new_v4();
        assert!(matches!(get(&conn, &id), Err(ServiceError::NotFound { .. })));
        assert!(matches!(
            update(&conn, &id, input("x@h.org", "ENT")),
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(delete(&conn, &id), Err(ServiceError::NotFound { .. })));
        assert!(matches!(
            by_email(&conn, "x@h.org"),
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[test]
    fn blank_name_rejected() {
        let conn = open_memory_database().unwrap();
        let mut bad = input("rao@h.org", "ENT");
        bad.name = " ".into();
        assert!(matches!(create(&conn, bad), Err(ServiceError::Validation(_))));
    }
}
