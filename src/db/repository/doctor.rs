use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::*;

const DOCTOR_COLUMNS: &str =
    "id, name, email, department, specialization, phone, available, experience_years, qualification";

pub fn insert_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (id, name, email, department, specialization, phone, available,
         experience_years, qualification)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            doctor.id.to_string(),
            doctor.name,
            doctor.email,
            doctor.department,
            doctor.specialization,
            doctor.phone,
            doctor.available as i32,
            doctor.experience_years,
            doctor.qualification,
        ],
    )?;
    Ok(())
}

pub fn update_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE doctors SET name = ?2, email = ?3, department = ?4, specialization = ?5,
         phone = ?6, available = ?7, experience_years = ?8, qualification = ?9
         WHERE id = ?1",
        params![
            doctor.id.to_string(),
            doctor.name,
            doctor.email,
            doctor.department,
            doctor.specialization,
            doctor.phone,
            doctor.available as i32,
            doctor.experience_years,
            doctor.qualification,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: doctor.id.to_string(),
        });
    }
    Ok(())
}

pub fn get_doctor(conn: &Connection, id: &Uuid) -> Result<Option<Doctor>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?1"),
            params![id.to_string()],
            doctor_row_from_rusqlite,
        )
        .optional()?;
    row.map(doctor_from_row).transpose()
}

pub fn get_doctor_by_email(conn: &Connection, email: &str) -> Result<Option<Doctor>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE email = ?1"),
            params![email],
            doctor_row_from_rusqlite,
        )
        .optional()?;
    row.map(doctor_from_row).transpose()
}

pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    query_doctors(conn, "1 = 1", &[])
}

pub fn list_available_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    query_doctors(conn, "available = 1", &[])
}

pub fn list_doctors_by_department(
    conn: &Connection,
    department: &str,
) -> Result<Vec<Doctor>, DatabaseError> {
    query_doctors(conn, "department = ?1", &[&department])
}

pub fn list_doctors_by_specialization(
    conn: &Connection,
    specialization: &str,
) -> Result<Vec<Doctor>, DatabaseError> {
    query_doctors(conn, "specialization = ?1", &[&specialization])
}

pub fn delete_doctor(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM doctors WHERE id = ?1", params![id.to_string()])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn count_doctors(conn: &Connection) -> Result<i64, DatabaseError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))?)
}

fn query_doctors(
    conn: &Connection,
    filter: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors WHERE {filter} ORDER BY name ASC"
    ))?;
    let rows = stmt.query_map(args, |row| Ok(doctor_row_from_rusqlite(row)))?;

    let mut doctors = Vec::new();
    for row in rows {
        doctors.push(doctor_from_row(row??)?);
    }
    Ok(doctors)
}

struct DoctorRow {
    id: String,
    name: String,
    email: String,
    department: String,
    specialization: String,
    phone: String,
    available: i32,
    experience_years: u32,
    qualification: String,
}

fn doctor_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<DoctorRow, rusqlite::Error> {
    Ok(DoctorRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        department: row.get(3)?,
        specialization: row.get(4)?,
        phone: row.get(5)?,
        available: row.get(6)?,
        experience_years: row.get(7)?,
        qualification: row.get(8)?,
    })
}

fn doctor_from_row(row: DoctorRow) -> Result<Doctor, DatabaseError> {
    Ok(Doctor {
        id: parse_uuid("doctors.id", &row.id)?,
        name: row.name,
        email: row.email,
        department: row.department,
        specialization: row.specialization,
        phone: row.phone,
        available: row.available != 0,
        experience_years: row.experience_years,
        qualification: row.qualification,
    })
}
