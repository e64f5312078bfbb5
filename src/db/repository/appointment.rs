use std::str::FromStr;

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use uuid::Uuid;

use super::{parse_date, parse_time, parse_uuid};
use crate::db::DatabaseError;
use crate::models::enums::AppointmentStatus;
use crate::models::*;

const APPOINTMENT_COLUMNS: &str = "id, patient_id, doctor_id, patient_name, doctor_name, age,
     gender, contact_number, department, appointment_date, appointment_time, status, reason,
     issue_days, prescription_given, follow_up_required, follow_up_date, cancellation_reason";

/// Which side of an appointment or prescription a user sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Patient,
    Doctor,
}

impl Party {
    pub(crate) fn id_column(&self) -> &'static str {
        match self {
            Party::Patient => "patient_id",
            Party::Doctor => "doctor_id",
        }
    }

    pub(crate) fn name_column(&self) -> &'static str {
        match self {
            Party::Patient => "patient_name",
            Party::Doctor => "doctor_name",
        }
    }
}

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, patient_id, doctor_id, patient_name, doctor_name, age,
         gender, contact_number, department, appointment_date, appointment_time, status, reason,
         issue_days, prescription_given, follow_up_required, follow_up_date, cancellation_reason)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        params![
            appt.id.to_string(),
            appt.patient_id,
            appt.doctor_id,
            appt.patient_name,
            appt.doctor_name,
            appt.age,
            appt.gender,
            appt.contact_number,
            appt.department,
            appt.appointment_date.map(|d| d.to_string()),
            appt.appointment_time.map(|t| t.format("%H:%M:%S").to_string()),
            appt.status.as_str(),
            appt.reason,
            appt.issue_days,
            appt.prescription_given as i32,
            appt.follow_up_required as i32,
            appt.follow_up_date.map(|d| d.to_string()),
            appt.cancellation_reason,
        ],
    )?;
    Ok(())
}

/// Persist the mutable scheduling fields of an appointment.
pub fn update_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET status = ?2, appointment_date = ?3, appointment_time = ?4,
         reason = ?5, prescription_given = ?6, follow_up_required = ?7, follow_up_date = ?8,
         cancellation_reason = ?9
         WHERE id = ?1",
        params![
            appt.id.to_string(),
            appt.status.as_str(),
            appt.appointment_date.map(|d| d.to_string()),
            appt.appointment_time.map(|t| t.format("%H:%M:%S").to_string()),
            appt.reason,
            appt.prescription_given as i32,
            appt.follow_up_required as i32,
            appt.follow_up_date.map(|d| d.to_string()),
            appt.cancellation_reason,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: appt.id.to_string(),
        });
    }
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Option<Appointment>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
            params![id.to_string()],
            appointment_row_from_rusqlite,
        )
        .optional()?;
    row.map(appointment_from_row).transpose()
}

pub fn list_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    query_appointments(conn, "1 = 1", &[])
}

pub fn list_appointments_by_party(
    conn: &Connection,
    party: Party,
    party_id: &str,
) -> Result<Vec<Appointment>, DatabaseError> {
    query_appointments(conn, &format!("{} = ?1", party.id_column()), &[&party_id])
}

pub fn list_appointments_by_status(
    conn: &Connection,
    status: AppointmentStatus,
) -> Result<Vec<Appointment>, DatabaseError> {
    query_appointments(conn, "status = ?1", &[&status.as_str()])
}

pub fn delete_appointment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM appointments WHERE id = ?1", params![id.to_string()])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Delete every appointment whose party id equals one of `keys`.
/// Returns the number of rows removed.
pub fn delete_appointments_by_party_ids(
    conn: &Connection,
    party: Party,
    keys: &[&str],
) -> Result<usize, DatabaseError> {
    if keys.is_empty() {
        return Ok(0);
    }
    let placeholders = vec!["?"; keys.len()].join(", ");
    let sql = format!(
        "DELETE FROM appointments WHERE {} IN ({placeholders})",
        party.id_column()
    );
    Ok(conn.execute(&sql, params_from_iter(keys.iter()))?)
}

pub fn delete_appointments_by_party_name(
    conn: &Connection,
    party: Party,
    name: &str,
) -> Result<usize, DatabaseError> {
    let sql = format!("DELETE FROM appointments WHERE {} = ?1", party.name_column());
    Ok(conn.execute(&sql, params![name])?)
}

fn query_appointments(
    conn: &Connection,
    filter: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE {filter}
         ORDER BY appointment_date ASC, appointment_time ASC"
    ))?;
    let rows = stmt.query_map(args, |row| Ok(appointment_row_from_rusqlite(row)))?;

    let mut appts = Vec::new();
    for row in rows {
        appts.push(appointment_from_row(row??)?);
    }
    Ok(appts)
}

// Internal row type for Appointment mapping
struct AppointmentRow {
    id: String,
    patient_id: String,
    doctor_id: String,
    patient_name: String,
    doctor_name: String,
    age: u32,
    gender: Option<String>,
    contact_number: Option<String>,
    department: Option<String>,
    appointment_date: Option<String>,
    appointment_time: Option<String>,
    status: String,
    reason: Option<String>,
    issue_days: u32,
    prescription_given: i32,
    follow_up_required: i32,
    follow_up_date: Option<String>,
    cancellation_reason: Option<String>,
}

fn appointment_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<AppointmentRow, rusqlite::Error> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        patient_name: row.get(3)?,
        doctor_name: row.get(4)?,
        age: row.get(5)?,
        gender: row.get(6)?,
        contact_number: row.get(7)?,
        department: row.get(8)?,
        appointment_date: row.get(9)?,
        appointment_time: row.get(10)?,
        status: row.get(11)?,
        reason: row.get(12)?,
        issue_days: row.get(13)?,
        prescription_given: row.get(14)?,
        follow_up_required: row.get(15)?,
        follow_up_date: row.get(16)?,
        cancellation_reason: row.get(17)?,
    })
}

fn appointment_from_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        id: parse_uuid("appointments.id", &row.id)?,
        patient_id: row.patient_id,
        doctor_id: row.doctor_id,
        patient_name: row.patient_name,
        doctor_name: row.doctor_name,
        age: row.age,
        gender: row.gender,
        contact_number: row.contact_number,
        department: row.department,
        appointment_date: parse_date("appointments.appointment_date", row.appointment_date.as_deref())?,
        appointment_time: parse_time("appointments.appointment_time", row.appointment_time.as_deref())?,
        status: AppointmentStatus::from_str(&row.status)?,
        reason: row.reason,
        issue_days: row.issue_days,
        prescription_given: row.prescription_given != 0,
        follow_up_required: row.follow_up_required != 0,
        follow_up_date: parse_date("appointments.follow_up_date", row.follow_up_date.as_deref())?,
        cancellation_reason: row.cancellation_reason,
    })
}
