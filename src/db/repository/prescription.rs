use std::str::FromStr;

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use uuid::Uuid;

use super::{parse_date, parse_timestamp, parse_uuid, uuid_column};
use super::Party;
use crate::db::DatabaseError;
use crate::models::enums::DispensedStatus;
use crate::models::*;

const PRESCRIPTION_COLUMNS: &str = "id, patient_id, doctor_id, patient_name, doctor_name, gender,
     age, diagnosis, symptoms, additional_notes, follow_up_date, created_date, dispensed_status,
     dispensed_date, dispensed_by, edited, last_edited_date";

/// Insert the prescription header and all of its medicines.
/// Callers wrap this in a transaction.
pub fn insert_prescription(conn: &Connection, rx: &Prescription) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO prescriptions (id, patient_id, doctor_id, patient_name, doctor_name, gender,
         age, diagnosis, symptoms, additional_notes, follow_up_date, created_date,
         dispensed_status, dispensed_date, dispensed_by, edited, last_edited_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            rx.id.to_string(),
            rx.patient_id,
            rx.doctor_id,
            rx.patient_name,
            rx.doctor_name,
            rx.gender,
            rx.age,
            rx.diagnosis,
            rx.symptoms,
            rx.additional_notes,
            rx.follow_up_date.map(|d| d.to_string()),
            rx.created_date.to_rfc3339(),
            rx.dispensed_status.as_str(),
            rx.dispensed_date.map(|d| d.to_rfc3339()),
            rx.dispensed_by,
            rx.edited as i32,
            rx.last_edited_date.map(|d| d.to_rfc3339()),
        ],
    )?;
    for medicine in &rx.medicines {
        insert_medicine(conn, medicine)?;
    }
    Ok(())
}

pub fn insert_medicine(conn: &Connection, medicine: &Medicine) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medicines (id, prescription_id, position, medicine_name, dosage, frequency,
         duration, instructions, quantity)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            medicine.id.to_string(),
            medicine.prescription_id.to_string(),
            medicine.position,
            medicine.medicine_name,
            medicine.dosage,
            medicine.frequency,
            medicine.duration,
            medicine.instructions,
            medicine.quantity,
        ],
    )?;
    Ok(())
}

/// Update the header columns (medicines are handled by `replace_medicines`).
pub fn update_prescription(conn: &Connection, rx: &Prescription) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE prescriptions SET diagnosis = ?2, symptoms = ?3, additional_notes = ?4,
         follow_up_date = ?5, dispensed_status = ?6, dispensed_date = ?7, dispensed_by = ?8,
         edited = ?9, last_edited_date = ?10
         WHERE id = ?1",
        params![
            rx.id.to_string(),
            rx.diagnosis,
            rx.symptoms,
            rx.additional_notes,
            rx.follow_up_date.map(|d| d.to_string()),
            rx.dispensed_status.as_str(),
            rx.dispensed_date.map(|d| d.to_rfc3339()),
            rx.dispensed_by,
            rx.edited as i32,
            rx.last_edited_date.map(|d| d.to_rfc3339()),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Prescription".into(),
            id: rx.id.to_string(),
        });
    }
    Ok(())
}

/// Drop every medicine of `prescription_id` and insert `medicines` in their place.
pub fn replace_medicines(
    conn: &Connection,
    prescription_id: &Uuid,
    medicines: &[Medicine],
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM medicines WHERE prescription_id = ?1",
        params![prescription_id.to_string()],
    )?;
    for medicine in medicines {
        insert_medicine(conn, medicine)?;
    }
    Ok(())
}

pub fn get_medicines(conn: &Connection, prescription_id: &Uuid) -> Result<Vec<Medicine>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, prescription_id, position, medicine_name, dosage, frequency, duration,
         instructions, quantity
         FROM medicines WHERE prescription_id = ?1 ORDER BY position ASC",
    )?;
    let rows = stmt.query_map(params![prescription_id.to_string()], |row| {
        Ok(Medicine {
            id: uuid_column(row, 0)?,
            prescription_id: uuid_column(row, 1)?,
            position: row.get(2)?,
            medicine_name: row.get(3)?,
            dosage: row.get(4)?,
            frequency: row.get(5)?,
            duration: row.get(6)?,
            instructions: row.get(7)?,
            quantity: row.get(8)?,
        })
    })?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_prescription(conn: &Connection, id: &Uuid) -> Result<Option<Prescription>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE id = ?1"),
            params![id.to_string()],
            prescription_row_from_rusqlite,
        )
        .optional()?;
    match row {
        Some(row) => Ok(Some(prescription_from_row(conn, row)?)),
        None => Ok(None),
    }
}

pub fn list_prescriptions(conn: &Connection) -> Result<Vec<Prescription>, DatabaseError> {
    query_prescriptions(conn, "1 = 1", &[])
}

pub fn list_prescriptions_by_party(
    conn: &Connection,
    party: Party,
    party_id: &str,
) -> Result<Vec<Prescription>, DatabaseError> {
    query_prescriptions(conn, &format!("{} = ?1", party.id_column()), &[&party_id])
}

pub fn list_prescriptions_by_patient_name(
    conn: &Connection,
    patient_name: &str,
) -> Result<Vec<Prescription>, DatabaseError> {
    query_prescriptions(conn, "patient_name = ?1", &[&patient_name])
}

/// Delete a prescription; its medicines go with it through the foreign key.
pub fn delete_prescription(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM prescriptions WHERE id = ?1", params![id.to_string()])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Prescription".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_prescriptions_by_party_ids(
    conn: &Connection,
    party: Party,
    keys: &[&str],
) -> Result<usize, DatabaseError> {
    if keys.is_empty() {
        return Ok(0);
    }
    let placeholders = vec!["?"; keys.len()].join(", ");
    let sql = format!(
        "DELETE FROM prescriptions WHERE {} IN ({placeholders})",
        party.id_column()
    );
    Ok(conn.execute(&sql, params_from_iter(keys.iter()))?)
}

pub fn delete_prescriptions_by_party_name(
    conn: &Connection,
    party: Party,
    name: &str,
) -> Result<usize, DatabaseError> {
    let sql = format!("DELETE FROM prescriptions WHERE {} = ?1", party.name_column());
    Ok(conn.execute(&sql, params![name])?)
}

fn query_prescriptions(
    conn: &Connection,
    filter: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE {filter}
         ORDER BY created_date DESC"
    ))?;
    let rows = stmt.query_map(args, |row| Ok(prescription_row_from_rusqlite(row)))?;

    let mut prescriptions = Vec::new();
    for row in rows {
        prescriptions.push(prescription_from_row(conn, row??)?);
    }
    Ok(prescriptions)
}

// Internal row type for Prescription mapping
struct PrescriptionRow {
    id: String,
    patient_id: String,
    doctor_id: String,
    patient_name: String,
    doctor_name: String,
    gender: Option<String>,
    age: u32,
    diagnosis: String,
    symptoms: String,
    additional_notes: Option<String>,
    follow_up_date: Option<String>,
    created_date: String,
    dispensed_status: String,
    dispensed_date: Option<String>,
    dispensed_by: Option<String>,
    edited: i32,
    last_edited_date: Option<String>,
}

fn prescription_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<PrescriptionRow, rusqlite::Error> {
    Ok(PrescriptionRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        patient_name: row.get(3)?,
        doctor_name: row.get(4)?,
        gender: row.get(5)?,
        age: row.get(6)?,
        diagnosis: row.get(7)?,
        symptoms: row.get(8)?,
        additional_notes: row.get(9)?,
        follow_up_date: row.get(10)?,
        created_date: row.get(11)?,
        dispensed_status: row.get(12)?,
        dispensed_date: row.get(13)?,
        dispensed_by: row.get(14)?,
        edited: row.get(15)?,
        last_edited_date: row.get(16)?,
    })
}

fn prescription_from_row(conn: &Connection, row: PrescriptionRow) -> Result<Prescription, DatabaseError> {
    let id = parse_uuid("prescriptions.id", &row.id)?;
    let medicines = get_medicines(conn, &id)?;
    Ok(Prescription {
        id,
        patient_id: row.patient_id,
        doctor_id: row.doctor_id,
        patient_name: row.patient_name,
        doctor_name: row.doctor_name,
        gender: row.gender,
        age: row.age,
        diagnosis: row.diagnosis,
        symptoms: row.symptoms,
        medicines,
        additional_notes: row.additional_notes,
        follow_up_date: parse_date("prescriptions.follow_up_date", row.follow_up_date.as_deref())?,
        created_date: parse_timestamp("prescriptions.created_date", &row.created_date)?,
        dispensed_status: DispensedStatus::from_str(&row.dispensed_status)?,
        dispensed_date: row
            .dispensed_date
            .as_deref()
            .map(|d| parse_timestamp("prescriptions.dispensed_date", d))
            .transpose()?,
        dispensed_by: row.dispensed_by,
        edited: row.edited != 0,
        last_edited_date: row
            .last_edited_date
            .as_deref()
            .map(|d| parse_timestamp("prescriptions.last_edited_date", d))
            .transpose()?,
    })
}
