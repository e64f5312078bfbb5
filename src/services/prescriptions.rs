use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use super::{require_non_blank, ServiceError};
use crate::db::{self, Party};
use crate::models::enums::DispensedStatus;
use crate::models::*;

fn number_medicines(prescription_id: Uuid, inputs: Vec<MedicineInput>) -> Result<Vec<Medicine>, ServiceError> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(position, input)| {
            require_non_blank("medicineName", &input.medicine_name)?;
            Ok(input.into_medicine(prescription_id, position as u32))
        })
        .collect()
}

/// Issue a new prescription: pending, unedited, stamped now.
pub fn create(conn: &Connection, input: PrescriptionInput) -> Result<Prescription, ServiceError> {
    require_non_blank("patientId", &input.patient_id)?;
    require_non_blank("doctorId", &input.doctor_id)?;

    let id = Uuid::new_v4();
    let prescription = Prescription {
        id,
        medicines: number_medicines(id, input.medicines)?,
        patient_id: input.patient_id,
        doctor_id: input.doctor_id,
        patient_name: input.patient_name,
        doctor_name: input.doctor_name,
        gender: input.gender,
        age: input.age,
        diagnosis: input.diagnosis,
        symptoms: input.symptoms,
        additional_notes: input.additional_notes,
        follow_up_date: input.follow_up_date,
        created_date: Utc::now(),
        dispensed_status: DispensedStatus::Pending,
        dispensed_date: None,
        dispensed_by: None,
        edited: false,
        last_edited_date: None,
    };

    let tx = conn.unchecked_transaction()?;
    db::insert_prescription(&tx, &prescription)?;
    tx.commit()?;

    tracing::info!(
        id = %prescription.id,
        medicines = prescription.medicines.len(),
        "Prescription created"
    );
    Ok(prescription)
}

/// Doctor edit: replaces the clinical text and the whole medicine list and
/// marks the prescription as edited.
pub fn update(
    conn: &Connection,
    id: &Uuid,
    update: PrescriptionUpdate,
) -> Result<Prescription, ServiceError> {
    let mut prescription = get(conn, id)?;
    prescription.diagnosis = update.diagnosis;
    prescription.symptoms = update.symptoms;
    prescription.additional_notes = update.additional_notes;
    prescription.follow_up_date = update.follow_up_date;
    prescription.medicines = number_medicines(*id, update.medicines)?;
    prescription.edited = true;
    prescription.last_edited_date = Some(Utc::now());

    let tx = conn.unchecked_transaction()?;
    db::update_prescription(&tx, &prescription)?;
    db::replace_medicines(&tx, id, &prescription.medicines)?;
    tx.commit()?;

    Ok(prescription)
}

pub fn dispense(
    conn: &Connection,
    id: &Uuid,
    pharmacist_name: &str,
) -> Result<Prescription, ServiceError> {
    require_non_blank("pharmacistName", pharmacist_name)?;
    let mut prescription = get(conn, id)?;
    prescription.dispensed_status = DispensedStatus::Dispensed;
    prescription.dispensed_date = Some(Utc::now());
    prescription.dispensed_by = Some(pharmacist_name.trim().to_string());

    db::update_prescription(conn, &prescription)?;
    tracing::info!(%id, pharmacist = pharmacist_name, "Prescription dispensed");
    Ok(prescription)
}

pub fn list(conn: &Connection) -> Result<Vec<Prescription>, ServiceError> {
    Ok(db::list_prescriptions(conn)?)
}

pub fn get(conn: &Connection, id: &Uuid) -> Result<Prescription, ServiceError> {
    db::get_prescription(conn, id)?.ok_or_else(|| ServiceError::not_found("Prescription", id))
}

pub fn by_patient(conn: &Connection, patient_id: &str) -> Result<Vec<Prescription>, ServiceError> {
    Ok(db::list_prescriptions_by_party(conn, Party::Patient, patient_id)?)
}

pub fn by_doctor(conn: &Connection, doctor_id: &str) -> Result<Vec<Prescription>, ServiceError> {
    Ok(db::list_prescriptions_by_party(conn, Party::Doctor, doctor_id)?)
}

pub fn by_patient_name(
    conn: &Connection,
    patient_name: &str,
) -> Result<Vec<Prescription>, ServiceError> {
    Ok(db::list_prescriptions_by_patient_name(conn, patient_name)?)
}

pub fn delete(conn: &Connection, id: &Uuid) -> Result<(), ServiceError> {
    db::delete_prescription(conn, id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn medicine(name: &str) -> MedicineInput {
        MedicineInput {
            medicine_name: name.into(),
            dosage: "1 tab".into(),
            frequency: "BID".into(),
            ..Default::default()
        }
    }

    fn input(medicines: &[&str]) -> PrescriptionInput {
        PrescriptionInput {
            patient_id: "p@x.io".into(),
            doctor_id: "d@x.io".into(),
            patient_name: "Pat".into(),
            doctor_name: "Doc".into(),
            diagnosis: "Sinusitis".into(),
            medicines: medicines.iter().map(|m| medicine(m)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn create_starts_pending_and_unedited() {
        let conn = open_memory_database().unwrap();
        let rx = create(&conn, input(&["A", "B"])).unwrap();
        assert_eq!(rx.dispensed_status, DispensedStatus::Pending);
        assert!(!rx.edited);
        assert!(rx.last_edited_date.is_none());

        let stored = get(&conn, &rx.id).unwrap();
        assert_eq!(stored.medicines.len(), 2);
        assert_eq!(stored.medicines[1].position, 1);
        assert!(stored.medicines.iter().all(|m| m.prescription_id == rx.id));
    }

    #[test]
    fn blank_medicine_name_rejected_without_partial_insert() {
        let conn = open_memory_database().unwrap();
        let err = create(&conn, input(&["A", " "])).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(list(&conn).unwrap().is_empty());
    }

    #[test]
    fn update_marks_edited_and_replaces_medicines() {
        let conn = open_memory_database().unwrap();
        let rx = create(&conn, input(&["A", "B", "C"])).unwrap();

        let updated = update(
            &conn,
            &rx.id,
            PrescriptionUpdate {
                diagnosis: "Bronchitis".into(),
                symptoms: "Cough".into(),
                additional_notes: Some("Rest".into()),
                follow_up_date: None,
                medicines: vec![medicine("D"), medicine("E")],
            },
        )
        .unwrap();
        assert!(updated.edited);
        assert!(updated.last_edited_date.is_some());

        let stored = get(&conn, &rx.id).unwrap();
        assert!(stored.edited);
        assert_eq!(stored.diagnosis, "Bronchitis");
        let names: Vec<_> = stored.medicines.iter().map(|m| m.medicine_name.as_str()).collect();
        assert_eq!(names, ["D", "E"]);
        assert_eq!(stored.medicines, updated.medicines);

        let total: i64 = conn
            .query_row("SELECT COUNT(*) FROM medicines", [], |row| row.get(0))
            .unwrap();
        assert_eq!(total, 2);
    }

    #[test]
    fn dispense_records_pharmacist() {
        let conn = open_memory_database().unwrap();
        let rx = create(&conn, input(&["A"])).unwrap();
        let dispensed = dispense(&conn, &rx.id, "Phil").unwrap();
        assert_eq!(dispensed.dispensed_status, DispensedStatus::Dispensed);

        let stored = get(&conn, &rx.id).unwrap();
        assert_eq!(stored.dispensed_by.as_deref(), Some("Phil"));
        assert!(stored.dispensed_date.is_some());
        assert!(!stored.edited);
    }

    #[test]
    fn dispense_requires_name() {
        let conn = open_memory_database().unwrap();
        let rx = create(&conn, input(&[])).unwrap();
        assert!(matches!(
            dispense(&conn, &rx.id, "  "),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn missing_prescription_not_found() {
        let conn = open_memory_database().unwrap();
        let id = Uuid::new_v4();
        assert!(matches!(
            update(&conn, &id, PrescriptionUpdate::default()),
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            dispense(&conn, &id, "Phil"),
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(delete(&conn, &id), Err(ServiceError::NotFound { .. })));
    }

    #[test]
    fn lookups() {
        let conn = open_memory_database().unwrap();
        let rx = create(&conn, input(&["A"])).unwrap();
        let mut other = input(&[]);
        other.patient_id = "q@x.io".into();
        other.patient_name = "Quinn".into();
        create(&conn, other).unwrap();

        assert_eq!(list(&conn).unwrap().len(), 2);
        assert_eq!(by_patient(&conn, "p@x.io").unwrap().len(), 1);
        assert_eq!(by_doctor(&conn, "d@x.io").unwrap().len(), 2);
        assert_eq!(by_patient_name(&conn, "Quinn").unwrap().len(), 1);

        delete(&conn, &rx.id).unwrap();
        assert!(by_patient(&conn, "p@x.io").unwrap().is_empty());
    }
}
