use rusqlite::Connection;
use uuid::Uuid;

use super::{require_non_blank, ServiceError};
use crate::db::{self, Party};
use crate::models::enums::AppointmentStatus;
use crate::models::*;

/// Book an appointment. The stored status is always `Scheduled`, whatever
/// the caller sent; every other field is kept as given.
pub fn create(conn: &Connection, input: AppointmentInput) -> Result<Appointment, ServiceError> {
    require_non_blank("patientId", &input.patient_id)?;
    require_non_blank("doctorId", &input.doctor_id)?;

    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_id: input.patient_id,
        doctor_id: input.doctor_id,
        patient_name: input.patient_name,
        doctor_name: input.doctor_name,
        age: input.age,
        gender: input.gender,
        contact_number: input.contact_number,
        department: input.department,
        appointment_date: input.appointment_date,
        appointment_time: input.appointment_time,
        status: AppointmentStatus::Scheduled,
        reason: input.reason,
        issue_days: input.issue_days,
        prescription_given: input.prescription_given,
        follow_up_required: input.follow_up_required,
        follow_up_date: input.follow_up_date,
        cancellation_reason: input.cancellation_reason,
    };
    db::insert_appointment(conn, &appointment)?;
    tracing::info!(id = %appointment.id, "Appointment scheduled");
    Ok(appointment)
}

pub fn update(
    conn: &Connection,
    id: &Uuid,
    update: AppointmentUpdate,
) -> Result<Appointment, ServiceError> {
    let mut appointment = get(conn, id)?;
    appointment.status = update.status;
    appointment.appointment_date = update.appointment_date;
    appointment.appointment_time = update.appointment_time;
    appointment.reason = update.reason;
    appointment.prescription_given = update.prescription_given;
    appointment.follow_up_required = update.follow_up_required;
    appointment.follow_up_date = update.follow_up_date;
    appointment.cancellation_reason = update.cancellation_reason;

    db::update_appointment(conn, &appointment)?;
    Ok(appointment)
}

/// Change only the status. An absent cancellation reason keeps the stored one.
pub fn update_status(
    conn: &Connection,
    id: &Uuid,
    status: AppointmentStatus,
    cancellation_reason: Option<String>,
) -> Result<Appointment, ServiceError> {
    let mut appointment = get(conn, id)?;
    appointment.status = status;
    if let Some(reason) = cancellation_reason {
        appointment.cancellation_reason = Some(reason);
    }
    db::update_appointment(conn, &appointment)?;
    tracing::info!(%id, status = %status, "Appointment status changed");
    Ok(appointment)
}

pub fn list(conn: &Connection) -> Result<Vec<Appointment>, ServiceError> {
    Ok(db::list_appointments(conn)?)
}

pub fn get(conn: &Connection, id: &Uuid) -> Result<Appointment, ServiceError> {
    db::get_appointment(conn, id)?.ok_or_else(|| ServiceError::not_found("Appointment", id))
}

pub fn by_patient(conn: &Connection, patient_id: &str) -> Result<Vec<Appointment>, ServiceError> {
    Ok(db::list_appointments_by_party(conn, Party::Patient, patient_id)?)
}

pub fn by_doctor(conn: &Connection, doctor_id: &str) -> Result<Vec<Appointment>, ServiceError> {
    Ok(db::list_appointments_by_party(conn, Party::Doctor, doctor_id)?)
}

pub fn by_status(
    conn: &Connection,
    status: AppointmentStatus,
) -> Result<Vec<Appointment>, ServiceError> {
    Ok(db::list_appointments_by_status(conn, status)?)
}

pub fn delete(conn: &Connection, id: &Uuid) -> Result<(), ServiceError> {
    db::delete_appointment(conn, id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use chrono::NaiveDate;

    fn input(patient: &str, doctor: &str) -> AppointmentInput {
        AppointmentInput {
            patient_id: patient.into(),
            doctor_id: doctor.into(),
            patient_name: "Pat".into(),
            doctor_name: "Doc".into(),
            appointment_date: NaiveDate::from_ymd_opt(2026, 5, 4),
            reason: Some("Cough".into()),
            ..Default::default()
        }
    }

    #[test]
    fn create_forces_scheduled() {
        let conn = open_memory_database().unwrap();
        let mut req = input("p@x.io", "d@x.io");
        req.status = Some(AppointmentStatus::Completed);
        let appt = create(&conn, req).unwrap();
        assert_eq!(appt.status, AppointmentStatus::Scheduled);
        assert_eq!(get(&conn, &appt.id).unwrap().status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn create_keeps_follow_up_fields() {
        let conn = open_memory_database().unwrap();
        let mut req = input("p@x.io", "d@x.io");
        req.prescription_given = true;
        req.follow_up_required = true;
        req.follow_up_date = NaiveDate::from_ymd_opt(2026, 5, 1);
        let appt = create(&conn, req).unwrap();

        let stored = get(&conn, &appt.id).unwrap();
        assert_eq!(stored.status, AppointmentStatus::Scheduled);
        assert!(stored.prescription_given);
        assert!(stored.follow_up_required);
        assert_eq!(stored.follow_up_date, NaiveDate::from_ymd_opt(2026, 5, 1));
    }

    #[test]
    fn create_requires_parties() {
        let conn = open_memory_database().unwrap();
        let err = create(&conn, input("", "d@x.io")).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn update_replaces_fields() {
        let conn = open_memory_database().unwrap();
        let appt = create(&conn, input("p@x.io", "d@x.io")).unwrap();
        let updated = update(
            &conn,
            &appt.id,
            AppointmentUpdate {
                status: AppointmentStatus::Completed,
                appointment_date: NaiveDate::from_ymd_opt(2026, 5, 6),
                appointment_time: None,
                reason: None,
                prescription_given: true,
                follow_up_required: true,
                follow_up_date: NaiveDate::from_ymd_opt(2026, 6, 1),
                cancellation_reason: None,
            },
        )
        .unwrap();
        assert_eq!(updated.status, AppointmentStatus::Completed);
        assert!(updated.reason.is_none());

        let stored = get(&conn, &appt.id).unwrap();
        assert_eq!(stored, updated);
        assert_eq!(stored.patient_name, "Pat");
    }

    #[test]
    fn update_status_keeps_reason_when_absent() {
        let conn = open_memory_database().unwrap();
        let appt = create(&conn, input("p@x.io", "d@x.io")).unwrap();
        update_status(
            &conn,
            &appt.id,
            AppointmentStatus::Cancelled,
            Some("Patient travelling".into()),
        )
        .unwrap();
        let again = update_status(&conn, &appt.id, AppointmentStatus::Scheduled, None).unwrap();
        assert_eq!(again.status, AppointmentStatus::Scheduled);
        assert_eq!(again.cancellation_reason.as_deref(), Some("Patient travelling"));
    }

    #[test]
    fn missing_appointment_not_found() {
        let conn = open_memory_database().unwrap();
        let id = Uuid::new_v4();
        assert!(matches!(get(&conn, &id), Err(ServiceError::NotFound { .. })));
        assert!(matches!(
            update_status(&conn, &id, AppointmentStatus::Completed, None),
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(delete(&conn, &id), Err(ServiceError::NotFound { .. })));
    }

    #[test]
    fn lookups_filter_by_party_and_status() {
        let conn = open_memory_database().unwrap();
        let a = create(&conn, input("p1", "d1")).unwrap();
        create(&conn, input("p1", "d2")).unwrap();
        create(&conn, input("p2", "d1")).unwrap();
        update_status(&conn, &a.id, AppointmentStatus::Cancelled, None).unwrap();

        assert_eq!(list(&conn).unwrap().len(), 3);
        assert_eq!(by_patient(&conn, "p1").unwrap().len(), 2);
        assert_eq!(by_doctor(&conn, "d1").unwrap().len(), 2);
        assert_eq!(by_status(&conn, AppointmentStatus::Cancelled).unwrap().len(), 1);
        assert_eq!(by_status(&conn, AppointmentStatus::Scheduled).unwrap().len(), 2);

        delete(&conn, &a.id).unwrap();
        assert_eq!(list(&conn).unwrap().len(), 2);
    }
}
