use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: String,
    pub doctor_id: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub age: u32,
    pub gender: Option<String>,
    pub contact_number: Option<String>,
    pub department: Option<String>,
    pub appointment_date: Option<NaiveDate>,
    #[serde(with = "super::optional_time", default)]
    pub appointment_time: Option<NaiveTime>,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub issue_days: u32,
    pub prescription_given: bool,
    pub follow_up_required: bool,
    pub follow_up_date: Option<NaiveDate>,
    pub cancellation_reason: Option<String>,
}

/// Booking payload. Any `status` sent by the client is ignored: new
/// appointments always start as `Scheduled`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentInput {
    pub patient_id: String,
    pub doctor_id: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub appointment_date: Option<NaiveDate>,
    #[serde(with = "super::optional_time", default)]
    pub appointment_time: Option<NaiveTime>,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub issue_days: u32,
    #[serde(default)]
    pub prescription_given: bool,
    #[serde(default)]
    pub follow_up_required: bool,
    #[serde(default)]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

/// Fields replaced by `PUT /api/appointments/:id`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentUpdate {
    pub status: AppointmentStatus,
    #[serde(default)]
    pub appointment_date: Option<NaiveDate>,
    #[serde(with = "super::optional_time", default)]
    pub appointment_time: Option<NaiveTime>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub prescription_given: bool,
    #[serde(default)]
    pub follow_up_required: bool,
    #[serde(default)]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_accepts_short_time_and_ignores_unknown_fields() {
        let input: AppointmentInput = serde_json::from_str(
            r#"{"patientId":"p@x.io","doctorId":"d@x.io","appointmentDate":"2026-03-02",
                "appointmentTime":"09:30","status":"Completed","extra":1}"#,
        )
        .unwrap();
        assert_eq!(input.appointment_time, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(input.status, Some(AppointmentStatus::Completed));
        assert_eq!(input.age, 0);
    }

    #[test]
    fn input_carries_follow_up_fields() {
        let input: AppointmentInput = serde_json::from_str(
            r#"{"patientId":"p","doctorId":"d","followUpRequired":true,
                "prescriptionGiven":true,"followUpDate":"2026-05-01"}"#,
        )
        .unwrap();
        assert!(input.follow_up_required);
        assert!(input.prescription_given);
        assert_eq!(input.follow_up_date, NaiveDate::from_ymd_opt(2026, 5, 1));
        assert!(input.cancellation_reason.is_none());
    }

    #[test]
    fn input_rejects_garbage_time() {
        let result: Result<AppointmentInput, _> = serde_json::from_str(
            r#"{"patientId":"p","doctorId":"d","appointmentTime":"half past nine"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn update_requires_status() {
        let result: Result<AppointmentUpdate, _> = serde_json::from_str(r#"{"reason":"x"}"#);
        assert!(result.is_err());
    }
}
