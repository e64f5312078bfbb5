use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::DispensedStatus;

/// One line item of a prescription. Owned by exactly one prescription and
/// removed together with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: Uuid,
    pub prescription_id: Uuid,
    pub position: u32,
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub instructions: String,
    pub quantity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineInput {
    pub medicine_name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub quantity: String,
}

impl MedicineInput {
    pub fn into_medicine(self, prescription_id: Uuid, position: u32) -> Medicine {
        Medicine {
            id: Uuid::new_v4(),
            prescription_id,
            position,
            medicine_name: self.medicine_name,
            dosage: self.dosage,
            frequency: self.frequency,
            duration: self.duration,
            instructions: self.instructions,
            quantity: self.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: Uuid,
    pub patient_id: String,
    pub doctor_id: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub gender: Option<String>,
    pub age: u32,
    pub diagnosis: String,
    pub symptoms: String,
    pub medicines: Vec<Medicine>,
    pub additional_notes: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub created_date: DateTime<Utc>,
    pub dispensed_status: DispensedStatus,
    pub dispensed_date: Option<DateTime<Utc>>,
    pub dispensed_by: Option<String>,
    pub edited: bool,
    pub last_edited_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionInput {
    pub patient_id: String,
    pub doctor_id: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub medicines: Vec<MedicineInput>,
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub follow_up_date: Option<NaiveDate>,
}

/// Fields replaced by `PUT /api/prescriptions/:id`. The medicine list is
/// replaced wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionUpdate {
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default)]
    pub medicines: Vec<MedicineInput>,
}
