use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::default_true;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: String,
    pub specialization: String,
    pub phone: String,
    pub available: bool,
    pub experience_years: u32,
    pub qualification: String,
}

/// Payload for creating a doctor or replacing all of its fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub qualification: String,
}

impl DoctorInput {
    pub fn into_doctor(self, id: Uuid) -> Doctor {
        Doctor {
            id,
            name: self.name,
            email: self.email,
            department: self.department,
            specialization: self.specialization,
            phone: self.phone,
            available: self.available,
            experience_years: self.experience_years,
            qualification: self.qualification,
        }
    }
}
