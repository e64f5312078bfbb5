use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Role;

/// Clinical credentials carried only by doctors and pharmacists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalDetails {
    pub specialization: Option<String>,
    pub department: Option<String>,
    pub qualification: Option<String>,
    pub license_number: Option<String>,
    pub experience_years: Option<u32>,
}

/// Role of a user account. Clinical roles carry their credentials; the
/// variant tag is serialized as the `role` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum RoleProfile {
    Patient,
    Doctor(ProfessionalDetails),
    Pharmacist(ProfessionalDetails),
    Admin,
}

impl RoleProfile {
    /// Build the profile for `role`, discarding credentials for roles that
    /// do not carry any.
    pub fn for_role(role: Role, details: ProfessionalDetails) -> Self {
        match role {
            Role::Patient => RoleProfile::Patient,
            Role::Doctor => RoleProfile::Doctor(details),
            Role::Pharmacist => RoleProfile::Pharmacist(details),
            Role::Admin => RoleProfile::Admin,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Patient => Role::Patient,
            RoleProfile::Doctor(_) => Role::Doctor,
            RoleProfile::Pharmacist(_) => Role::Pharmacist,
            RoleProfile::Admin => Role::Admin,
        }
    }

    pub fn details(&self) -> Option<&ProfessionalDetails> {
        match self {
            RoleProfile::Doctor(d) | RoleProfile::Pharmacist(d) => Some(d),
            RoleProfile::Patient | RoleProfile::Admin => None,
        }
    }
}

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub verified: bool,
    pub phone: Option<String>,
    #[serde(flatten)]
    pub profile: RoleProfile,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    /// Doctors and pharmacists awaiting admin verification.
    pub fn is_pending_approval(&self) -> bool {
        !self.verified && self.role().requires_approval()
    }
}

/// Payload for `POST /auth/signup` and `POST /api/users`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    /// Honoured only for administrative creation; signup derives it from the role.
    #[serde(default)]
    pub verified: Option<bool>,
}

impl SignupRequest {
    pub fn professional_details(&self) -> ProfessionalDetails {
        ProfessionalDetails {
            specialization: self.specialization.clone(),
            department: self.department.clone(),
            qualification: self.qualification.clone(),
            license_number: self.license_number.clone(),
            experience_years: self.experience_years,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for `PUT /api/users/:email`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(profile: RoleProfile) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            password_hash: "secret-hash".into(),
            verified: false,
            phone: None,
            profile,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn doctor_serializes_role_tag_and_flat_details() {
        let user = sample(RoleProfile::Doctor(ProfessionalDetails {
            specialization: Some("Cardiology".into()),
            experience_years: Some(7),
            ..Default::default()
        }));
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "Doctor");
        assert_eq!(json["specialization"], "Cardiology");
        assert_eq!(json["experienceYears"], 7);
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn patient_has_no_clinical_fields() {
        let json = serde_json::to_value(sample(RoleProfile::Patient)).unwrap();
        assert_eq!(json["role"], "Patient");
        assert!(json.get("specialization").is_none());
    }

    #[test]
    fn for_role_drops_details_for_patients() {
        let details = ProfessionalDetails {
            department: Some("ENT".into()),
            ..Default::default()
        };
        assert_eq!(
            RoleProfile::for_role(Role::Patient, details.clone()),
            RoleProfile::Patient
        );
        assert_eq!(
            RoleProfile::for_role(Role::Pharmacist, details.clone()).details(),
            Some(&details)
        );
    }

    #[test]
    fn pending_approval_only_for_unverified_clinicians() {
        assert!(sample(RoleProfile::Doctor(Default::default())).is_pending_approval());
        assert!(!sample(RoleProfile::Admin).is_pending_approval());
    }

    #[test]
    fn signup_request_accepts_camel_case() {
        let req: SignupRequest = serde_json::from_str(
            r#"{"name":"N","email":"n@x.io","password":"pw","role":"Doctor","licenseNumber":"L-1","experienceYears":3}"#,
        )
        .unwrap();
        assert_eq!(req.role, Role::Doctor);
        let details = req.professional_details();
        assert_eq!(details.license_number.as_deref(), Some("L-1"));
        assert_eq!(details.experience_years, Some(3));
        assert!(req.verified.is_none());
    }
}
