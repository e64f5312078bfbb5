use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Case-insensitive lookup, for values arriving in URL paths.
            pub fn parse_ignore_case(s: &str) -> Option<Self> {
                let s = s.trim();
                $(if s.eq_ignore_ascii_case($s) {
                    return Some(Self::$variant);
                })+
                None
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Role {
    Patient => "Patient",
    Doctor => "Doctor",
    Pharmacist => "Pharmacist",
    Admin => "Admin",
});

str_enum!(AppointmentStatus {
    Scheduled => "Scheduled",
    Completed => "Completed",
    Cancelled => "Cancelled",
});

str_enum!(DispensedStatus {
    Pending => "Pending",
    Dispensed => "Dispensed",
});

impl Role {
    /// Doctors and pharmacists need admin verification before they can log in.
    pub fn requires_approval(&self) -> bool {
        matches!(self, Role::Doctor | Role::Pharmacist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn round_trip_as_str() {
        for role in [Role::Patient, Role::Doctor, Role::Pharmacist, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn from_str_is_exact() {
        assert!(AppointmentStatus::from_str("scheduled").is_err());
        assert_eq!(
            AppointmentStatus::from_str("Cancelled").unwrap(),
            AppointmentStatus::Cancelled
        );
    }

    #[test]
    fn parse_ignore_case_accepts_any_case() {
        assert_eq!(Role::parse_ignore_case("doctor"), Some(Role::Doctor));
        assert_eq!(Role::parse_ignore_case(" ADMIN "), Some(Role::Admin));
        assert_eq!(Role::parse_ignore_case("nurse"), None);
    }

    #[test]
    fn invalid_value_reports_field() {
        let err = DispensedStatus::from_str("Lost").unwrap_err();
        match err {
            DatabaseError::InvalidEnum { field, value } => {
                assert_eq!(field, "DispensedStatus");
                assert_eq!(value, "Lost");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn approval_required_for_clinical_staff_only() {
        assert!(Role::Doctor.requires_approval());
        assert!(Role::Pharmacist.requires_approval());
        assert!(!Role::Patient.requires_approval());
        assert!(!Role::Admin.requires_approval());
    }

    #[test]
    fn serde_uses_capitalized_names() {
        let json = serde_json::to_string(&AppointmentStatus::Scheduled).unwrap();
        assert_eq!(json, "\"Scheduled\"");
        let parsed: DispensedStatus = serde_json::from_str("\"Dispensed\"").unwrap();
        assert_eq!(parsed, DispensedStatus::Dispensed);
    }
}
