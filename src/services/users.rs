//! User lifecycle: signup, approval of clinical staff, login and removal.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use super::{require_non_blank, ServiceError};
use crate::crypto;
use crate::db::{self, Party};
use crate::models::enums::Role;
use crate::models::*;

const NOT_SPECIFIED: &str = "Not specified";
const DEFAULT_DEPARTMENT: &str = "General";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// What a user deletion removed besides the account itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionSummary {
    pub email: String,
    pub role: Role,
    pub appointments_removed: usize,
    pub prescriptions_removed: usize,
    pub doctor_record_removed: bool,
}

/// Self-service registration. Patients and admins are verified at once;
/// doctors and pharmacists wait for admin approval.
pub fn signup(conn: &Connection, request: SignupRequest) -> Result<User, ServiceError> {
    store_account(conn, new_signup_account(request)?)
}

/// Administrative creation. The caller may decide the verification state;
/// otherwise the signup rule applies.
pub fn create_user(conn: &Connection, request: SignupRequest) -> Result<User, ServiceError> {
    store_account(conn, new_admin_account(request)?)
}

/// Validate a signup and hash its password. Needs no connection, so the
/// hashing can run without holding the database lock.
pub fn new_signup_account(request: SignupRequest) -> Result<User, ServiceError> {
    let verified = !request.role.requires_approval();
    new_account(request, verified)
}

pub fn new_admin_account(request: SignupRequest) -> Result<User, ServiceError> {
    let verified = request
        .verified
        .unwrap_or_else(|| !request.role.requires_approval());
    new_account(request, verified)
}

fn new_account(request: SignupRequest, verified: bool) -> Result<User, ServiceError> {
    validate_signup(&request)?;
    Ok(User {
        id: Uuid::new_v4(),
        name: request.name.trim().to_string(),
        email: request.email.trim().to_string(),
        password_hash: crypto::hash_password(&request.password)?,
        verified,
        phone: request.phone.clone(),
        profile: RoleProfile::for_role(request.role, request.professional_details()),
        created_at: Utc::now(),
    })
}

/// Persist an account built by `new_signup_account` or `new_admin_account`.
/// A verified doctor gets an available doctor record in the same transaction.
pub fn store_account(conn: &Connection, user: User) -> Result<User, ServiceError> {
    if db::email_exists(conn, &user.email)? {
        return Err(ServiceError::DuplicateEmail(user.email));
    }

    let tx = conn.unchecked_transaction()?;
    db::insert_user(&tx, &user)?;
    if user.role() == Role::Doctor {
        if user.verified {
            ensure_doctor_record(&tx, &user, None)?;
        } else {
            tracing::info!(
                email = %user.email,
                "Doctor signup pending approval; doctor record deferred"
            );
        }
    }
    tx.commit()?;

    Ok(user)
}

fn validate_signup(request: &SignupRequest) -> Result<(), ServiceError> {
    require_non_blank("name", &request.name)?;
    require_non_blank("password", &request.password)?;
    if !EMAIL_PATTERN.is_match(request.email.trim()) {
        return Err(ServiceError::Validation(format!(
            "invalid email address: {}",
            request.email
        )));
    }
    Ok(())
}

/// Check credentials. Unknown emails and wrong passwords are
/// indistinguishable to the caller.
pub fn login(conn: &Connection, email: &str, password: &str) -> Result<User, ServiceError> {
    let user = find_login_account(conn, email)?;
    check_credentials(user, password)
}

/// First half of `login`: look the account up.
pub fn find_login_account(conn: &Connection, email: &str) -> Result<User, ServiceError> {
    db::get_user_by_email(conn, email.trim())?.ok_or_else(|| {
        tracing::warn!(email, "Login failed: unknown email");
        ServiceError::InvalidCredentials
    })
}

/// Second half of `login`: verify the password and the approval state.
/// Runs without a connection.
pub fn check_credentials(user: User, password: &str) -> Result<User, ServiceError> {
    if !crypto::verify_password(password, &user.password_hash)? {
        tracing::warn!(email = %user.email, "Login failed: wrong password");
        return Err(ServiceError::InvalidCredentials);
    }

    if user.is_pending_approval() {
        tracing::info!(email = %user.email, role = %user.role(), "Login refused: pending approval");
        return Err(ServiceError::PendingApproval);
    }

    Ok(user)
}

/// Approve a user. For doctors this also makes sure their department
/// exists and that they have an available doctor record.
pub fn verify(conn: &Connection, email: &str) -> Result<User, ServiceError> {
    let mut user =
        db::get_user_by_email(conn, email)?.ok_or_else(|| ServiceError::not_found("User", email))?;

    let tx = conn.unchecked_transaction()?;
    db::set_user_verified(&tx, email, true)?;
    user.verified = true;

    if user.role() == Role::Doctor {
        let department_name = user
            .profile
            .details()
            .and_then(|d| d.department.clone())
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string());

        if db::get_department_by_name(&tx, &department_name)?.is_none() {
            db::insert_department(
                &tx,
                &Department {
                    id: Uuid::new_v4(),
                    name: department_name.clone(),
                    description: Some(format!("Department of {department_name}")),
                    head: None,
                    active: true,
                },
            )?;
            tracing::info!(department = %department_name, "Created department on doctor approval");
        }

        ensure_doctor_record(&tx, &user, Some(&department_name))?;
    }

    tx.commit()?;
    tracing::info!(email, role = %user.role(), "User verified");
    Ok(user)
}

/// Remove a user and every record that refers to them. Runs in a single
/// transaction: either everything goes or nothing does.
pub fn delete_user(conn: &Connection, email: &str) -> Result<DeletionSummary, ServiceError> {
    let user =
        db::get_user_by_email(conn, email)?.ok_or_else(|| ServiceError::not_found("User", email))?;

    let mut summary = DeletionSummary {
        email: user.email.clone(),
        role: user.role(),
        appointments_removed: 0,
        prescriptions_removed: 0,
        doctor_record_removed: false,
    };

    let tx = conn.unchecked_transaction()?;
    match user.role() {
        Role::Patient => {
            remove_party_records(&tx, Party::Patient, &user, &mut summary)?;
        }
        Role::Doctor => {
            remove_party_records(&tx, Party::Doctor, &user, &mut summary)?;
            if let Some(doctor) = db::get_doctor_by_email(&tx, &user.email)? {
                db::delete_doctor(&tx, &doctor.id)?;
                summary.doctor_record_removed = true;
            }
        }
        Role::Pharmacist | Role::Admin => {}
    }
    db::delete_user_by_id(&tx, &user.id)?;
    tx.commit()?;

    tracing::info!(
        email,
        role = %summary.role,
        appointments = summary.appointments_removed,
        prescriptions = summary.prescriptions_removed,
        doctor_record = summary.doctor_record_removed,
        "User deleted"
    );
    Ok(summary)
}

/// Records are matched on the stored party id (email or user id); when
/// nothing matches, fall back to the display name.
fn remove_party_records(
    conn: &Connection,
    party: Party,
    user: &User,
    summary: &mut DeletionSummary,
) -> Result<(), ServiceError> {
    let user_id = user.id.to_string();
    let keys = [user.email.as_str(), user_id.as_str()];

    let mut appointments = db::delete_appointments_by_party_ids(conn, party, &keys)?;
    if appointments == 0 {
        appointments = db::delete_appointments_by_party_name(conn, party, &user.name)?;
    }

    let mut prescriptions = db::delete_prescriptions_by_party_ids(conn, party, &keys)?;
    if prescriptions == 0 {
        prescriptions = db::delete_prescriptions_by_party_name(conn, party, &user.name)?;
    }

    summary.appointments_removed = appointments;
    summary.prescriptions_removed = prescriptions;
    Ok(())
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>, ServiceError> {
    Ok(db::list_users(conn)?)
}

pub fn get_user(conn: &Connection, email: &str) -> Result<User, ServiceError> {
    db::get_user_by_email(conn, email)?.ok_or_else(|| ServiceError::not_found("User", email))
}

/// Users with the given role, matched case-insensitively. An unknown role
/// matches nobody.
pub fn users_by_role(conn: &Connection, role: &str) -> Result<Vec<User>, ServiceError> {
    match Role::parse_ignore_case(role) {
        Some(role) => Ok(db::list_users_by_role(conn, role)?),
        None => Ok(Vec::new()),
    }
}

/// Doctors and pharmacists waiting for approval.
pub fn pending_verification(conn: &Connection) -> Result<Vec<User>, ServiceError> {
    Ok(db::list_unverified_clinicians(conn)?)
}

/// Replace name, role and phone. The password is re-hashed only when a
/// non-empty one is supplied.
pub fn update_user(conn: &Connection, email: &str, update: UserUpdate) -> Result<User, ServiceError> {
    let password_hash = new_password_hash(update.password.as_deref())?;
    apply_user_update(conn, email, update, password_hash)
}

/// Hash a replacement password; blank means keep the current one.
pub fn new_password_hash(password: Option<&str>) -> Result<Option<String>, ServiceError> {
    match password.filter(|p| !p.is_empty()) {
        Some(password) => Ok(Some(crypto::hash_password(password)?)),
        None => Ok(None),
    }
}

/// Store a user update whose password, if any, is already hashed.
/// `update.password` is ignored.
pub fn apply_user_update(
    conn: &Connection,
    email: &str,
    update: UserUpdate,
    password_hash: Option<String>,
) -> Result<User, ServiceError> {
    require_non_blank("name", &update.name)?;
    let mut user = get_user(conn, email)?;

    let details = user.profile.details().cloned().unwrap_or_default();
    user.name = update.name.trim().to_string();
    user.profile = RoleProfile::for_role(update.role, details);
    user.phone = update.phone;
    if let Some(hash) = password_hash {
        user.password_hash = hash;
    }

    db::update_user(conn, &user)?;
    Ok(user)
}

/// Mark the doctor's existing record available, or create one from the
/// user's profile. Doctor emails are unique, so a seeded record is reused.
fn ensure_doctor_record(
    conn: &Connection,
    user: &User,
    department: Option<&str>,
) -> Result<(), ServiceError> {
    match db::get_doctor_by_email(conn, &user.email)? {
        Some(mut doctor) => {
            doctor.available = true;
            db::update_doctor(conn, &doctor)?;
            tracing::info!(email = %user.email, "Marked existing doctor record available");
        }
        None => {
            let doctor = doctor_from_user(user, department);
            db::insert_doctor(conn, &doctor)?;
            tracing::info!(email = %user.email, department = %doctor.department, "Created doctor record");
        }
    }
    Ok(())
}

fn doctor_from_user(user: &User, department: Option<&str>) -> Doctor {
    let details = user.profile.details().cloned().unwrap_or_default();
    let or_default = |value: Option<String>| {
        value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| NOT_SPECIFIED.to_string())
    };
    Doctor {
        id: Uuid::new_v4(),
        name: user.name.clone(),
        email: user.email.clone(),
        department: department
            .map(str::to_string)
            .unwrap_or_else(|| or_default(details.department)),
        specialization: or_default(details.specialization),
        phone: user.phone.clone().unwrap_or_default(),
        available: true,
        experience_years: details.experience_years.unwrap_or(0),
        qualification: or_default(details.qualification),
    }
}
