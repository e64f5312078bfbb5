use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::enums::Role;
use crate::models::*;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, verified, phone, specialization,
     department, qualification, license_number, experience_years, created_at";

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    let details = user.profile.details();
    conn.execute(
        "INSERT INTO users (id, name, email, password_hash, role, verified, phone, specialization,
         department, qualification, license_number, experience_years, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            user.id.to_string(),
            user.name,
            user.email,
            user.password_hash,
            user.role().as_str(),
            user.verified as i32,
            user.phone,
            details.and_then(|d| d.specialization.clone()),
            details.and_then(|d| d.department.clone()),
            details.and_then(|d| d.qualification.clone()),
            details.and_then(|d| d.license_number.clone()),
            details.and_then(|d| d.experience_years),
            user.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Rewrite every mutable column of an existing user, matched by id.
pub fn update_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    let details = user.profile.details();
    let changed = conn.execute(
        "UPDATE users SET name = ?2, email = ?3, password_hash = ?4, role = ?5, verified = ?6,
         phone = ?7, specialization = ?8, department = ?9, qualification = ?10,
         license_number = ?11, experience_years = ?12
         WHERE id = ?1",
        params![
            user.id.to_string(),
            user.name,
            user.email,
            user.password_hash,
            user.role().as_str(),
            user.verified as i32,
            user.phone,
            details.and_then(|d| d.specialization.clone()),
            details.and_then(|d| d.department.clone()),
            details.and_then(|d| d.qualification.clone()),
            details.and_then(|d| d.license_number.clone()),
            details.and_then(|d| d.experience_years),
        ],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "User".into(),
            id: user.id.to_string(),
        });
    }
    Ok(())
}

pub fn set_user_verified(conn: &Connection, email: &str, verified: bool) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE users SET verified = ?1 WHERE email = ?2",
        params![verified as i32, email],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "User".into(),
            id: email.to_string(),
        });
    }
    Ok(())
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            user_row_from_rusqlite,
        )
        .optional()?;
    row.map(user_from_row).transpose()
}

pub fn email_exists(conn: &Connection, email: &str) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, name ASC"
    ))?;
    let rows = stmt.query_map([], |row| Ok(user_row_from_rusqlite(row)))?;

    let mut users = Vec::new();
    for row in rows {
        users.push(user_from_row(row??)?);
    }
    Ok(users)
}

pub fn list_users_by_role(conn: &Connection, role: Role) -> Result<Vec<User>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE role = ?1 ORDER BY created_at ASC, name ASC"
    ))?;
    let rows = stmt.query_map(params![role.as_str()], |row| Ok(user_row_from_rusqlite(row)))?;

    let mut users = Vec::new();
    for row in rows {
        users.push(user_from_row(row??)?);
    }
    Ok(users)
}

/// Doctors and pharmacists that have not been verified yet.
pub fn list_unverified_clinicians(conn: &Connection) -> Result<Vec<User>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users
         WHERE verified = 0 AND role IN ('Doctor', 'Pharmacist')
         ORDER BY created_at ASC"
    ))?;
    let rows = stmt.query_map([], |row| Ok(user_row_from_rusqlite(row)))?;

    let mut users = Vec::new();
    for row in rows {
        users.push(user_from_row(row??)?);
    }
    Ok(users)
}

pub fn delete_user_by_id(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "User".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

// Internal row type for User mapping
struct UserRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    verified: i32,
    phone: Option<String>,
    specialization: Option<String>,
    department: Option<String>,
    qualification: Option<String>,
    license_number: Option<String>,
    experience_years: Option<u32>,
    created_at: String,
}

fn user_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<UserRow, rusqlite::Error> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: row.get(4)?,
        verified: row.get(5)?,
        phone: row.get(6)?,
        specialization: row.get(7)?,
        department: row.get(8)?,
        qualification: row.get(9)?,
        license_number: row.get(10)?,
        experience_years: row.get(11)?,
        created_at: row.get(12)?,
    })
}

fn user_from_row(row: UserRow) -> Result<User, DatabaseError> {
    let role = Role::from_str(&row.role)?;
    let details = ProfessionalDetails {
        specialization: row.specialization,
        department: row.department,
        qualification: row.qualification,
        license_number: row.license_number,
        experience_years: row.experience_years,
    };
    Ok(User {
        id: parse_uuid("users.id", &row.id)?,
        name: row.name,
        email: row.email,
        password_hash: row.password_hash,
        verified: row.verified != 0,
        phone: row.phone,
        profile: RoleProfile::for_role(role, details),
        created_at: parse_timestamp("users.created_at", &row.created_at)?,
    })
}
