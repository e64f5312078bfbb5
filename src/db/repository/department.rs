use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::uuid_column;
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_department(conn: &Connection, dept: &Department) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO departments (id, name, description, head, active)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            dept.id.to_string(),
            dept.name,
            dept.description,
            dept.head,
            dept.active as i32,
        ],
    )?;
    Ok(())
}

pub fn update_department(conn: &Connection, dept: &Department) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE departments SET name = ?2, description = ?3, head = ?4, active = ?5 WHERE id = ?1",
        params![
            dept.id.to_string(),
            dept.name,
            dept.description,
            dept.head,
            dept.active as i32,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Department".into(),
            id: dept.id.to_string(),
        });
    }
    Ok(())
}

pub fn get_department(conn: &Connection, id: &Uuid) -> Result<Option<Department>, DatabaseError> {
    conn.query_row(
        "SELECT id, name, description, head, active FROM departments WHERE id = ?1",
        params![id.to_string()],
        department_from_rusqlite,
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn get_department_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<Department>, DatabaseError> {
    conn.query_row(
        "SELECT id, name, description, head, active FROM departments WHERE name = ?1",
        params![name],
        department_from_rusqlite,
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn list_departments(conn: &Connection) -> Result<Vec<Department>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, head, active FROM departments ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([], department_from_rusqlite)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn list_active_departments(conn: &Connection) -> Result<Vec<Department>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, head, active FROM departments
         WHERE active = 1 ORDER BY name ASC",
    )?;
    let rows = stmt.query_map([], department_from_rusqlite)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn delete_department(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM departments WHERE id = ?1", params![id.to_string()])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Department".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn count_departments(conn: &Connection) -> Result<i64, DatabaseError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM departments", [], |row| row.get(0))?)
}

fn department_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<Department, rusqlite::Error> {
    Ok(Department {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        head: row.get(3)?,
        active: row.get::<_, i32>(4)? != 0,
    })
}
