use rusqlite::Connection;
use uuid::Uuid;

use super::{require_non_blank, ServiceError};
use crate::db;
use crate::models::*;

pub fn create(conn: &Connection, input: DepartmentInput) -> Result<Department, ServiceError> {
    require_non_blank("name", &input.name)?;
    let department = input.into_department(Uuid::new_v4());
    db::insert_department(conn, &department)?;
    Ok(department)
}

pub fn list(conn: &Connection) -> Result<Vec<Department>, ServiceError> {
    Ok(db::list_departments(conn)?)
}

pub fn active(conn: &Connection) -> Result<Vec<Department>, ServiceError> {
    Ok(db::list_active_departments(conn)?)
}

pub fn by_name(conn: &Connection, name: &str) -> Result<Department, ServiceError> {
    db::get_department_by_name(conn, name)?
        .ok_or_else(|| ServiceError::not_found("Department", name))
}

pub fn get(conn: &Connection, id: &Uuid) -> Result<Department, ServiceError> {
    db::get_department(conn, id)?.ok_or_else(|| ServiceError::not_found("Department", id))
}

pub fn update(
    conn: &Connection,
    id: &Uuid,
    input: DepartmentInput,
) -> Result<Department, ServiceError> {
    require_non_blank("name", &input.name)?;
    let department = input.into_department(*id);
    db::update_department(conn, &department)?;
    Ok(department)
}

pub fn delete(conn: &Connection, id: &Uuid) -> Result<(), ServiceError> {
    db::delete_department(conn, id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn input(name: &str, active: bool) -> DepartmentInput {
        DepartmentInput {
            name: name.into(),
            description: Some(format!("Department of {name}")),
            head: None,
            active,
        }
    }

    #[test]
    fn create_list_and_filter() {
        let conn = open_memory_database().unwrap();
        create(&conn, input("Cardiology", true)).unwrap();
        create(&conn, input("Archive", false)).unwrap();

        assert_eq!(list(&conn).unwrap().len(), 2);
        let active = active(&conn).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Cardiology");
        assert!(by_name(&conn, "Archive").is_ok());
    }

    #[test]
    fn blank_name_rejected() {
        let conn = open_memory_database().unwrap();
        assert!(matches!(
            create(&conn, input("   ", true)),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn duplicate_name_conflicts() {
        let conn = open_memory_database().unwrap();
        create(&conn, input("ENT", true)).unwrap();
        assert!(matches!(
            create(&conn, input("ENT", true)),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn update_and_delete() {
        let conn = open_memory_database().unwrap();
        let dept = create(&conn, input("ENT", true)).unwrap();
        let mut change = input("Otolaryngology", false);
        change.head = Some("Dr Shah".into());
        let updated = update(&conn, &dept.id, change).unwrap();
        assert_eq!(get(&conn, &dept.id).unwrap(), updated);

        delete(&conn, &dept.id).unwrap();
        assert!(matches!(get(&conn, &dept.id), Err(ServiceError::NotFound { .. })));
        assert!(matches!(
            update(&conn, &dept.id, input("X", true)),
            Err(ServiceError::NotFound { .. })
        ));
    }
}
