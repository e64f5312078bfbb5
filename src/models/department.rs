use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::default_true;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub head: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub head: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl DepartmentInput {
    pub fn into_department(self, id: Uuid) -> Department {
        Department {
            id,
            name: self.name,
            description: self.description,
            head: self.head,
            active: self.active,
        }
    }
}
