//! Departments and the user/department projection.

use super::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A row of the `department` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    pub user_id: i32,
    pub loc: String,
}

/// Read-only join of a user with its department. Never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDepartment {
    pub user_id: Option<i32>,
    pub user_name: String,
    pub age: i32,
    pub salary: f64,
    pub department_id: Option<i32>,
    pub department_name: String,
    pub loc: String,
}

impl UserDepartment {
    pub fn join(user: User, department: Department) -> Self {
        UserDepartment {
            user_id: user.id,
            user_name: user.name,
            age: user.age,
            salary: user.salary,
            department_id: department.id,
            department_name: department.name,
            loc: department.loc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_takes_person_fields_from_user_and_the_rest_from_department() {
        let user = User {
            id: Some(2),
            name: "Arjun Das".into(),
            age: 5,
            salary: 1000.0,
            email: "arjundas@company.com".into(),
        };
        let dept = Department {
            id: Some(9),
            name: "Computer".into(),
            user_id: 2,
            loc: "Bangalore".into(),
        };
        let dto = UserDepartment::join(user, dept);
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["userId"], 2);
        assert_eq!(json["userName"], "Arjun Das");
        assert_eq!(json["age"], 5);
        assert_eq!(json["salary"], 1000.0);
        assert_eq!(json["departmentId"], 9);
        assert_eq!(json["departmentName"], "Computer");
        assert_eq!(json["loc"], "Bangalore");
    }

    #[test]
    fn department_uses_camel_case_user_id() {
        let d: Department =
            serde_json::from_str(r#"{"name":"Mechanical","userId":1,"loc":"Mumbai"}"#).unwrap();
        assert_eq!(d.user_id, 1);
        assert_eq!(d.id, None);
    }
}
