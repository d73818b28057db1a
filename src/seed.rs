//! Startup data: clears both tables and inserts a small fixed data set.

use crate::error::AppError;
use crate::model::{Department, User};
use crate::store::{DepartmentRepository, UserRepository};

fn initial_users() -> Vec<User> {
    [
        ("Suman Das", 30, 10_000.0, "sumandas@company.com"),
        ("Arjun Das", 5, 1_000.0, "arjundas@company.com"),
        ("Saurabh Ganguly", 40, 1_000_000.0, "sganguly@company.com"),
    ]
    .into_iter()
    .map(|(name, age, salary, email)| User {
        id: None,
        name: name.into(),
        age,
        salary,
        email: email.into(),
    })
    .collect()
}

/// (department name, location, index into the seeded users)
const INITIAL_DEPARTMENTS: &[(&str, &str, usize)] =
    &[("Mechanical", "Mumbai", 0), ("Computer", "Bangalore", 1)];

/// Replace the contents of both tables with the initial data set. Departments
/// point at the ids the store actually assigned to the seeded users.
pub async fn seed_initial_data(
    users: &dyn UserRepository,
    departments: &dyn DepartmentRepository,
) -> Result<(), AppError> {
    departments.delete_all().await?;
    users.delete_all().await?;

    let mut saved = Vec::new();
    for user in initial_users() {
        let user = users.save(&user).await?;
        tracing::info!(user = ?user, "seeded user");
        saved.push(user);
    }

    for (name, loc, owner) in INITIAL_DEPARTMENTS {
        let Some(user_id) = saved.get(*owner).and_then(|u| u.id) else {
            continue;
        };
        let department = departments
            .save(&Department {
                id: None,
                name: (*name).into(),
                user_id,
                loc: (*loc).into(),
            })
            .await?;
        tracing::info!(department = ?department, "seeded department");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryDepartmentRepository, MemoryUserRepository};

    #[tokio::test]
    async fn seeding_twice_leaves_one_copy_linked_to_live_ids() {
        let users = MemoryUserRepository::new();
        let departments = MemoryDepartmentRepository::new();
        seed_initial_data(&users, &departments).await.unwrap();
        seed_initial_data(&users, &departments).await.unwrap();

        let all = users.find_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, Some(4));
        assert_eq!(departments.count().await.unwrap(), 2);

        let suman = departments.find_by_user_id(4).await.unwrap().unwrap();
        assert_eq!(suman.name, "Mechanical");
        let arjun = departments.find_by_user_id(5).await.unwrap().unwrap();
        assert_eq!(arjun.loc, "Bangalore");
        assert!(departments.find_by_user_id(6).await.unwrap().is_none());
    }
}
