//! User operations over the user and department repositories.

use crate::error::AppError;
use crate::model::{NewUser, PageRequest, User, UserDepartment, UserPage, UserProbe};
use crate::sanitize::sanitize;
use crate::store::{
    DepartmentRepository, MemoryDepartmentRepository, MemoryUserRepository, UserRepository,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::task::JoinSet;

pub struct UserService {
    users: Arc<dyn UserRepository>,
    departments: Arc<dyn DepartmentRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, departments: Arc<dyn DepartmentRepository>) -> Self {
        UserService { users, departments }
    }

    /// Service over empty in-memory repositories.
    pub fn in_memory() -> Self {
        UserService::new(
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemoryDepartmentRepository::new()),
        )
    }

    pub fn departments(&self) -> &Arc<dyn DepartmentRepository> {
        &self.departments
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = self.users.save(&new_user.into_user()).await?;
        tracing::info!(user_id = ?user.id, "user created");
        Ok(user)
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>, AppError> {
        self.users.find_all().await
    }

    /// One page of users with the overall count; both queries run concurrently.
    pub async fn get_users(&self, request: PageRequest) -> Result<UserPage, AppError> {
        let (content, total) =
            tokio::try_join!(self.users.find_all_by(&request), self.users.count())?;
        tracing::debug!(page = request.page(), size = request.size(), total, "user page");
        Ok(UserPage::new(content, &request, total))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = self.users.find_by_id(id).await?;
        if user.is_none() {
            tracing::debug!(user_id = id, "user not found");
        }
        Ok(user)
    }

    /// Overwrite age, salary, name and email. `None` if the user does not exist.
    pub async fn update_user(&self, id: i32, patch: NewUser) -> Result<Option<User>, AppError> {
        let Some(mut user) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        user.apply(patch);
        // The row can vanish between the read and the write.
        match self.users.save(&user).await {
            Ok(saved) => {
                tracing::info!(user_id = id, "user updated");
                Ok(Some(saved))
            }
            Err(AppError::NotFound(_) | AppError::Db(sqlx::Error::RowNotFound)) => {
                tracing::debug!(user_id = id, "user deleted before update");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Delete and return the prior state. `None` if the user does not exist.
    pub async fn delete_user(&self, id: i32) -> Result<Option<User>, AppError> {
        let Some(user) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        self.users.delete(&user).await?;
        tracing::info!(user_id = id, "user deleted");
        Ok(Some(user))
    }

    pub async fn find_users_by_age(&self, min_age: i32) -> Result<Vec<User>, AppError> {
        self.users.find_by_age(min_age).await
    }

    /// Look each id up on its own task, then order by descending id.
    /// Unknown ids are left out. A repeated id is looked up once and yields a
    /// single user, not one per occurrence.
    pub async fn fetch_users(&self, ids: &[i32]) -> Result<Vec<User>, AppError> {
        let unique: BTreeSet<i32> = ids.iter().copied().collect();
        let mut lookups = JoinSet::new();
        for id in unique {
            let users = Arc::clone(&self.users);
            lookups.spawn(async move { users.find_by_id(id).await });
        }
        let mut found = Vec::with_capacity(lookups.len());
        while let Some(joined) = lookups.join_next().await {
            if let Some(user) = joined?? {
                found.push(user);
            }
        }
        found.sort_by(|a, b| b.id.cmp(&a.id));
        tracing::debug!(requested = ids.len(), found = found.len(), "users fetched by id");
        Ok(found)
    }

    /// Fetch a user and its department on separate tasks and join them.
    /// `None` unless both exist.
    pub async fn fetch_user_and_department(
        &self,
        user_id: i32,
    ) -> Result<Option<UserDepartment>, AppError> {
        let users = Arc::clone(&self.users);
        let departments = Arc::clone(&self.departments);
        let user = tokio::spawn(async move { users.find_by_id(user_id).await });
        let department =
            tokio::spawn(async move { departments.find_by_user_id(user_id).await });
        let (user, department) = tokio::try_join!(user, department)?;
        match (user?, department?) {
            (Some(u), Some(d)) => Ok(Some(UserDepartment::join(u, d))),
            (u, d) => {
                tracing::debug!(
                    user_id,
                    user_found = u.is_some(),
                    department_found = d.is_some(),
                    "nothing to join"
                );
                Ok(None)
            }
        }
    }

    /// Sanitized example-match search. An input counts as supplied when it is
    /// present and non-empty before sanitizing, so a name that sanitizes to
    /// nothing is an empty prefix and matches everyone. With neither input
    /// supplied the search matches no one.
    pub async fn find_users_by_email_or_name(
        &self,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<Vec<User>, AppError> {
        let probe = UserProbe {
            email: supplied(email).map(|e| sanitize(Some(e))),
            name: supplied(name).map(|n| sanitize(Some(n))),
        };
        if probe.is_empty() {
            tracing::debug!("search without filters matches nothing");
        }
        self.users.find_by_example(&probe).await
    }

    /// Round-trip to the store.
    pub async fn ready(&self) -> Result<(), AppError> {
        self.users.count().await.map(|_| ())
    }
}

fn supplied(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Department;

    fn new_user(name: &str, age: i32, salary: f64) -> NewUser {
        NewUser {
            name: name.into(),
            age,
            salary,
            email: format!("{}@company.com", name.to_lowercase().replace(' ', "")),
        }
    }

    async fn service_with(users: &[(&str, i32)]) -> UserService {
        let svc = UserService::in_memory();
        for (name, age) in users {
            svc.create_user(new_user(name, *age, 100.0)).await.unwrap();
        }
        svc
    }

    #[tokio::test]
    async fn create_then_find_returns_the_same_fields_with_new_id() {
        let svc = UserService::in_memory();
        let input = new_user("Suman Das", 30, 10000.0);
        let created = svc.create_user(input.clone()).await.unwrap();
        let id = created.id.expect("id assigned");
        let found = svc.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found, User { id: Some(id), ..input.into_user() });
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_keeps_id() {
        let svc = service_with(&[("Ann", 20)]).await;
        let patch = new_user("Bea", 44, 9.5);
        let updated = svc.update_user(1, patch.clone()).await.unwrap().unwrap();
        assert_eq!(updated, User { id: Some(1), ..patch.into_user() });
        assert_eq!(svc.find_by_id(1).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn update_of_missing_user_yields_nothing() {
        let svc = service_with(&[("Ann", 20)]).await;
        assert!(svc.update_user(9, new_user("X", 2, 0.0)).await.unwrap().is_none());
        assert_eq!(svc.get_all_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_returns_prior_state_and_removes() {
        let svc = service_with(&[("Ann", 20), ("Bob", 30)]).await;
        let gone = svc.delete_user(2).await.unwrap().unwrap();
        assert_eq!(gone.name, "Bob");
        assert!(svc.find_by_id(2).await.unwrap().is_none());
        assert!(svc.delete_user(2).await.unwrap().is_none());
        assert_eq!(svc.get_all_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn age_filter_is_inclusive_at_every_bound() {
        let svc = service_with(&[("Ann", 1), ("Bob", 30), ("Cid", 150)]).await;
        assert_eq!(svc.find_users_by_age(0).await.unwrap().len(), 3);
        assert_eq!(svc.find_users_by_age(30).await.unwrap().len(), 2);
        assert_eq!(svc.find_users_by_age(150).await.unwrap().len(), 1);
        assert!(svc.find_users_by_age(151).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_users_skips_missing_and_sorts_descending() {
        let svc = service_with(&[("Ann", 20), ("Bob", 30), ("Cid", 40)]).await;
        let ids: Vec<_> = svc
            .fetch_users(&[3, 5, 1])
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![Some(3), Some(1)]);
    }

    #[tokio::test]
    async fn fetch_users_looks_duplicates_up_once() {
        let svc = service_with(&[("Ann", 20), ("Bob", 30)]).await;
        let ids: Vec<_> = svc
            .fetch_users(&[1, 2, 1, 2, 2])
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![Some(2), Some(1)]);
        assert!(svc.fetch_users(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn user_and_department_are_joined() {
        let svc = service_with(&[("Ann", 20)]).await;
        svc.departments()
            .save(&Department {
                id: None,
                name: "Mechanical".into(),
                user_id: 1,
                loc: "Mumbai".into(),
            })
            .await
            .unwrap();
        let dto = svc.fetch_user_and_department(1).await.unwrap().unwrap();
        assert_eq!(dto.user_id, Some(1));
        assert_eq!(dto.user_name, "Ann");
        assert_eq!(dto.age, 20);
        assert_eq!(dto.salary, 100.0);
        assert_eq!(dto.department_id, Some(1));
        assert_eq!(dto.department_name, "Mechanical");
        assert_eq!(dto.loc, "Mumbai");
    }

    #[tokio::test]
    async fn join_needs_both_sides() {
        let svc = service_with(&[("Ann", 20)]).await;
        assert!(svc.fetch_user_and_department(1).await.unwrap().is_none());
        svc.departments()
            .save(&Department {
                id: None,
                name: "Computer".into(),
                user_id: 7,
                loc: "Bangalore".into(),
            })
            .await
            .unwrap();
        assert!(svc.fetch_user_and_department(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn pages_report_total_count() {
        let svc = service_with(&[("A", 1), ("B", 2), ("C", 3), ("D", 4), ("E", 5)]).await;
        let page = svc.get_users(PageRequest::new(0, 2, vec![])).await.unwrap();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        let last = svc.get_users(PageRequest::new(2, 2, vec![])).await.unwrap();
        assert_eq!(last.content.len(), 1);
    }

    #[tokio::test]
    async fn search_matches_name_prefix_or_email_ignoring_case() {
        let svc = service_with(&[("Suman Das", 30), ("Arjun Das", 5), ("Saurabh Ganguly", 40)])
            .await;
        let by_name = svc.find_users_by_email_or_name(None, Some("s")).await.unwrap();
        assert_eq!(by_name.len(), 2);
        let by_email = svc
            .find_users_by_email_or_name(Some("ARJUNDAS@company.com"), None)
            .await
            .unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].name, "Arjun Das");
        let either = svc
            .find_users_by_email_or_name(Some("arjundas@company.com"), Some("Saurabh!!"))
            .await
            .unwrap();
        assert_eq!(either.len(), 2);
    }

    #[tokio::test]
    async fn search_input_is_sanitized() {
        let svc = service_with(&[("OBrien Co", 30)]).await;
        let hits = svc
            .find_users_by_email_or_name(None, Some("O'Brien!! Co."))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    // No filters means "match nothing", not "match everything".
    #[tokio::test]
    async fn search_without_filters_matches_nothing() {
        let svc = service_with(&[("Ann", 20), ("Bob", 30)]).await;
        assert!(svc.find_users_by_email_or_name(None, None).await.unwrap().is_empty());
        assert!(svc
            .find_users_by_email_or_name(Some(""), Some(""))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn name_that_sanitizes_to_nothing_is_an_empty_prefix() {
        let svc = service_with(&[("Ann", 20), ("Bob", 30)]).await;
        let hits = svc.find_users_by_email_or_name(None, Some("!!!")).await.unwrap();
        assert_eq!(hits.len(), 2);
        let hits = svc
            .find_users_by_email_or_name(Some("?"), None)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    /// Reads succeed for any id while writes go to an empty table.
    struct StaleReads(MemoryUserRepository);

    #[async_trait::async_trait]
    impl UserRepository for StaleReads {
        async fn save(&self, user: &User) -> Result<User, AppError> {
            self.0.save(user).await
        }
        async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
            Ok(Some(User { id: Some(id), ..new_user("Gone", 20, 1.0).into_user() }))
        }
        async fn find_all(&self) -> Result<Vec<User>, AppError> {
            self.0.find_all().await
        }
        async fn delete_all(&self) -> Result<(), AppError> {
            self.0.delete_all().await
        }
        async fn delete(&self, user: &User) -> Result<(), AppError> {
            self.0.delete(user).await
        }
        async fn count(&self) -> Result<i64, AppError> {
            self.0.count().await
        }
        async fn find_by_age(&self, min_age: i32) -> Result<Vec<User>, AppError> {
            self.0.find_by_age(min_age).await
        }
        async fn find_all_by(&self, request: &PageRequest) -> Result<Vec<User>, AppError> {
            self.0.find_all_by(request).await
        }
        async fn find_by_example(&self, probe: &UserProbe) -> Result<Vec<User>, AppError> {
            self.0.find_by_example(probe).await
        }
    }

    #[tokio::test]
    async fn update_of_user_deleted_mid_flight_yields_nothing() {
        let svc = UserService::new(
            Arc::new(StaleReads(MemoryUserRepository::new())),
            Arc::new(MemoryDepartmentRepository::new()),
        );
        let updated = svc.update_user(42, new_user("Bea", 44, 9.5)).await.unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn ready_succeeds_on_memory_store() {
        assert!(UserService::in_memory().ready().await.is_ok());
    }
}
