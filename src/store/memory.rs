//! In-process repositories. Ids come from a counter and are never reused,
//! the same way a `SERIAL` column behaves.

use super::{DepartmentRepository, UserRepository};
use crate::error::AppError;
use crate::model::{Department, PageRequest, User, UserProbe};
use crate::sql::Record;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

struct Rows<T> {
    by_id: BTreeMap<i32, T>,
    last_id: i32,
}

struct MemoryTable<T> {
    rows: RwLock<Rows<T>>,
}

impl<T: Record + Clone> MemoryTable<T> {
    fn new() -> Self {
        MemoryTable {
            rows: RwLock::new(Rows {
                by_id: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    async fn save(&self, entity: &T) -> Result<T, AppError> {
        let mut rows = self.rows.write().await;
        let mut stored = entity.clone();
        match entity.id() {
            None => {
                rows.last_id += 1;
                stored.set_id(rows.last_id);
            }
            Some(id) if !rows.by_id.contains_key(&id) => {
                return Err(AppError::NotFound(format!("{} {}", T::TABLE.name, id)));
            }
            Some(_) => {}
        }
        if let Some(id) = stored.id() {
            rows.by_id.insert(id, stored.clone());
        }
        Ok(stored)
    }

    async fn find_by_id(&self, id: i32) -> Option<T> {
        self.rows.read().await.by_id.get(&id).cloned()
    }

    async fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .read()
            .await
            .by_id
            .values()
            .filter(|r| pred(r))
            .cloned()
            .collect()
    }

    async fn delete_all(&self) {
        self.rows.write().await.by_id.clear();
    }

    async fn delete(&self, entity: &T) {
        if let Some(id) = entity.id() {
            self.rows.write().await.by_id.remove(&id);
        }
    }

    async fn count(&self) -> i64 {
        self.rows.read().await.by_id.len() as i64
    }
}

pub struct MemoryUserRepository {
    table: MemoryTable<User>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        MemoryUserRepository {
            table: MemoryTable::new(),
        }
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MemoryDepartmentRepository {
    table: MemoryTable<Department>,
}

impl MemoryDepartmentRepository {
    pub fn new() -> Self {
        MemoryDepartmentRepository {
            table: MemoryTable::new(),
        }
    }
}

impl Default for MemoryDepartmentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn save(&self, user: &User) -> Result<User, AppError> {
        self.table.save(user).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        Ok(self.table.filter(|_| true).await)
    }

    async fn delete_all(&self) -> Result<(), AppError> {
        self.table.delete_all().await;
        Ok(())
    }

    async fn delete(&self, user: &User) -> Result<(), AppError> {
        self.table.delete(user).await;
        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.table.count().await)
    }

    async fn find_by_age(&self, min_age: i32) -> Result<Vec<User>, AppError> {
        Ok(self.table.filter(|u| u.age >= min_age).await)
    }

    async fn find_all_by(&self, request: &PageRequest) -> Result<Vec<User>, AppError> {
        let mut users = self.table.filter(|_| true).await;
        users.sort_by(|a, b| request.compare(a, b));
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        Ok(users
            .into_iter()
            .skip(offset)
            .take(request.size() as usize)
            .collect())
    }

    async fn find_by_example(&self, probe: &UserProbe) -> Result<Vec<User>, AppError> {
        Ok(self.table.filter(|u| probe.matches(u)).await)
    }
}

#[async_trait]
impl DepartmentRepository for MemoryDepartmentRepository {
    async fn save(&self, department: &Department) -> Result<Department, AppError> {
        self.table.save(department).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Department>, AppError> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn find_all(&self) -> Result<Vec<Department>, AppError> {
        Ok(self.table.filter(|_| true).await)
    }

    async fn delete_all(&self) -> Result<(), AppError> {
        self.table.delete_all().await;
        Ok(())
    }

    async fn delete(&self, department: &Department) -> Result<(), AppError> {
        self.table.delete(department).await;
        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.table.count().await)
    }

    async fn find_by_user_id(&self, user_id: i32) -> Result<Option<Department>, AppError> {
        Ok(self
            .table
            .filter(|d| d.user_id == user_id)
            .await
            .into_iter()
            .next())
    }
}
