//! Typed records exchanged between the store, the service and the HTTP layer.

mod department;
mod page;
mod user;

pub use department::{Department, UserDepartment};
pub use page::{
    Direction, PageRequest, SortOrder, UserField, UserPage, DEFAULT_PAGE_SIZE, DEFAULT_SORT,
    MAX_PAGE_SIZE,
};
pub use user::{NewUser, User, UserProbe};
