//! Shared request and response types.

mod pagination;
mod response;

pub use pagination::{Paginated, PaginatedTasks, PaginationMeta, PaginationParams};
pub use response::{Created, CreatedId, MessageResponse, NoContent};
