pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod pagination;
pub mod types;

pub use error::QueryError;
pub use filter::CityFilter;
pub use filter_order::CityOrder;
pub use filter_where::CityPredicate;
pub use pagination::{Page, PaginationMetadata, PAGINATION_HEADER};
pub use types::*;
