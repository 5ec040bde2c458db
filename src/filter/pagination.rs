use serde::{Deserialize, Serialize};

use super::error::QueryError;

/// Name of the response header carrying [`PaginationMetadata`]. Lowercase for
/// `HeaderName::from_static`.
pub const PAGINATION_HEADER: &str = "x-pagination";

/// A requested page. Construction validates the number and clamps the size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: i64,
    size: i64,
}

impl Page {
    /// Sizes above `max_size` are reduced to it; sizes or numbers below 1 are errors.
    pub fn new(number: i64, size: i64, max_size: i64) -> Result<Self, QueryError> {
        if number < 1 {
            return Err(QueryError::InvalidPageNumber(number));
        }
        if size < 1 {
            return Err(QueryError::InvalidPageSize(size));
        }
        Ok(Self {
            number,
            size: size.min(max_size.max(1)),
        })
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    /// Number of items to skip: `(number - 1) * size`.
    pub fn offset(&self) -> i64 {
        (self.number - 1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    /// Cut this page out of an already filtered and sorted sequence.
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take).collect()
    }

    pub fn metadata(&self, total_item_count: i64) -> PaginationMetadata {
        PaginationMetadata::new(total_item_count, self.size, self.number)
    }
}

/// Counts describing a filtered, paged listing. Sent out-of-band in the
/// `X-Pagination` header, never in the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_item_count: i64,
    pub total_page_count: i64,
    pub page_size: i64,
    pub current_page: i64,
}

impl PaginationMetadata {
    pub fn new(total_item_count: i64, page_size: i64, current_page: i64) -> Self {
        let total_page_count = if page_size > 0 {
            (total_item_count + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            total_item_count,
            total_page_count,
            page_size,
            current_page,
        }
    }
}
