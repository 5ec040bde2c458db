use serde::{Deserialize, Serialize};

use super::error::QueryError;
use super::filter::CityFilter;
use super::filter_order::CityOrder;
use super::pagination::Page;
use crate::config::QueryConfig;

/// Raw list parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityQueryParams {
    pub name: Option<String>,
    pub search_query: Option<String>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

impl CityQueryParams {
    /// Apply defaults and limits from config and produce a validated query.
    pub fn into_query(self, config: &QueryConfig) -> Result<CityQuery, QueryError> {
        let page_number = self.page_number.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(config.default_page_size);

        if page_size > config.max_page_size && config.debug_logging {
            tracing::warn!(
                "Page size {} exceeds max {}, capping to max",
                page_size,
                config.max_page_size
            );
        }

        let filter = CityFilter::new()
            .name(self.name.as_deref())
            .search(self.search_query.as_deref());
        let page = Page::new(page_number, page_size, config.max_page_size)?;

        Ok(CityQuery::new(filter, page))
    }
}

/// A validated list query: which cities, in which order, which page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    pub filter: CityFilter,
    pub order: CityOrder,
    pub page: Page,
}

impl CityQuery {
    pub fn new(filter: CityFilter, page: Page) -> Self {
        Self {
            filter,
            order: CityOrder::default(),
            page,
        }
    }
}

/// Parameterized SQL fragment. Placeholders are positional `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<String>,
}
