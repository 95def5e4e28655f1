use serde::Serialize;

use crate::constants::ERR_INVALID_PAGE;
use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::Hobby;

/// One page of the popularity ranking
#[derive(Debug, Clone, Serialize)]
pub struct PopularPage {
    pub hobbies: Vec<Hobby>,
    pub total_pages: u64,
    /// Rank of the first hobby on this page (1-based)
    pub start: u64,
}

/// `ceil(total / page_size)`; zero for an empty catalog
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    let page_size = u64::from(page_size.max(1));
    total.div_ceil(page_size)
}

/// Ranked, paginated views over the catalog
#[derive(Clone)]
pub struct PopularityReporter {
    store: Db,
    page_size: u32,
}

impl PopularityReporter {
    pub fn new(store: Db, page_size: u32) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    /// Page `page` (1-based) of hobbies ranked by user count
    pub async fn page(&self, page: u32) -> Result<PopularPage> {
        if page == 0 {
            return Err(AppError::Validation(ERR_INVALID_PAGE.to_string()));
        }

        let offset = u64::from(page - 1) * u64::from(self.page_size);
        let hobbies = self.store.popular_hobbies(self.page_size, offset).await?;
        let total = self.store.count_hobbies().await?;

        Ok(PopularPage {
            hobbies,
            total_pages: total_pages(total, self.page_size),
            start: offset + 1,
        })
    }
}
