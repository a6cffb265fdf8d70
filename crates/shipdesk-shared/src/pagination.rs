//! Page-number pagination over an ordered collection.
//!
//! Pages are 1-based. Page `n` covers `[(n-1)*limit, n*limit)` of the
//! matching items in storage order; `has_more` is `true` while the window end
//! is still below the total.

use serde::{Deserialize, Serialize};

use crate::error::{ShipdeskError, ShipdeskResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Rejects `page == 0` and `limit == 0`.
    pub fn validate(&self) -> ShipdeskResult<()> {
        if self.page == 0 {
            return Err(ShipdeskError::InvalidArgument(
                "page must be at least 1".to_string(),
            ));
        }
        if self.limit == 0 {
            return Err(ShipdeskError::InvalidArgument(
                "limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Half-open index window `[start, end)` for this page.
    pub fn window(&self) -> (usize, usize) {
        let start = (self.page.saturating_sub(1) as usize).saturating_mul(self.limit as usize);
        (start, start.saturating_add(self.limit as usize))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_count: usize,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total_count: 0,
            has_more: false,
        }
    }
}

/// Slice one page out of `items`. A page past the end is an empty page,
/// not an error.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> ShipdeskResult<Page<T>> {
    request.validate()?;

    let total_count = items.len();
    let (start, end) = request.window();
    let data: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(end - start)
        .collect();

    Ok(Page {
        data,
        total_count,
        has_more: end < total_count,
    })
}
