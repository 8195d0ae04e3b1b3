use serde::Serialize;

use crate::{Result, err};

pub const USERS_PER_PAGE: usize = 10;

/// One 1-based window over an in-memory list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T: Clone> Page<T> {
    pub fn slice(all: &[T], page: usize, per_page: usize) -> Result<Self> {
        if page == 0 {
            return Err(err!("pages start at 1"));
        }
        if per_page == 0 {
            return Err(err!("page size must be positive"));
        }

        let total_items = all.len();
        let start = (page - 1).saturating_mul(per_page).min(total_items);
        let end = start.saturating_add(per_page).min(total_items);

        Ok(Self {
            items: all[start..end].to_vec(),
            page,
            per_page,
            total_items,
            total_pages: total_items.div_ceil(per_page),
        })
    }
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
