use serde::Serialize;

use super::validation::ValidationError;

/// A validated one-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32, max_page_size: u32) -> Result<Self, ValidationError> {
        if page < 1 {
            return Err(ValidationError::PageOutOfRange(page));
        }
        if page_size < 1 || page_size > max_page_size {
            return Err(ValidationError::PageSizeOutOfRange {
                found: page_size,
                max: max_page_size,
            });
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.page_size as usize)
    }

    /// Slice `[(page - 1) * size, page * size)` out of a fully ordered sequence.
    pub fn paginate<T>(&self, ordered: Vec<T>) -> Page<T> {
        let total = ordered.len() as u64;
        let items = ordered
            .into_iter()
            .skip(self.offset())
            .take(self.page_size as usize)
            .collect();
        Page {
            items,
            total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// One page of an ordered result together with the size of the full result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}
