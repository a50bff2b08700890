/// Window over the vacant inventory listings, by offset
///
/// ```
/// use itam_core_db::repository::pagination::PageRequest;
///
/// let first = PageRequest::new(25, 0);
/// let second = PageRequest::new(25, 25);
/// assert_eq!(second.offset - first.offset, first.limit);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(20, 0)
    }
}

/// One window of vacant assets or computers plus the size of the whole listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Vacant items across every page
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    /// More vacant items lie past this window
    pub fn has_more(&self) -> bool {
        self.offset + self.items.len() < self.total
    }
}
