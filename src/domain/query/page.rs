use std::ops::Range;

/// Zero-based page index plus page size (at least 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }

    pub fn limit(&self) -> u64 {
        self.size as u64
    }

    /// Index range of this page inside a result set of `len` rows.
    /// Empty when the page lies past the end.
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX).min(len);
        let end = start.saturating_add(self.size as usize).min(len);
        start..end
    }
}

/// `ceil(total / size)`; zero rows means zero pages.
pub fn total_pages(total: u64, size: u32) -> u32 {
    let size = size.max(1) as u64;
    let pages = total.div_ceil(size);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One page of results together with the totals of the whole filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_elements: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_elements,
            total_pages: total_pages(total_elements, request.size),
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(7, 1), 7);
    }

    #[test]
    fn zero_size_is_clamped() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.size, 1);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn window_covers_requested_slice() {
        let request = PageRequest::new(1, 3);
        assert_eq!(request.offset(), 3);
        assert_eq!(request.window(10), 3..6);
        assert_eq!(request.window(4), 3..4);
    }

    #[test]
    fn window_past_end_is_empty() {
        let request = PageRequest::new(5, 10);
        assert!(request.window(12).is_empty());
    }

    #[test]
    fn page_beyond_data_keeps_total_pages() {
        let page: Page<u8> = Page::new(Vec::new(), 25, PageRequest::new(9, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 3);
        let mapped = page.map(|b| b as u32);
        assert_eq!(mapped.total_pages, 3);
        assert_eq!(mapped.total_elements, 25);
    }
}
