use serde::{Deserialize, Serialize};
use tracing::warn;

/// One page of a fixed sequence plus what a template needs to draw page links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub number: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next.then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous.then_some(self.number - 1)
    }

    /// Global position of the first item on this page.
    pub fn start_index(&self) -> usize {
        (self.number - 1) * self.page_size
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page_size: usize,
}

impl Paginator {
    /// A zero page size is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self { page_size: page_size.max(1) }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Always at least one page, even for an empty sequence.
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size).max(1)
    }

    /// Resolve a raw page parameter; anything that is not a page number in range becomes 1.
    pub fn page_number(&self, raw: Option<&str>, total_items: usize) -> usize {
        let total_pages = self.total_pages(total_items);
        let Some(raw) = raw else { return 1 };
        match raw.trim().parse::<i64>() {
            Ok(n) if n >= 1 && (n as u64) <= total_pages as u64 => n as usize,
            _ => {
                warn!(page = raw, total_pages, "page parameter out of range, showing page 1");
                1
            }
        }
    }

    pub fn page<T>(&self, items: Vec<T>, raw: Option<&str>) -> Page<T> {
        let total_items = items.len();
        let total_pages = self.total_pages(total_items);
        let number = self.page_number(raw, total_items);
        let start = (number - 1) * self.page_size;
        let items: Vec<T> = items.into_iter().skip(start).take(self.page_size).collect();
        Page {
            items,
            number,
            page_size: self.page_size,
            total_items,
            total_pages,
            has_next: number < total_pages,
            has_previous: number > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_item_lands_on_exactly_one_page() {
        let paginator = Paginator::new(12);
        for total in 0..=37 {
            let items: Vec<usize> = (0..total).collect();
            let pages = paginator.total_pages(total);
            let mut seen = Vec::new();
            for n in 1..=pages {
                let page = paginator.page(items.clone(), Some(&n.to_string()));
                assert_eq!(page.number, n);
                seen.extend(page.items);
            }
            assert_eq!(seen, items, "total = {total}");
        }
    }

    #[test]
    fn partial_last_page() {
        let paginator = Paginator::new(12);
        let items: Vec<usize> = (0..37).collect();
        let sizes: Vec<usize> = (1..=4)
            .map(|n| paginator.page(items.clone(), Some(&n.to_string())).items.len())
            .collect();
        assert_eq!(sizes, vec![12, 12, 12, 1]);
    }

    #[test]
    fn bad_page_numbers_fall_back_to_first_page() {
        let paginator = Paginator::new(12);
        let items: Vec<usize> = (0..25).collect();
        let first = paginator.page(items.clone(), None);
        assert_eq!(first.total_pages, 3);
        for raw in ["0", "-5", "abc", "999", "", "2.5"] {
            let page = paginator.page(items.clone(), Some(raw));
            assert_eq!(page, first, "raw = {raw:?}");
        }
    }

    #[test]
    fn empty_sequence_has_one_empty_page() {
        let page = Paginator::new(12).page(Vec::<u8>::new(), Some("1"));
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.number, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_next && !page.has_previous);
    }

    #[test]
    fn neighbour_links() {
        let paginator = Paginator::new(2);
        let page = paginator.page(vec![1, 2, 3, 4, 5], Some(" 2 "));
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.start_index(), 2);
        assert_eq!(page.previous_page_number(), Some(1));
        assert_eq!(page.next_page_number(), Some(3));
    }
}
