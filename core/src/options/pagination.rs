//! `page` / `per_page` support shared by listing and stats variants.

use super::Params;

pub const PAGE: &str = "page";
pub const PER_PAGE: &str = "per_page";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    page: Option<u32>,
    per_page: Option<u32>,
}

impl Pagination {
    pub fn page(&self) -> Option<u32> {
        self.page
    }

    pub fn per_page(&self) -> Option<u32> {
        self.per_page
    }

    /// Add whichever of the two fields are set.
    pub fn write_into(&self, params: &mut Params) {
        if let Some(page) = self.page {
            params.insert(PAGE.to_string(), page.to_string());
        }
        if let Some(per_page) = self.per_page {
            params.insert(PER_PAGE.to_string(), per_page.to_string());
        }
    }
}

/// Gives any variant holding a `Pagination` the two builder setters.
pub trait Paginated: Sized {
    fn pagination(&self) -> &Pagination;

    fn pagination_mut(&mut self) -> &mut Pagination;

    fn page(mut self, page: u32) -> Self {
        self.pagination_mut().page = Some(page);
        self
    }

    fn per_page(mut self, per_page: u32) -> Self {
        self.pagination_mut().per_page = Some(per_page);
        self
    }
}
