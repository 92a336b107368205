//! Paging primitives shared by every listing endpoint.
//!
//! `PagedList` serializes in the conventional page shape (`content`,
//! `pageable`, `totalElements`, `totalPages`, ...) so clients can page through
//! any collection the same way.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::{Deserialize, Serialize as DeriveSerialize};

use crate::error::{DomainError, DomainResult};

/// A request for one page of a collection (0-based page number).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, DeriveSerialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE_NUMBER: u32 = 0;
    pub const DEFAULT_PAGE_SIZE: u32 = 25;
    pub const MAX_PAGE_SIZE: u32 = 1000;

    /// Build a page request. The page size must be at least 1.
    pub fn of(page_number: u32, page_size: u32) -> DomainResult<Self> {
        if page_size == 0 {
            return Err(DomainError::validation("pageSize must be at least 1"));
        }
        Ok(Self {
            page_number,
            page_size: page_size.min(Self::MAX_PAGE_SIZE),
        })
    }

    /// Build a page request from optional query parameters, filling defaults.
    pub fn from_params(page_number: Option<u32>, page_size: Option<u32>) -> DomainResult<Self> {
        Self::of(
            page_number.unwrap_or(Self::DEFAULT_PAGE_NUMBER),
            page_size.unwrap_or(Self::DEFAULT_PAGE_SIZE),
        )
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Index of the first element of this page in the full collection.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: Self::DEFAULT_PAGE_NUMBER,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of records plus the request that produced it and the total count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedList<T> {
    content: Vec<T>,
    pageable: PageRequest,
    total_elements: u64,
}

impl<T> PagedList<T> {
    /// Wrap an already-sliced page.
    ///
    /// When the page reaches past `total` (it is the last page) and holds
    /// content, the total is recomputed from the offset and the content length.
    pub fn new(content: Vec<T>, pageable: PageRequest, total: u64) -> Self {
        let total_elements = if !content.is_empty()
            && pageable.offset() + u64::from(pageable.page_size()) > total
        {
            pageable.offset() + content.len() as u64
        } else {
            total
        };

        Self {
            content,
            pageable,
            total_elements,
        }
    }

    /// Slice the requested page out of a full, already ordered collection.
    pub fn from_all(items: Vec<T>, pageable: PageRequest) -> Self {
        let total = items.len() as u64;
        let offset = usize::try_from(pageable.offset()).unwrap_or(usize::MAX);
        let content: Vec<T> = items
            .into_iter()
            .skip(offset)
            .take(pageable.page_size() as usize)
            .collect();

        Self {
            content,
            pageable,
            total_elements: total,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn pageable(&self) -> PageRequest {
        self.pageable
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(u64::from(self.pageable.page_size()))
    }

    pub fn is_first(&self) -> bool {
        self.pageable.page_number() == 0
    }

    pub fn is_last(&self) -> bool {
        u64::from(self.pageable.page_number()) + 1 >= self.total_pages()
    }

    /// Convert every element, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            content: self.content.into_iter().map(f).collect(),
            pageable: self.pageable,
            total_elements: self.total_elements,
        }
    }
}

#[derive(DeriveSerialize)]
#[serde(rename_all = "camelCase")]
struct PageableView {
    page_number: u32,
    page_size: u32,
    offset: u64,
}

impl<T: Serialize> Serialize for PagedList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut page = serializer.serialize_struct("PagedList", 10)?;
        page.serialize_field("content", &self.content)?;
        page.serialize_field(
            "pageable",
            &PageableView {
                page_number: self.pageable.page_number(),
                page_size: self.pageable.page_size(),
                offset: self.pageable.offset(),
            },
        )?;
        page.serialize_field("totalElements", &self.total_elements)?;
        page.serialize_field("totalPages", &self.total_pages())?;
        page.serialize_field("number", &self.pageable.page_number())?;
        page.serialize_field("size", &self.pageable.page_size())?;
        page.serialize_field("numberOfElements", &self.content.len())?;
        page.serialize_field("first", &self.is_first())?;
        page.serialize_field("last", &self.is_last())?;
        page.serialize_field("empty", &self.content.is_empty())?;
        page.end()
    }
}
