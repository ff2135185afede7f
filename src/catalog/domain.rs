pub mod service;

use async_trait::async_trait;
use crate::books::dto::{BookDto, BookFilter};
use crate::core::library::{LibraryResult, PageRequest, PaginatedResult};

#[async_trait]
pub(crate) trait CatalogService: Sync + Send {
    // fails with DuplicateKey when the isbn is already registered
    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto>;
    // the book must carry its id, otherwise InvalidArgument
    async fn remove_book(&self, book: &BookDto) -> LibraryResult<()>;
    async fn update_book(&self, book: &BookDto) -> LibraryResult<BookDto>;
    async fn find_book_by_id(&self, id: &str) -> LibraryResult<Option<BookDto>>;
    async fn find_books(&self, filter: &BookFilter, page: &PageRequest) -> LibraryResult<PaginatedResult<BookDto>>;
}
