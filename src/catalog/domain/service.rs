use std::collections::HashMap;
use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::books::dto::{BookDto, BookFilter};
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::core::domain::{Configuration, Identifiable};
use crate::core::library::{LibraryError, LibraryResult, PageRequest, PaginatedResult};

pub(crate) const DUPLICATE_ISBN_MESSAGE: &str = "Isbn already registered";
pub(crate) const MISSING_ID_MESSAGE: &str = "Book id can not be null";

pub(crate) struct CatalogServiceImpl {
    book_repository: Box<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(_config: &Configuration, book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            book_repository,
        }
    }
}

fn require_id(book: &BookDto) -> LibraryResult<()> {
    if book.is_persisted() {
        Ok(())
    } else {
        Err(LibraryError::invalid_argument(MISSING_ID_MESSAGE))
    }
}

// set fields of the filter become `field -> value` entries of the storage predicate
fn to_predicate(filter: &BookFilter) -> HashMap<String, String> {
    filter.set_fields().into_iter()
        .map(|(field, value)| (field.name().to_string(), value.to_string()))
        .collect()
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto> {
        if self.book_repository.exists_by_isbn(book.isbn.as_str()).await? {
            tracing::warn!(isbn = %book.isbn, "rejected book with registered isbn");
            return Err(LibraryError::duplicate_key(DUPLICATE_ISBN_MESSAGE));
        }
        // the store's own isbn constraint catches a concurrent insert of the same isbn
        let saved = self.book_repository.create(&BookEntity::from(book)).await.map_err(|err| match err {
            LibraryError::DuplicateKey { .. } => {
                tracing::warn!(isbn = %book.isbn, "isbn registered concurrently");
                LibraryError::duplicate_key(DUPLICATE_ISBN_MESSAGE)
            }
            other => other,
        })?;
        tracing::info!(book_id = ?saved.book_id, isbn = %saved.isbn, "added book");
        Ok(BookDto::from(saved))
    }

    async fn remove_book(&self, book: &BookDto) -> LibraryResult<()> {
        require_id(book)?;
        let removed = self.book_repository.delete(&BookEntity::from(book)).await?;
        tracing::info!(book_id = ?book.id, removed, "removed book");
        Ok(())
    }

    async fn update_book(&self, book: &BookDto) -> LibraryResult<BookDto> {
        require_id(book)?;
        let saved = self.book_repository.update(&BookEntity::from(book)).await?;
        tracing::info!(book_id = ?saved.book_id, "updated book");
        Ok(BookDto::from(saved))
    }

    async fn find_book_by_id(&self, id: &str) -> LibraryResult<Option<BookDto>> {
        tracing::debug!(book_id = id, "finding book");
        self.book_repository.get(id).await.map(|b| b.map(BookDto::from))
    }

    async fn find_books(&self, filter: &BookFilter, page: &PageRequest) -> LibraryResult<PaginatedResult<BookDto>> {
        let predicate = to_predicate(filter);
        tracing::debug!(?predicate, page = page.page, page_size = page.page_size, "finding books");
        let res = self.book_repository.query(&predicate, page).await?;
        Ok(res.map(BookDto::from))
    }
}

impl From<BookEntity> for BookDto {
    fn from(other: BookEntity) -> Self {
        Self {
            id: other.book_id,
            title: other.title,
            author: other.author,
            isbn: other.isbn,
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        Self {
            book_id: other.id.clone(),
            title: other.title.to_string(),
            author: other.author.to_string(),
            isbn: other.isbn.to_string(),
        }
    }
}
