use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::core::library::{LibraryError, LibraryResult, PageRequest, PaginatedResult};
use crate::core::repository::Repository;

pub(crate) type CallLog = Arc<Mutex<Vec<&'static str>>>;

// RecordingBookRepository delegates to the in-memory store and records each call
#[derive(Default)]
pub(crate) struct RecordingBookRepository {
    inner: MemoryBookRepository,
    calls: CallLog,
    // hides registered isbns from exists_by_isbn, as a concurrent insert would
    racing: bool,
    offline: bool,
}

impl RecordingBookRepository {
    pub(crate) fn racing() -> Self {
        Self { racing: true, ..Default::default() }
    }

    pub(crate) fn offline() -> Self {
        Self { offline: true, ..Default::default() }
    }

    pub(crate) fn calls(&self) -> CallLog {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: &'static str) -> LibraryResult<()> {
        self.calls.lock().expect("calls lock").push(call);
        if self.offline {
            return Err(LibraryError::unavailable("store offline", None, true));
        }
        Ok(())
    }
}

pub(crate) fn calls_of(calls: &CallLog, name: &str) -> usize {
    calls.lock().expect("calls lock").iter().filter(|c| **c == name).count()
}

#[async_trait]
impl Repository<BookEntity> for RecordingBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        self.record("create")?;
        self.inner.create(entity).await
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        self.record("update")?;
        self.inner.update(entity).await
    }

    async fn get(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        self.record("get")?;
        self.inner.get(id).await
    }

    async fn delete(&self, entity: &BookEntity) -> LibraryResult<usize> {
        self.record("delete")?;
        self.inner.delete(entity).await
    }

    async fn query(&self, predicate: &HashMap<String, String>, page: &PageRequest) -> LibraryResult<PaginatedResult<BookEntity>> {
        self.record("query")?;
        self.inner.query(predicate, page).await
    }
}

#[async_trait]
impl BookRepository for RecordingBookRepository {
    async fn exists_by_isbn(&self, isbn: &str) -> LibraryResult<bool> {
        self.record("exists_by_isbn")?;
        if self.racing {
            return Ok(false);
        }
        self.inner.exists_by_isbn(isbn).await
    }
}
