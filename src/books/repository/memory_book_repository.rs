use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::books::domain::model::BookEntity;
use crate::books::repository::{sort_books, BookPredicate, BookRepository};
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult, PageRequest, PaginatedResult};
use crate::core::repository::Repository;

#[derive(Debug, Default)]
struct BookTable {
    next_id: u64,
    // keyed by numeric id so iteration follows insertion order
    rows: BTreeMap<u64, BookEntity>,
}

impl BookTable {
    fn isbn_taken(&self, isbn: &str, except: Option<u64>) -> bool {
        self.rows.iter().any(|(id, row)| Some(*id) != except && row.isbn == isbn)
    }
}

// MemoryBookRepository keeps the catalog in process memory and enforces the same
// isbn uniqueness constraint a relational store would.
#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    table: RwLock<BookTable>,
}

impl MemoryBookRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

fn parse_id(id: &str) -> Option<u64> {
    id.parse::<u64>().ok()
}

fn require_id(entity: &BookEntity) -> LibraryResult<u64> {
    let id = entity.id()
        .ok_or_else(|| LibraryError::invalid_argument("Book id can not be null"))?;
    parse_id(id).ok_or_else(|| LibraryError::not_found(format!("book not found for {}", id).as_str()))
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let mut table = self.table.write().await;
        if table.isbn_taken(entity.isbn.as_str(), None) {
            return Err(LibraryError::duplicate_key(
                format!("isbn {} already exists", entity.isbn).as_str()));
        }
        table.next_id += 1;
        let id = table.next_id;
        let saved = entity.clone().with_id(id.to_string().as_str());
        table.rows.insert(id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let id = require_id(entity)?;
        let mut table = self.table.write().await;
        let row = table.rows.get_mut(&id)
            .ok_or_else(|| LibraryError::not_found(format!("book not found for {}", id).as_str()))?;
        if row.isbn != entity.isbn {
            return Err(LibraryError::validation(
                format!("isbn of book {} can not be changed", id).as_str(), None));
        }
        row.title = entity.title.to_string();
        row.author = entity.author.to_string();
        Ok(row.clone())
    }

    async fn get(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        let table = self.table.read().await;
        Ok(parse_id(id).and_then(|id| table.rows.get(&id).cloned()))
    }

    async fn delete(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let id = require_id(entity)?;
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).map(|_| 1).unwrap_or(0))
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: &PageRequest) -> LibraryResult<PaginatedResult<BookEntity>> {
        let predicate = BookPredicate::parse(predicate)?;
        let mut matching: Vec<BookEntity> = {
            let table = self.table.read().await;
            table.rows.values().filter(|b| predicate.matches(*b)).cloned().collect()
        };
        if let Some(sort) = &page.sort {
            sort_books(&mut matching, sort)?;
        }
        Ok(PaginatedResult::from_all(page, matching))
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn exists_by_isbn(&self, isbn: &str) -> LibraryResult<bool> {
        let table = self.table.read().await;
        Ok(table.isbn_taken(isbn, None))
    }
}
