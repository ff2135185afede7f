use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, Delete, Put, ReturnValue, TransactWriteItem};
use uuid::Uuid;

use crate::books::domain::BookField;
use crate::books::domain::model::BookEntity;
use crate::books::repository::{sort_books, BookPredicate, BookRepository};
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult, PageRequest, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::ddb::{add_contains_expr, is_conditional_check_failed, is_transaction_canceled, parse_string_attribute};

// DDBBookRepository stores books in one table keyed by book_id and claims each isbn in a
// second table keyed by isbn, both written in the same transaction.
#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
    isbn_table_name: String,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str, isbn_table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            isbn_table_name: isbn_table_name.to_string(),
        }
    }

    // scans the whole table, following LastEvaluatedKey, keeping rows that match
    async fn scan_matching(&self, predicate: &BookPredicate) -> LibraryResult<Vec<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let mut records = vec![];
        let mut exclusive_start_key = None;
        loop {
            let mut request = self.client
                .scan()
                .table_name(table_name)
                .consistent_read(false)
                .set_exclusive_start_key(exclusive_start_key);
            let mut filter_expr = String::new();
            for (field, needle) in predicate.needles() {
                let attr = lowercase_attribute(*field);
                add_contains_expr(attr.as_str(), &mut filter_expr);
                request = request.expression_attribute_values(format!(":{}", attr).as_str(), AttributeValue::S(needle.to_string()));
            }
            if !filter_expr.is_empty() {
                request = request.filter_expression(filter_expr);
            }
            let res = request.send().await.map_err(LibraryError::from)?;
            if let Some(items) = res.items.as_ref() {
                records.extend(items.iter().map(map_to_book));
            }
            match res.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }
        Ok(records)
    }
}

fn lowercase_attribute(field: BookField) -> String {
    format!("{}_lc", field.name())
}

fn require_id(entity: &BookEntity) -> LibraryResult<String> {
    entity.id()
        .map(str::to_string)
        .ok_or_else(|| LibraryError::invalid_argument("Book id can not be null"))
}

#[async_trait]
impl Repository<BookEntity> for DDBBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let saved = entity.clone().with_id(Uuid::new_v4().to_string().as_str());
        let book_id = require_id(&saved)?;
        let book_put = Put::builder()
            .table_name(self.table_name.as_str())
            .set_item(Some(to_item(&saved, book_id.as_str())))
            .condition_expression("attribute_not_exists(book_id)")
            .build();
        let isbn_put = Put::builder()
            .table_name(self.isbn_table_name.as_str())
            .item("isbn", AttributeValue::S(saved.isbn.to_string()))
            .item("book_id", AttributeValue::S(book_id.to_string()))
            .condition_expression("attribute_not_exists(isbn)")
            .build();
        self.client
            .transact_write_items()
            .transact_items(TransactWriteItem::builder().put(book_put).build())
            .transact_items(TransactWriteItem::builder().put(isbn_put).build())
            .send()
            .await
            .map_err(|err| {
                if is_transaction_canceled(&err) {
                    LibraryError::duplicate_key(format!("isbn {} already exists", saved.isbn).as_str())
                } else {
                    LibraryError::from(err)
                }
            })?;
        Ok(saved)
    }

    // only title and author are written, the isbn claim never moves
    async fn update(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        let book_id = require_id(entity)?;
        let res = match self.client
            .update_item()
            .table_name(table_name)
            .key("book_id", AttributeValue::S(book_id.to_string()))
            .update_expression("SET #title = :title, title_lc = :title_lc, #author = :author, author_lc = :author_lc")
            .expression_attribute_names("#title", "title")
            .expression_attribute_names("#author", "author")
            .expression_attribute_values(":title", AttributeValue::S(entity.title.to_string()))
            .expression_attribute_values(":title_lc", AttributeValue::S(entity.title.to_lowercase()))
            .expression_attribute_values(":author", AttributeValue::S(entity.author.to_string()))
            .expression_attribute_values(":author_lc", AttributeValue::S(entity.author.to_lowercase()))
            .expression_attribute_values(":isbn", AttributeValue::S(entity.isbn.to_string()))
            .condition_expression("attribute_exists(book_id) AND isbn = :isbn")
            .return_values(ReturnValue::AllNew)
            .send()
            .await {
            Ok(res) => res,
            // the condition covers both a missing row and a changed isbn, the stored row tells them apart
            Err(err) if is_conditional_check_failed(&err) => {
                return match self.get(book_id.as_str()).await? {
                    None => Err(LibraryError::not_found(format!("book not found for {}", book_id).as_str())),
                    Some(_) => Err(LibraryError::validation(
                        format!("isbn of book {} can not be changed", book_id).as_str(), None)),
                };
            }
            Err(err) => return Err(LibraryError::from(err)),
        };
        match res.attributes {
            Some(map) => Ok(map_to_book(&map)),
            None => Ok(entity.clone()),
        }
    }

    async fn get(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let res = self.client
            .get_item()
            .table_name(table_name)
            .consistent_read(true)
            .key("book_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map_err(LibraryError::from)?;
        Ok(res.item.as_ref().map(map_to_book))
    }

    async fn delete(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let book_id = require_id(entity)?;
        let book_delete = Delete::builder()
            .table_name(self.table_name.as_str())
            .key("book_id", AttributeValue::S(book_id.to_string()))
            .condition_expression("attribute_exists(book_id)")
            .build();
        let isbn_delete = Delete::builder()
            .table_name(self.isbn_table_name.as_str())
            .key("isbn", AttributeValue::S(entity.isbn.to_string()))
            .build();
        match self.client
            .transact_write_items()
            .transact_items(TransactWriteItem::builder().delete(book_delete).build())
            .transact_items(TransactWriteItem::builder().delete(isbn_delete).build())
            .send()
            .await {
            Ok(_) => Ok(1),
            Err(err) if is_transaction_canceled(&err) => Ok(0),
            Err(err) => Err(LibraryError::from(err)),
        }
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: &PageRequest) -> LibraryResult<PaginatedResult<BookEntity>> {
        let predicate = BookPredicate::parse(predicate)?;
        let mut matching = self.scan_matching(&predicate).await?;
        if let Some(sort) = &page.sort {
            sort_books(&mut matching, sort)?;
        }
        Ok(PaginatedResult::from_all(page, matching))
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {
    async fn exists_by_isbn(&self, isbn: &str) -> LibraryResult<bool> {
        let table_name: &str = self.isbn_table_name.as_ref();
        let res = self.client
            .get_item()
            .table_name(table_name)
            .consistent_read(true)
            .key("isbn", AttributeValue::S(isbn.to_string()))
            .send()
            .await.map_err(LibraryError::from)?;
        Ok(res.item.is_some())
    }
}

fn to_item(entity: &BookEntity, book_id: &str) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("book_id".to_string(), AttributeValue::S(book_id.to_string())),
        ("title".to_string(), AttributeValue::S(entity.title.to_string())),
        ("author".to_string(), AttributeValue::S(entity.author.to_string())),
        ("isbn".to_string(), AttributeValue::S(entity.isbn.to_string())),
        (lowercase_attribute(BookField::Title), AttributeValue::S(entity.title.to_lowercase())),
        (lowercase_attribute(BookField::Author), AttributeValue::S(entity.author.to_lowercase())),
        (lowercase_attribute(BookField::Isbn), AttributeValue::S(entity.isbn.to_lowercase())),
    ])
}

fn map_to_book(map: &HashMap<String, AttributeValue>) -> BookEntity {
    BookEntity {
        book_id: parse_string_attribute("book_id", map),
        title: parse_string_attribute("title", map).unwrap_or_default(),
        author: parse_string_attribute("author", map).unwrap_or_default(),
        isbn: parse_string_attribute("isbn", map).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use lazy_static::lazy_static;

    use crate::books::domain::model::BookEntity;
    use crate::books::repository::BookRepository;
    use crate::books::repository::ddb_book_repository::{map_to_book, to_item, DDBBookRepository};
    use crate::core::library::{LibraryError, PageRequest};
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::utils::ddb::{build_db_client, create_table, delete_table};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let client = build_db_client(RepositoryStore::LocalDynamoDB).await;
                let _ = delete_table(&client, "books").await;
                let _ = delete_table(&client, "book_isbns").await;
                let _ = create_table(&client, "books", "book_id").await;
                let _ = create_table(&client, "book_isbns", "isbn").await;
                client
            });
    }

    #[tokio::test]
    async fn test_should_map_items_both_ways() {
        let book = BookEntity::new("As Aventuras", "Leonardo", "001");
        let item = to_item(&book, "abc");
        assert!(item.contains_key("title_lc"));
        let loaded = map_to_book(&item);
        assert_eq!(book.with_id("abc"), loaded);
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_should_create_get_books() {
        let books_repo = DDBBookRepository::new(CLIENT.get().await.clone(), "books", "book_isbns");
        let book = BookEntity::new("test book", "Leonardo", "ddb-isbn-1");
        let saved = books_repo.create(&book).await.expect("should create book");
        let book_id = saved.book_id.clone().expect("should assign id");

        let loaded = books_repo.get(book_id.as_str()).await.expect("should return book").expect("should exist");
        assert_eq!(saved, loaded);
        assert!(books_repo.exists_by_isbn("ddb-isbn-1").await.expect("should check isbn"));
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_should_reject_duplicate_isbn() {
        let books_repo = DDBBookRepository::new(CLIENT.get().await.clone(), "books", "book_isbns");
        let _ = books_repo.create(&BookEntity::new("a", "b", "ddb-isbn-2")).await.expect("should create book");
        let res = books_repo.create(&BookEntity::new("c", "d", "ddb-isbn-2")).await;
        assert!(matches!(res, Err(LibraryError::DuplicateKey { .. })));
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_should_create_update_books() {
        let books_repo = DDBBookRepository::new(CLIENT.get().await.clone(), "books", "book_isbns");
        let mut book = books_repo.create(&BookEntity::new("test book", "Leonardo", "ddb-isbn-3")).await.expect("should create book");

        book.title = "new title".to_string();
        let updated = books_repo.update(&book).await.expect("should update book");
        assert_eq!("new title", updated.title.as_str());
        assert_eq!("ddb-isbn-3", updated.isbn.as_str());

        book.isbn = "ddb-isbn-3-changed".to_string();
        let res = books_repo.update(&book).await;
        assert!(matches!(res, Err(LibraryError::Validation { .. })));
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_should_not_update_missing_books() {
        let books_repo = DDBBookRepository::new(CLIENT.get().await.clone(), "books", "book_isbns");
        let missing = BookEntity::new("test book", "Leonardo", "ddb-isbn-5").with_id("missing");

        let res = books_repo.update(&missing).await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
        assert!(books_repo.get("missing").await.expect("should query").is_none());
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_should_create_query_books() {
        let books_repo = DDBBookRepository::new(CLIENT.get().await.clone(), "books", "book_isbns");
        for i in 0..15 {
            let book = BookEntity::new(format!("Query Title {}", i / 5).as_str(), "Maria",
                                       format!("ddb-query-{}", i).as_str());
            let _ = books_repo.create(&book).await.expect("should create book");
        }
        let predicate = HashMap::from([
            ("title".to_string(), "query title 1".to_string()),
        ]);
        let res = books_repo.query(&predicate, &PageRequest::new(0, 3)).await.expect("should return books");
        assert_eq!(3, res.records.len());
        assert_eq!(5, res.total_records);
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_should_create_delete_books() {
        let books_repo = DDBBookRepository::new(CLIENT.get().await.clone(), "books", "book_isbns");
        let book = books_repo.create(&BookEntity::new("test book", "Leonardo", "ddb-isbn-4")).await.expect("should create book");

        let deleted = books_repo.delete(&book).await.expect("should delete book");
        assert_eq!(1, deleted);
        assert!(!books_repo.exists_by_isbn("ddb-isbn-4").await.expect("should check isbn"));

        let loaded = books_repo.get(book.book_id.as_deref().unwrap_or_default()).await.expect("should query");
        assert!(loaded.is_none());
    }
}
