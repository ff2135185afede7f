use crate::books::repository::BookRepository;
use crate::books::repository::ddb_book_repository::DDBBookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_book_repository(store: RepositoryStore) -> Box<dyn BookRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBBookRepository::new(client, "books", "book_isbns"))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            // tables may already exist
            let _ = create_table(&client, "books", "book_id").await;
            let _ = create_table(&client, "book_isbns", "isbn").await;
            Box::new(DDBBookRepository::new(client, "books", "book_isbns"))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryBookRepository::new())
        }
    }
}
