use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryResult, PageRequest, PaginatedResult};

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // create an entity and return it with the id assigned by storage
    async fn create(&self, entity: &Entity) -> LibraryResult<Entity>;

    // updates an entity
    async fn update(&self, entity: &Entity) -> LibraryResult<Entity>;

    // get an entity, None when nothing is stored under the id
    async fn get(&self, id: &str) -> LibraryResult<Option<Entity>>;

    // delete an entity
    async fn delete(&self, entity: &Entity) -> LibraryResult<usize>;

    // find by predicate, each entry is a case-insensitive substring match on one field
    async fn query(&self, predicate: &HashMap::<String, String>,
                   page: &PageRequest) -> LibraryResult<PaginatedResult<Entity>>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
    Memory,
}

impl From<String> for RepositoryStore {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "dynamodb" => RepositoryStore::DynamoDB,
            "local-dynamodb" => RepositoryStore::LocalDynamoDB,
            _ => RepositoryStore::Memory,
        }
    }
}

impl Display for RepositoryStore {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RepositoryStore::DynamoDB => write!(f, "dynamodb"),
            RepositoryStore::LocalDynamoDB => write!(f, "local-dynamodb"),
            RepositoryStore::Memory => write!(f, "memory"),
        }
    }
}
