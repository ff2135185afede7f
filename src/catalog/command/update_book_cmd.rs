use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{string_fields, Command, CommandError};

pub(crate) struct UpdateBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl UpdateBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

// isbn is not part of the request: it is carried over from the stored book
#[derive(Debug, Default)]
pub(crate) struct UpdateBookCommandRequest {
    pub book_id: String,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl UpdateBookCommandRequest {
    pub fn from_json(book_id: &str, json: &Value) -> Result<Self, CommandError> {
        let [title, author] = string_fields(json, ["title", "author"])?;
        Ok(Self { book_id: book_id.to_string(), title, author })
    }

    #[cfg(test)]
    pub fn new(book_id: &str, title: &str, author: &str) -> Self {
        Self {
            book_id: book_id.to_string(),
            title: Some(title.to_string()),
            author: Some(author.to_string()),
        }
    }

    fn validate(&self) -> Result<(), CommandError> {
        let errors: Vec<String> = [("title", &self.title), ("author", &self.author)].iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| format!("{} must not be empty", name))
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CommandError::invalid_input(errors))
        }
    }

    // id and isbn come from the stored book, title and author from the request
    pub fn apply_to(&self, existing: &BookDto) -> BookDto {
        BookDto {
            id: existing.id.clone(),
            title: self.title.clone().unwrap_or_default(),
            author: self.author.clone().unwrap_or_default(),
            isbn: existing.isbn.to_string(),
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct UpdateBookCommandResponse {
    pub book: BookDto,
}

impl UpdateBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<UpdateBookCommandRequest, UpdateBookCommandResponse> for UpdateBookCommand {
    async fn execute(&self, req: UpdateBookCommandRequest) -> Result<UpdateBookCommandResponse, CommandError> {
        req.validate()?;
        let existing = self.catalog_service.find_book_by_id(req.book_id.as_str()).await?
            .ok_or_else(|| CommandError::not_found(format!("book not found for {}", req.book_id).as_str()))?;
        let book = req.apply_to(&existing);
        self.catalog_service.update_book(&book).await.map_err(CommandError::from).map(UpdateBookCommandResponse::new)
    }
}
