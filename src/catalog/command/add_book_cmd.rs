use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{string_fields, Command, CommandError};

pub(crate) struct AddBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl AddBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct AddBookCommandRequest {
    pub(crate) title: Option<String>,
    pub(crate) author: Option<String>,
    pub(crate) isbn: Option<String>,
}

fn required<'a>(name: &str, value: &'a Option<String>, errors: &mut Vec<String>) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            errors.push(format!("{} must not be empty", name));
            ""
        }
    }
}

impl AddBookCommandRequest {
    pub fn from_json(json: &Value) -> Result<Self, CommandError> {
        let [title, author, isbn] = string_fields(json, ["title", "author", "isbn"])?;
        Ok(Self { title, author, isbn })
    }

    #[cfg(test)]
    pub fn new(title: &str, author: &str, isbn: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            isbn: Some(isbn.to_string()),
        }
    }

    // one message per missing or blank field
    pub fn build_book(&self) -> Result<BookDto, CommandError> {
        let mut errors = vec![];
        let title = required("title", &self.title, &mut errors);
        let author = required("author", &self.author, &mut errors);
        let isbn = required("isbn", &self.isbn, &mut errors);
        if !errors.is_empty() {
            return Err(CommandError::invalid_input(errors));
        }
        Ok(BookDto::new(title, author, isbn))
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct AddBookCommandResponse {
    pub book: BookDto,
}

impl AddBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<AddBookCommandRequest, AddBookCommandResponse> for AddBookCommand {
    async fn execute(&self, req: AddBookCommandRequest) -> Result<AddBookCommandResponse, CommandError> {
        let book = req.build_book()?;
        self.catalog_service.add_book(&book).await.map_err(CommandError::from).map(AddBookCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use serde_json::json;
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    async fn build_command() -> AddBookCommand {
        let svc = factory::create_catalog_service(&Configuration::new("test"), RepositoryStore::Memory).await;
        AddBookCommand::new(Arc::from(svc))
    }

    #[tokio::test]
    async fn test_should_run_add_book() {
        let cmd = build_command().await;

        let res = cmd.execute(AddBookCommandRequest::new("As aventuras", "Leonardo", "001"))
            .await.expect("should add book");
        assert!(res.book.id.is_some());
        assert_eq!("001", res.book.isbn.as_str());
    }

    #[tokio::test]
    async fn test_should_report_every_missing_field() {
        let cmd = build_command().await;

        let res = cmd.execute(AddBookCommandRequest::default()).await;
        match res {
            Err(CommandError::InvalidInput { errors }) => {
                assert_eq!(vec!["title must not be empty", "author must not be empty", "isbn must not be empty"], errors);
            }
            other => panic!("expected invalid input, got {:?}", other),
        }

        let mut req = AddBookCommandRequest::new("As aventuras", "Leonardo", "001");
        req.author = Some("   ".to_string());
        let res = cmd.execute(req).await;
        assert!(matches!(res, Err(CommandError::InvalidInput { ref errors }) if errors.len() == 1));
    }

    #[tokio::test]
    async fn test_should_reject_duplicated_isbn() {
        let cmd = build_command().await;

        let _ = cmd.execute(AddBookCommandRequest::new("A", "B", "001")).await.expect("should add book");
        let res = cmd.execute(AddBookCommandRequest::new("C", "D", "001")).await;
        assert!(matches!(res, Err(CommandError::DuplicateKey { .. })));
    }

    #[tokio::test]
    async fn test_should_read_add_request_from_json() {
        let req = AddBookCommandRequest::from_json(&json!({"title": "A", "author": "B", "isbn": "001"}))
            .expect("should read request");
        assert_eq!(Some("001".to_string()), req.isbn);

        let req = AddBookCommandRequest::from_json(&json!({})).expect("should read request");
        assert!(req.title.is_none());

        let res = AddBookCommandRequest::from_json(&json!({"title": 1, "author": "B"}));
        assert!(matches!(res, Err(CommandError::InvalidInput { ref errors }) if errors.len() == 1));
    }
}
