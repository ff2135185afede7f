use std::str::FromStr;
use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::{BookDto, BookFilter};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::domain::Configuration;
use crate::core::library::{PageRequest, PaginatedResult, Sort};

pub(crate) struct FindBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
    config: Configuration,
}

impl FindBooksCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>, config: &Configuration) -> Self {
        Self {
            catalog_service,
            config: config.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FindBooksCommandRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub page: Option<usize>,
    pub size: Option<usize>,
    // `property[,asc|desc]`
    pub sort: Option<String>,
}

impl FindBooksCommandRequest {
    pub fn filter(&self) -> BookFilter {
        BookFilter {
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: self.isbn.clone(),
        }
    }

    pub fn page_request(&self, config: &Configuration) -> Result<PageRequest, CommandError> {
        let page = PageRequest::new(self.page.unwrap_or(0), config.page_size(self.size));
        match self.sort.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(sort) => Ok(page.with_sort(Sort::from_str(sort)?)),
            None => Ok(page),
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct FindBooksCommandResponse {
    pub content: Vec<BookDto>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl FindBooksCommandResponse {
    pub fn new(res: PaginatedResult<BookDto>) -> Self {
        let total_pages = res.total_pages();
        Self {
            content: res.records,
            page: res.page,
            size: res.page_size,
            total_elements: res.total_records,
            total_pages,
        }
    }
}

#[async_trait]
impl Command<FindBooksCommandRequest, FindBooksCommandResponse> for FindBooksCommand {
    async fn execute(&self, req: FindBooksCommandRequest) -> Result<FindBooksCommandResponse, CommandError> {
        let page = req.page_request(&self.config)?;
        self.catalog_service.find_books(&req.filter(), &page).await
            .map_err(CommandError::from).map(FindBooksCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::command::find_books_cmd::{FindBooksCommand, FindBooksCommandRequest};
    use crate::catalog::domain::CatalogService;
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    async fn build_commands() -> (AddBookCommand, FindBooksCommand) {
        let config = Configuration::new("test");
        let svc: Arc<dyn CatalogService> = Arc::from(factory::create_catalog_service(&config, RepositoryStore::Memory).await);
        (AddBookCommand::new(Arc::clone(&svc)), FindBooksCommand::new(svc, &config))
    }

    #[tokio::test]
    async fn test_should_run_find_books() {
        let (add_cmd, find_cmd) = build_commands().await;
        let _ = add_cmd.execute(AddBookCommandRequest::new("As aventuras", "Leonardo", "001")).await.expect("should add book");
        let _ = add_cmd.execute(AddBookCommandRequest::new("Memorias", "Maria", "002")).await.expect("should add book");

        let req = FindBooksCommandRequest { author: Some("leo".to_string()), page: Some(0), size: Some(10), ..Default::default() };
        let res = find_cmd.execute(req).await.expect("should find books");
        assert_eq!(1, res.content.len());
        assert_eq!(1, res.total_elements);
        assert_eq!(1, res.total_pages);
        assert_eq!(0, res.page);
        assert_eq!(10, res.size);
        assert_eq!("Leonardo", res.content[0].author.as_str());
    }

    #[tokio::test]
    async fn test_should_default_and_bound_page_size() {
        let (_, find_cmd) = build_commands().await;

        let res = find_cmd.execute(FindBooksCommandRequest::default()).await.expect("should find books");
        assert_eq!(20, res.size);
        assert_eq!(0, res.total_elements);

        let req = FindBooksCommandRequest { size: Some(100_000), ..Default::default() };
        let res = find_cmd.execute(req).await.expect("should find books");
        assert_eq!(500, res.size);
    }

    #[tokio::test]
    async fn test_should_sort_results() {
        let (add_cmd, find_cmd) = build_commands().await;
        for (title, isbn) in [("b", "1"), ("a", "2"), ("c", "3")] {
            let _ = add_cmd.execute(AddBookCommandRequest::new(title, "author", isbn)).await.expect("should add book");
        }
        let req = FindBooksCommandRequest { sort: Some("title,desc".to_string()), ..Default::default() };
        let res = find_cmd.execute(req).await.expect("should find books");
        assert_eq!(vec!["c", "b", "a"], res.content.iter().map(|b| b.title.as_str()).collect::<Vec<_>>());

        let req = FindBooksCommandRequest { sort: Some("pages".to_string()), ..Default::default() };
        let res = find_cmd.execute(req).await;
        assert!(matches!(res, Err(CommandError::Validation { .. })));
    }
}
