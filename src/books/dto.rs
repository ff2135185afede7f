use serde::{Deserialize, Serialize};
use crate::books::domain::{Book, BookField};
use crate::core::domain::Identifiable;

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookDto {
    pub id: Option<String>,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl BookDto {
    pub fn new(title: &str, author: &str, isbn: &str) -> BookDto {
        BookDto {
            id: None,
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
        }
    }
}

impl Identifiable for BookDto {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Book for BookDto {
    fn title(&self) -> &str {
        self.title.as_str()
    }

    fn author(&self) -> &str {
        self.author.as_str()
    }

    fn isbn(&self) -> &str {
        self.isbn.as_str()
    }
}

// BookFilter is a partially populated book used as a search template; every field
// left unset (or blank) places no constraint on the results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl BookFilter {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    #[cfg(test)]
    pub fn author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    #[cfg(test)]
    pub fn isbn(mut self, isbn: &str) -> Self {
        self.isbn = Some(isbn.to_string());
        self
    }

    // set fields only, in title/author/isbn order
    pub fn set_fields(&self) -> Vec<(BookField, &str)> {
        BookField::all().into_iter()
            .filter_map(|field| {
                let value = match field {
                    BookField::Title => self.title.as_deref(),
                    BookField::Author => self.author.as_deref(),
                    BookField::Isbn => self.isbn.as_deref(),
                };
                value.filter(|v| !v.trim().is_empty()).map(|v| (field, v))
            })
            .collect()
    }
}
