use crate::books::domain::Book;
use crate::core::domain::Identifiable;

// BookEntity is the persisted catalog record. The isbn is the natural key and unique
// across the catalog; book_id is assigned by the store on creation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BookEntity {
    pub book_id: Option<String>,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl BookEntity {
    #[cfg(test)]
    pub fn new(title: &str, author: &str, isbn: &str) -> Self {
        Self {
            book_id: None,
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
        }
    }

    pub fn with_id(mut self, book_id: &str) -> Self {
        self.book_id = Some(book_id.to_string());
        self
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> Option<&str> {
        self.book_id.as_deref()
    }
}

impl Book for BookEntity {
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
