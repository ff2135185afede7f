use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use crate::core::domain::Identifiable;
use crate::core::library::LibraryError;

pub mod model;

pub(crate) trait Book: Identifiable {
    fn title(&self) -> &str;
    fn author(&self) -> &str;
    fn isbn(&self) -> &str;

    fn field(&self, field: BookField) -> &str {
        match field {
            BookField::Title => self.title(),
            BookField::Author => self.author(),
            BookField::Isbn => self.isbn(),
        }
    }
}

// BookField names the searchable and sortable attributes of a book
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub(crate) enum BookField {
    Title,
    Author,
    Isbn,
}

impl BookField {
    pub fn all() -> [BookField; 3] {
        [BookField::Title, BookField::Author, BookField::Isbn]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Isbn => "isbn",
        }
    }
}

impl FromStr for BookField {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(BookField::Title),
            "author" => Ok(BookField::Author),
            "isbn" => Ok(BookField::Isbn),
            other => Err(LibraryError::validation(
                format!("unknown book field {}", other).as_str(), None)),
        }
    }
}

impl Display for BookField {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
