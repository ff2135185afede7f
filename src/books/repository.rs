pub mod ddb_book_repository;
pub mod memory_book_repository;
#[cfg(test)]
pub(crate) mod recording_book_repository;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;
use async_trait::async_trait;
use crate::books::domain::{Book, BookField};
use crate::books::domain::model::BookEntity;
use crate::core::library::{Direction, LibraryResult, Sort};
use crate::core::repository::Repository;


#[async_trait]
pub(crate) trait BookRepository: Repository<BookEntity> {
    // exact match on the natural key
    async fn exists_by_isbn(&self, isbn: &str) -> LibraryResult<bool>;
}

// BookPredicate is the parsed form of a query predicate: lowercase needles per field,
// all of which must be contained in the record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BookPredicate {
    needles: Vec<(BookField, String)>,
}

impl BookPredicate {
    pub fn parse(predicate: &HashMap<String, String>) -> LibraryResult<Self> {
        let mut needles = vec![];
        for (k, v) in predicate {
            needles.push((BookField::from_str(k.as_str())?, v.to_lowercase()));
        }
        needles.sort_by_key(|(field, _)| field.name());
        Ok(Self { needles })
    }

    pub fn needles(&self) -> &[(BookField, String)] {
        &self.needles
    }

    pub fn matches<B: Book>(&self, book: &B) -> bool {
        self.needles.iter().all(|(field, needle)| {
            book.field(*field).to_lowercase().contains(needle.as_str())
        })
    }
}

// orders records in place, case-insensitively, by the sort property
pub(crate) fn sort_books<B: Book>(books: &mut [B], sort: &Sort) -> LibraryResult<()> {
    let field = BookField::from_str(sort.property.as_str())?;
    books.sort_by(|a, b| {
        let ord = compare_ignore_case(a.field(field), b.field(field));
        match sort.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    });
    Ok(())
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use crate::books::domain::model::BookEntity;
    use crate::books::repository::{sort_books, BookPredicate};
    use crate::core::library::{Direction, Sort};

    #[tokio::test]
    async fn test_should_match_case_insensitive_substring() {
        let predicate = BookPredicate::parse(&HashMap::from([
            ("author".to_string(), "leo".to_string()),
        ])).expect("should parse");
        assert!(predicate.matches(&BookEntity::new("As aventuras", "Leonardo", "001")));
        assert!(predicate.matches(&BookEntity::new("As aventuras", "CLEOPATRA", "002")));
        assert!(!predicate.matches(&BookEntity::new("As aventuras", "Maria", "003")));
    }

    #[tokio::test]
    async fn test_should_and_combine_fields() {
        let predicate = BookPredicate::parse(&HashMap::from([
            ("author".to_string(), "LEO".to_string()),
            ("title".to_string(), "avent".to_string()),
        ])).expect("should parse");
        assert!(predicate.matches(&BookEntity::new("As aventuras", "Leonardo", "001")));
        assert!(!predicate.matches(&BookEntity::new("Dom Casmurro", "Leonardo", "002")));
    }

    #[tokio::test]
    async fn test_should_match_everything_with_empty_predicate() {
        let predicate = BookPredicate::parse(&HashMap::new()).expect("should parse");
        assert!(predicate.needles().is_empty());
        assert!(predicate.matches(&BookEntity::new("any", "one", "x")));
    }

    #[tokio::test]
    async fn test_should_reject_unknown_fields() {
        let res = BookPredicate::parse(&HashMap::from([
            ("publisher".to_string(), "x".to_string()),
        ]));
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn test_should_sort_books() {
        let mut books = vec![
            BookEntity::new("b", "x", "1"),
            BookEntity::new("C", "y", "2"),
            BookEntity::new("a", "z", "3"),
        ];
        sort_books(&mut books, &Sort::new("title", Direction::Asc)).expect("should sort");
        assert_eq!(vec!["a", "b", "C"], books.iter().map(|b| b.title.as_str()).collect::<Vec<_>>());
        sort_books(&mut books, &Sort::new("author", Direction::Desc)).expect("should sort");
        assert_eq!(vec!["z", "y", "x"], books.iter().map(|b| b.author.as_str()).collect::<Vec<_>>());
        assert!(sort_books(&mut books, &Sort::new("pages", Direction::Asc)).is_err());
    }
}
