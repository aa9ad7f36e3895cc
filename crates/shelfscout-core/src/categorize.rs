// Grouping the flat book list into genre buckets
use crate::models::Book;

/// Insertion-ordered mapping from genre to its bucket of books
///
/// Bucket order is the order each genre first appeared in the source list,
/// and that's a contract, not an accident - the first bucket becomes the
/// initially active tab. Backed by a Vec because a shelf has a handful of
/// genres; a linear scan wins over hashing at this size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMap {
    buckets: Vec<(String, Vec<Book>)>,
}

impl CategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn append(&mut self, genre: &str, book: Book) {
        if let Some((_, bucket)) = self.buckets.iter_mut().find(|(g, _)| g == genre) {
            bucket.push(book);
        } else {
            self.buckets.push((genre.to_string(), vec![book]));
        }
    }

    /// Genre keys in first-appearance order
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(g, _)| g.as_str())
    }

    pub fn get(&self, genre: &str) -> Option<&[Book]> {
        self.buckets
            .iter()
            .find(|(g, _)| g == genre)
            .map(|(_, bucket)| bucket.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Book])> {
        self.buckets
            .iter()
            .map(|(g, bucket)| (g.as_str(), bucket.as_slice()))
    }

    /// Bucket at a tab position
    pub fn bucket_at(&self, index: usize) -> Option<(&str, &[Book])> {
        self.buckets
            .get(index)
            .map(|(g, bucket)| (g.as_str(), bucket.as_slice()))
    }

    /// The genre of the initially active tab
    pub fn first_genre(&self) -> Option<&str> {
        self.buckets.first().map(|(g, _)| g.as_str())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Group books by genre, preserving first-seen genre order
///
/// Pure and deterministic: the same input always produces the same map with
/// the same key order. Books without a genre are dropped entirely - ungenred
/// content has no tab to live in. Callers are expected to recompute only when
/// the book list itself changes, not on every render.
pub fn categorize(books: &[Book]) -> CategoryMap {
    let mut map = CategoryMap::new();
    for book in books {
        match &book.genre {
            Some(genre) if !genre.is_empty() => map.append(genre, book.clone()),
            _ => {}
        }
    }
    map
}
