use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::model::Book;

/// In-memory book store
///
/// All operations, reads included, take the same exclusive lock for their
/// whole duration.
pub struct Store {
    books: Mutex<HashMap<String, Book>>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            books: Mutex::new(HashMap::new()),
        }
    }

    // Every mutation is a single map call, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Book>> {
        self.books.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a book, overwriting any record with the same id
    pub fn add(&self, book: Book) {
        self.lock().insert(book.id.clone(), book);
    }

    /// Get the book stored under `id`
    pub fn get(&self, id: &str) -> Option<Book> {
        self.lock().get(id).cloned()
    }

    /// Get every stored book, in no particular order
    pub fn get_all(&self) -> Vec<Book> {
        self.lock().values().cloned().collect()
    }

    /// Replace the book at `book.id`. Returns false if no such book exists.
    pub fn update(&self, book: Book) -> bool {
        let mut books = self.lock();
        match books.get_mut(&book.id) {
            Some(slot) => {
                *slot = book;
                true
            }
            None => false,
        }
    }

    /// Remove the book at `id`. Returns false if no such book exists.
    pub fn delete(&self, id: &str) -> bool {
        self.lock().remove(id).is_some()
    }

    /// Remove every book
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored books
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no books
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn book(id: &str) -> Book {
        Book::new(id, format!("Title {}", id), format!("Author {}", id), format!("ISBN {}", id))
    }

    #[test]
    fn test_add_and_get() {
        let store = Store::new();
        store.add(book("1"));

        assert_eq!(store.get("1"), Some(book("1")));
        assert_eq!(store.get("2"), None);
    }

    #[test]
    fn test_add_overwrites_same_id() {
        let store = Store::new();
        store.add(book("1"));
        store.add(Book::new("1", "Other", "Other", "Other"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("1").unwrap().title, "Other");
    }

    #[test]
    fn test_get_all_is_set_equal() {
        let store = Store::new();
        for id in ["a", "b", "c"] {
            store.add(book(id));
        }

        let all: HashSet<Book> = store.get_all().into_iter().collect();
        let expected: HashSet<Book> = ["a", "b", "c"].into_iter().map(book).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_get_all_empty() {
        let store = Store::new();
        assert!(store.get_all().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_existing() {
        let store = Store::new();
        store.add(book("1"));

        let replacement = Book::new("1", "New Title", "New Author", "New ISBN");
        assert!(store.update(replacement.clone()));
        assert_eq!(store.get("1"), Some(replacement));
    }

    #[test]
    fn test_update_missing_leaves_store_unchanged() {
        let store = Store::new();
        store.add(book("1"));

        assert!(!store.update(book("2")));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("2"), None);
        assert_eq!(store.get("1"), Some(book("1")));
    }

    #[test]
    fn test_delete() {
        let store = Store::new();
        store.add(book("1"));

        assert!(store.delete("1"));
        assert_eq!(store.get("1"), None);
        assert!(!store.delete("1"));
    }

    #[test]
    fn test_clear() {
        let store = Store::new();
        store.add(book("1"));
        store.add(book("2"));

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_adds() {
        let store = Arc::new(Store::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        store.add(book(&format!("{}-{}", t, i)));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 800);
    }
}
