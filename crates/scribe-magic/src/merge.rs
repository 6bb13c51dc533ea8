//! Load-order merge of the records Scribe cares about.

use std::path::Path;

use rustc_hash::FxHashMap;
use scribe_esm::types::{Book, Enchantment, Npc, TypedRecord};
use scribe_esm::{FileHeader, RecordScanner, Tag};
use tracing::{debug, info};

use crate::{Error, Result};

/// A record with a load-order identity.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Book {
    fn id(&self) -> &str {
        Book::id(self)
    }
}

impl Identified for Enchantment {
    fn id(&self) -> &str {
        Enchantment::id(self)
    }
}

impl Identified for Npc {
    fn id(&self) -> &str {
        Npc::id(self)
    }
}

/// Records keyed by identifier, last definition wins.
///
/// An identifier keeps the position of its first definition, so iteration
/// follows the order in which records first appeared in the load order
/// while yielding their final definitions.
#[derive(Debug, Clone)]
pub struct LoadOrder<T> {
    index: FxHashMap<String, usize>,
    records: Vec<T>,
}

impl<T> Default for LoadOrder<T> {
    fn default() -> Self {
        Self {
            index: FxHashMap::default(),
            records: Vec::new(),
        }
    }
}

impl<T: Identified> LoadOrder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, replacing and returning any earlier definition.
    pub fn insert(&mut self, record: T) -> Option<T> {
        let existing = self.index.get(record.id()).copied();
        match existing {
            Some(slot) => Some(std::mem::replace(&mut self.records[slot], record)),
            None => {
                self.index.insert(record.id().to_string(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    /// The effective definition of an identifier.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&slot| &self.records[slot])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }
}

impl<T: Identified> FromIterator<T> for LoadOrder<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut merged = Self::new();
        for record in iter {
            merged.insert(record);
        }
        merged
    }
}

impl<T> IntoIterator for LoadOrder<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a LoadOrder<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Deduplicate records in scan order; later definitions win.
pub fn merge_by_identifier<T, I>(records: I) -> LoadOrder<T>
where
    T: Identified,
    I: IntoIterator<Item = T>,
{
    records.into_iter().collect()
}

/// Split items into those matching `predicate` and the rest, keeping
/// relative order in both.
pub fn partition<T, I, F>(items: I, predicate: F) -> (Vec<T>, Vec<T>)
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> bool,
{
    items.into_iter().partition(predicate)
}

/// The merged books, enchantments and NPCs of a load order.
///
/// Each record kind is merged in its own namespace.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub books: LoadOrder<Book>,
    pub enchantments: LoadOrder<Enchantment>,
    pub npcs: LoadOrder<Npc>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one record into its namespace.
    pub fn add(&mut self, record: TypedRecord) {
        match record {
            TypedRecord::Book(book) => {
                self.books.insert(book);
            }
            TypedRecord::Enchantment(ench) => {
                self.enchantments.insert(ench);
            }
            TypedRecord::Npc(npc) => {
                self.npcs.insert(npc);
            }
        }
    }

    /// Scan a plugin and merge its records over the current ones.
    ///
    /// Returns the number of records merged. Any read error aborts: a
    /// partly scanned plugin would silently change which definitions win.
    pub fn scan_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let scan_error = |source| Error::Scan {
            path: path.to_path_buf(),
            source,
        };

        let mut merged = 0;
        for record in RecordScanner::open(path).map_err(scan_error)? {
            let record = record.map_err(scan_error)?;

            if record.tag == Tag::TES3 {
                if let Ok(header) = FileHeader::from_record(&record) {
                    debug!(
                        author = %header.author,
                        records = header.record_count,
                        "reading {}",
                        path.display()
                    );
                }
                continue;
            }

            if let Some(typed) = TypedRecord::from_record(&record) {
                self.add(typed);
                merged += 1;
            }
        }

        info!("{}: {} records of interest", path.display(), merged);
        Ok(merged)
    }

    /// Scan plugins in load order.
    pub fn scan_files<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut corpus = Self::new();
        for path in paths {
            corpus.scan_file(path)?;
        }
        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str, u32);

    impl Identified for Item {
        fn id(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_last_definition_wins() {
        let merged = merge_by_identifier(vec![Item("a", 1), Item("b", 1), Item("a", 2)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("a"), Some(&Item("a", 2)));

        // Position of first definition is kept.
        let order: Vec<&Item> = merged.iter().collect();
        assert_eq!(order, vec![&Item("a", 2), &Item("b", 1)]);
    }

    #[test]
    fn test_order_decides_priority() {
        let a = Item("x", 1);
        let b = Item("x", 2);
        let ab = merge_by_identifier(vec![a.clone(), b.clone()]);
        let ba = merge_by_identifier(vec![b, a]);
        assert_eq!(ab.get("x").unwrap().1, 2);
        assert_eq!(ba.get("x").unwrap().1, 1);
    }

    #[test]
    fn test_merge_is_repeatable() {
        let input = vec![Item("a", 1), Item("b", 2), Item("a", 3), Item("c", 4)];
        let once: Vec<Item> = merge_by_identifier(input.clone()).into_iter().collect();
        let twice: Vec<Item> = merge_by_identifier(input).into_iter().collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_insert_returns_replaced() {
        let mut merged = LoadOrder::new();
        assert!(merged.insert(Item("a", 1)).is_none());
        assert_eq!(merged.insert(Item("a", 2)), Some(Item("a", 1)));
        assert!(merged.get("missing").is_none());
    }

    #[test]
    fn test_partition_is_stable_and_complete() {
        let items = vec![5, 2, 8, 1, 9, 4];
        let (even, odd) = partition(items.clone(), |n| n % 2 == 0);
        assert_eq!(even, vec![2, 8, 4]);
        assert_eq!(odd, vec![5, 1, 9]);

        let (odd2, even2) = partition(items.clone(), |n| n % 2 != 0);
        assert_eq!((odd2.clone(), even2.clone()), (odd, even));

        let mut all: Vec<i32> = odd2.into_iter().chain(even2).collect();
        let mut expected = items;
        all.sort_unstable();
        expected.sort_unstable();
        assert_eq!(all, expected);
    }
}
