//! In-memory collection of the records shown by one screen.

use crate::api::{Entity, ErrorKind, RecordId};

/// Holds the records returned by the last successful list fetch. The list
/// is only ever swapped as a whole.
///
#[derive(Debug, Clone)]
pub struct CollectionStore<E: Entity> {
    records: Vec<E>,
    is_loading: bool,
    last_error: Option<ErrorKind>,
}

impl<E: Entity> Default for CollectionStore<E> {
    fn default() -> Self {
        CollectionStore {
            records: vec![],
            is_loading: false,
            last_error: None,
        }
    }
}

impl<E: Entity> CollectionStore<E> {
    pub fn records(&self) -> &[E] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find a record by its id.
    ///
    pub fn get(&self, id: RecordId) -> Option<&E> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Mark a fetch as started. Records stay visible while loading.
    ///
    pub fn begin_loading(&mut self) -> &mut Self {
        self.is_loading = true;
        self
    }

    /// Swap in a freshly fetched list, keeping the service's order.
    ///
    pub fn replace(&mut self, records: Vec<E>) -> &mut Self {
        self.records = records;
        self.is_loading = false;
        self.last_error = None;
        self
    }

    /// Record a failed fetch. The last known list is kept.
    ///
    pub fn fail(&mut self, kind: ErrorKind) -> &mut Self {
        self.is_loading = false;
        self.last_error = Some(kind);
        self
    }
}
