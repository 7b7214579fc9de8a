//! TableStore - 桌台内存存储
//!
//! The table set is fixed at construction: records never appear or disappear,
//! only their contents change. Each record sits behind its own mutex so
//! operations on different tables never contend, and the id/number indexes are
//! immutable after seeding.
//!
//! Every committed change bumps the record's revision. Timers compare against
//! it to tell whether the state they were armed for still exists.

use std::collections::HashMap;

use parking_lot::Mutex;
use shared::models::{Table, TablePatch, TableStatus};

use super::error::{TableError, TableResult};

/// Table set to seed the store with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub tables: Vec<Table>,
}

impl TableLayout {
    /// `count` tables numbered from 1, ids `table-<n>`
    ///
    /// Capacity by zero-based index: multiples of 3 seat 6, other even
    /// indexes 4, odd indexes 2.
    pub fn standard(count: u32) -> Self {
        let tables = (0..count)
            .map(|i| {
                let number = i + 1;
                Table::new(format!("table-{}", number), number, standard_capacity(i))
            })
            .collect();
        Self { tables }
    }
}

fn standard_capacity(index: u32) -> u32 {
    if index % 3 == 0 {
        6
    } else if index % 2 == 0 {
        4
    } else {
        2
    }
}

/// Per-record change counter
pub type Revision = u64;

#[derive(Debug)]
struct Record {
    table: Table,
    revision: Revision,
}

impl Record {
    fn commit(&mut self, next: Table) {
        if next != self.table {
            self.table = next;
            self.revision += 1;
        }
    }
}

/// Result of a committed [`TableStore::modify`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modified<T> {
    pub table: Table,
    pub revision: Revision,
    pub output: T,
}

/// In-memory table collection
#[derive(Debug)]
pub struct TableStore {
    records: Vec<Mutex<Record>>,
    by_id: HashMap<String, usize>,
    by_number: HashMap<u32, usize>,
}

impl TableStore {
    /// Seed from a layout. Duplicate ids or numbers keep the first occurrence.
    pub fn new(layout: TableLayout) -> Self {
        let mut records = Vec::with_capacity(layout.tables.len());
        let mut by_id = HashMap::with_capacity(layout.tables.len());
        let mut by_number = HashMap::with_capacity(layout.tables.len());

        for table in layout.tables {
            if by_id.contains_key(&table.id) || by_number.contains_key(&table.number) {
                tracing::warn!(id = %table.id, number = table.number, "Duplicate table in layout, skipped");
                continue;
            }
            let index = records.len();
            by_id.insert(table.id.clone(), index);
            by_number.insert(table.number, index);
            records.push(Mutex::new(Record { table, revision: 0 }));
        }

        Self {
            records,
            by_id,
            by_number,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Snapshot of every table in insertion order
    pub fn get_all(&self) -> Vec<Table> {
        self.records.iter().map(|r| r.lock().table.clone()).collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Table> {
        self.by_id.get(id).map(|&i| self.records[i].lock().table.clone())
    }

    pub fn get_by_number(&self, number: u32) -> Option<Table> {
        self.by_number
            .get(&number)
            .map(|&i| self.records[i].lock().table.clone())
    }

    pub fn get_by_status(&self, status: TableStatus) -> Vec<Table> {
        self.records
            .iter()
            .filter_map(|r| {
                let record = r.lock();
                (record.table.status == status).then(|| record.table.clone())
            })
            .collect()
    }

    /// Merge `patch` into the record and return the result.
    ///
    /// Plain field merge with no lifecycle checks; transitions go through
    /// [`modify`](Self::modify) so guard and write share one lock.
    pub fn update(&self, id: &str, patch: &TablePatch) -> TableResult<Table> {
        let mut record = self.record(id)?.lock();
        let mut next = record.table.clone();
        patch.apply_to(&mut next);
        record.commit(next);
        Ok(record.table.clone())
    }

    /// Run `f` against a copy of the record while holding its lock.
    ///
    /// `f` also receives the revision the copy was taken at. The copy replaces
    /// the record only when `f` returns `Ok`, so a failed check leaves the
    /// stored table untouched.
    pub fn modify<T, F>(&self, id: &str, f: F) -> TableResult<Modified<T>>
    where
        F: FnOnce(&mut Table, Revision) -> TableResult<T>,
    {
        let mut record = self.record(id)?.lock();
        let mut draft = record.table.clone();
        let output = f(&mut draft, record.revision)?;
        record.commit(draft);
        Ok(Modified {
            table: record.table.clone(),
            revision: record.revision,
            output,
        })
    }

    fn record(&self, id: &str) -> TableResult<&Mutex<Record>> {
        self.by_id
            .get(id)
            .map(|&i| &self.records[i])
            .ok_or_else(|| TableError::NotFound(id.to_string()))
    }
}
