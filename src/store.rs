use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::{
    quadtree::QuadTree,
    record::{Record, FIELD_COUNT},
    Error, Result, P2,
};

/// Append-only list of records, searched linearly by exact endpoint coordinate.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

/// Counts reported by [`RecordStore::ingest`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub records: usize,
    /// Endpoints stored in the tree
    pub inserted: usize,
    /// Endpoints outside the tree boundary
    pub rejected: usize,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Every record whose start or end coordinate equals `point` exactly, in
    /// insertion order.
    pub fn lookup(&self, point: &P2) -> Vec<&Record> {
        self.records.iter().filter(|r| r.touches(point)).collect()
    }

    /// Read a delimited dataset with a header row, append every row, and insert each
    /// row's start and end coordinate into `tree`.
    ///
    /// A header or row with the wrong number of columns aborts ingestion. Coordinates outside
    /// the tree boundary are only counted.
    pub fn ingest<R: Read>(&mut self, reader: R, tree: &mut QuadTree<P2>) -> Result<IngestStats> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header_len = csv_reader.headers()?.len();
        if header_len != FIELD_COUNT {
            return Err(Error::FieldCount {
                row: 1,
                found: header_len,
                expected: FIELD_COUNT,
            });
        }

        let mut stats = IngestStats::default();
        let mut row = StringRecord::new();
        while csv_reader.read_record(&mut row)? {
            if row.len() != FIELD_COUNT {
                return Err(Error::FieldCount {
                    row: row.position().map_or(0, |p| p.line()),
                    found: row.len(),
                    expected: FIELD_COUNT,
                });
            }
            let record: Record = row.deserialize(None)?;

            for point in [record.start(), record.end()] {
                if tree.insert(&point) {
                    stats.inserted += 1;
                } else {
                    stats.rejected += 1;
                    debug!(
                        footpath_id = record.footpath_id,
                        x = point.x,
                        y = point.y,
                        "coordinate outside root boundary"
                    );
                }
            }
            self.records.push(record);
            stats.records += 1;
        }

        info!(
            records = stats.records,
            inserted = stats.inserted,
            rejected = stats.rejected,
            depth = tree.depth(),
            "ingested dataset"
        );
        Ok(stats)
    }
}
