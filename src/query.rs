use std::io::{self, Write};

use crate::{
    lookup::{locate, Located},
    quadtree::QuadTree,
    record::{Record, Schema},
    store::RecordStore,
    Error, Result, P2,
};

/// Marker written to the summary when no record sits at the queried coordinate.
pub const NOT_FOUND: &str = "NOTFOUND";

/// A coordinate read from one query line. The raw tokens are kept so output
/// echoes the query exactly as typed.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub lon: String,
    pub lat: String,
    pub point: P2,
}

impl Query {
    /// Parse `"<longitude> <latitude>"`. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut tokens = line.split_whitespace();
        let Some(lon) = tokens.next() else {
            return Ok(None);
        };
        let lat = tokens
            .next()
            .ok_or_else(|| Error::InvalidQuery(line.to_string()))?;

        let parse = |s: &str| {
            s.parse::<f64>()
                .map_err(|_| Error::InvalidQuery(line.to_string()))
        };
        let point = P2::new(parse(lon)?, parse(lat)?);

        Ok(Some(Self {
            lon: lon.to_string(),
            lat: lat.to_string(),
            point,
        }))
    }
}

/// Records found by the store and points found by the tree for one query.
/// The two are gathered side by side and never merged.
#[derive(Debug)]
pub struct QueryResult<'a> {
    pub query: Query,
    pub records: Vec<&'a Record>,
    pub located: Vec<Located<P2>>,
}

impl<'a> QueryResult<'a> {
    pub fn run(query: Query, store: &'a RecordStore, tree: &QuadTree<P2>) -> Self {
        Self {
            records: store.lookup(&query.point),
            located: locate(tree, &query.point),
            query,
        }
    }

    pub fn is_found(&self) -> bool {
        !self.records.is_empty()
    }

    /// Echo the query, then one `--> ` line per matching record
    pub fn write_details<W: Write>(&self, out: &mut W, schema: &Schema) -> io::Result<()> {
        writeln!(out, "{} {}", self.query.lon, self.query.lat)?;
        for record in &self.records {
            write!(out, "--> ")?;
            record.render(schema, out)?;
            writeln!(out)?;
        }
        Ok(())
    }

    /// `<lon> <lat> --> NOTFOUND`, or `<lon> <lat> --> ` followed by the quadrant
    /// path of every located point, one label per line. Every query ends on a
    /// newline, even when no path has any labels.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Query { lon, lat, .. } = &self.query;
        if !self.is_found() {
            return writeln!(out, "{lon} {lat} --> {NOT_FOUND}");
        }

        write!(out, "{lon} {lat} --> ")?;
        for located in &self.located {
            write!(out, "{}", located.path)?;
        }
        if self.located.iter().all(|l| l.path.is_empty()) {
            writeln!(out)?;
        }
        Ok(())
    }
}
