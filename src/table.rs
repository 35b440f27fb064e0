use std::io::{Read, Write};
use crate::errors::ParseError;
use crate::pairs::PairRow;
use crate::profile::FeatureRegistry;

pub const PAIR_COLUMN: &str = "pair";
pub const EDGE_COLUMN: &str = "edge";
pub const COMMON_FRIENDS_COLUMN: &str = "common_friends";

const FIXED_COLUMNS: [&str; 3] = [PAIR_COLUMN, EDGE_COLUMN, COMMON_FRIENDS_COLUMN];

pub fn header(registry: &FeatureRegistry) -> Vec<String> {
    FIXED_COLUMNS.iter()
        .map(|column| column.to_string())
        .chain(registry.names().map(str::to_string))
        .collect()
}

fn render_row(row: &PairRow) -> Vec<String> {
    let mut record = Vec::with_capacity(3 + row.common_features.len());
    record.push(row.pair.to_string());
    record.push(if row.edge { "TRUE" } else { "FALSE" }.to_string());
    record.push(row.common_friends.to_string());
    record.extend(row.common_features.iter().map(usize::to_string));
    record
}

/// Writes the header and every row; returns the number of rows written.
pub fn write_table<W: Write>(writer: W,
                             registry: &FeatureRegistry,
                             rows: impl IntoIterator<Item=PairRow>) -> anyhow::Result<usize>
{
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(header(registry))?;
    let mut count = 0;
    for row in rows {
        out.write_record(render_row(&row))?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}

/// Recovers the feature registry from the header of an emitted table.
pub fn read_registry<R: Read>(reader: R) -> anyhow::Result<FeatureRegistry> {
    let mut input = csv::Reader::from_reader(reader);
    let headers = input.headers()?;
    for (index, expected) in FIXED_COLUMNS.iter().enumerate() {
        let found = headers.get(index).unwrap_or_default();
        if found != *expected {
            return Err(ParseError::UnexpectedColumn {
                expected: expected.to_string(),
                found: found.to_string()
            }.into());
        }
    }
    Ok(headers.iter().skip(FIXED_COLUMNS.len()).map(str::to_string).collect())
}
