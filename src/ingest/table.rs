use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::foundation::error::{AtlasError, AtlasResult};
use crate::ingest::sample::Sample;

/// Column holding the sample year.
pub const COL_YEAR: &str = "year";
/// Column holding the latitude in degrees.
pub const COL_LATITUDE: &str = "latitude";
/// Column holding the longitude in degrees.
pub const COL_LONGITUDE: &str = "longitude";
/// Column holding the red fraction.
pub const COL_RED: &str = "red_pct";
/// Column holding the green fraction.
pub const COL_GREEN: &str = "green_pct";
/// Column holding the blue fraction.
pub const COL_BLUE: &str = "blue_pct";

/// Text encodings tried, in order, when decoding tabular input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, with an optional byte-order mark.
    Utf8,
    /// ISO-8859-1; every byte maps to one code point, so this never fails.
    Latin1,
}

impl TextEncoding {
    /// Decoders in the order they are attempted.
    pub const CASCADE: [TextEncoding; 2] = [TextEncoding::Utf8, TextEncoding::Latin1];

    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(bytes).ok().map(str::to_owned)
            }
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Decode raw bytes with the first encoding in [`TextEncoding::CASCADE`] that accepts them.
pub fn decode_text(bytes: &[u8]) -> AtlasResult<(String, TextEncoding)> {
    for enc in TextEncoding::CASCADE {
        match enc.decode(bytes) {
            Some(text) => return Ok((text, enc)),
            None => tracing::debug!(?enc, "input is not valid in this encoding, trying next"),
        }
    }
    Err(AtlasError::ingest(
        "could not decode input with any supported encoding",
    ))
}

/// Column-oriented numeric view of a CSV file.
///
/// Every cell is parsed as `f64`; empty or non-numeric cells become `None` so that sanitization
/// can substitute defaults later instead of rejecting the row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    columns: BTreeMap<String, Vec<Option<f64>>>,
    rows: usize,
}

impl RawTable {
    /// Build a table from named columns. All columns must have the same length.
    pub fn from_columns<I, S>(columns: I) -> AtlasResult<Self>
    where
        I: IntoIterator<Item = (S, Vec<Option<f64>>)>,
        S: Into<String>,
    {
        let mut out = Self::default();
        let mut rows = None;
        for (name, values) in columns {
            let name = name.into();
            match rows {
                None => rows = Some(values.len()),
                Some(n) if n != values.len() => {
                    return Err(AtlasError::ingest(format!(
                        "column '{name}' has {} rows, expected {n}",
                        values.len()
                    )));
                }
                Some(_) => {}
            }
            out.columns.entry(name).or_insert(values);
        }
        out.rows = rows.unwrap_or(0);
        Ok(out)
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Return `true` when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrow a column by header name.
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Header names in sorted order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

/// Parse CSV text with a header row into a [`RawTable`].
pub fn read_table(text: &str) -> AtlasResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| AtlasError::ingest(format!("failed to read csv header: {e}")))?
        .clone();

    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); headers.len()];
    for (line, record) in rdr.records().enumerate() {
        let record =
            record.map_err(|e| AtlasError::ingest(format!("csv record {}: {e}", line + 1)))?;
        for (i, col) in columns.iter_mut().enumerate() {
            col.push(record.get(i).and_then(parse_cell));
        }
    }

    RawTable::from_columns(headers.iter().map(str::to_owned).zip(columns))
}

fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok()
}

/// Write samples as CSV using the six standard columns.
pub fn write_samples_csv<'a, W, I>(out: W, samples: I) -> AtlasResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Sample>,
{
    let mut wtr = csv::Writer::from_writer(out);
    let map_err = |e: csv::Error| AtlasError::ingest(format!("failed to write csv: {e}"));

    wtr.write_record([COL_YEAR, COL_LATITUDE, COL_LONGITUDE, COL_RED, COL_GREEN, COL_BLUE])
        .map_err(map_err)?;
    for s in samples {
        wtr.write_record(sample_record(s)).map_err(map_err)?;
    }
    wtr.flush()
        .map_err(|e| AtlasError::ingest(format!("failed to flush csv: {e}")))?;
    Ok(())
}

/// Append one sample row to the CSV at `path`, writing the header first if the file is new or
/// empty.
pub fn append_sample_csv(path: &Path, sample: &Sample) -> AtlasResult<()> {
    let is_new = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AtlasError::ingest(format!("failed to open '{}': {e}", path.display())))?;
    if is_new {
        return write_samples_csv(file, [sample]);
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    wtr.write_record(sample_record(sample))
        .map_err(|e| AtlasError::ingest(format!("failed to write csv: {e}")))?;
    wtr.flush()
        .map_err(|e| AtlasError::ingest(format!("failed to flush csv: {e}")))?;
    Ok(())
}

fn sample_record(s: &Sample) -> [String; 6] {
    [
        s.year.to_string(),
        s.location.lat.to_string(),
        s.location.lon.to_string(),
        s.color.red.to_string(),
        s.color.green.to_string(),
        s.color.blue.to_string(),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/table.rs"]
mod tests;
