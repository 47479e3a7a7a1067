use crate::util::{base_26, detect_encoding};
use filterable_core::{CsvImporterConfig, MemoryGrid};
use log::{debug, trace};
use std::io::Read;
use tap::Tap;

/// Only this many bytes are looked at when guessing encoding and separator.
const SNIFF_BYTES: usize = 1024 * 1024;

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV at line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },
    #[error("no header row found")]
    Empty,
}

/// Load CSV into a new grid, every cell as text. Empty fields become null cells.
pub fn load_csv<R: Read>(
    mut rdr: R,
    config: &CsvImporterConfig,
) -> Result<MemoryGrid, ImportError> {
    trace!("CsvImporter: loading");

    let mut raw = vec![];
    rdr.read_to_end(&mut raw)?;
    let encoding = detect_encoding(&raw, SNIFF_BYTES);
    debug!("CsvImporter: detected encoding {}", encoding.name());
    let mut text = String::new();
    encoding_rs_io::DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .build(raw.as_slice())
        .read_to_string(&mut text)?;

    let separator = config
        .separator
        .as_byte()
        .unwrap_or_else(|| determine_separator(&text));

    let mut rdr = csv::ReaderBuilder::new()
        .tap_mut(|b| {
            b.delimiter(separator)
                .has_headers(false) // to be able to ignore first N rows
                .flexible(true);
        })
        .from_reader(text.as_bytes());
    let mut records = rdr.records().skip(config.skip_first_rows);

    let headers: Option<Vec<String>> = if config.has_headers {
        match records.next() {
            Some(Ok(headers)) => Some(headers.iter().map(str::to_owned).collect()),
            Some(Err(source)) => {
                return Err(ImportError::Csv {
                    line: config.skip_first_rows + 1,
                    source,
                })
            }
            None => return Err(ImportError::Empty),
        }
    } else {
        None
    };

    let first_data_line = config.skip_first_rows + usize::from(config.has_headers) + 1;
    let mut rows = vec![];
    for (row_idx, record) in records.enumerate() {
        let record = record.map_err(|source| ImportError::Csv {
            line: first_data_line + row_idx,
            source,
        })?;
        rows.push(
            record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_owned()))
                .collect::<Vec<_>>(),
        );
    }

    let columns = match headers {
        Some(headers) => headers,
        None => {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            (1..=width as u32).map(base_26).collect()
        }
    };
    let mut grid = MemoryGrid::new(columns);
    for row in rows {
        grid.push_row(row);
    }
    debug!(
        "CsvImporter: loaded {} rows, {} columns",
        grid.data_row_count(),
        grid.column_count()
    );
    Ok(grid)
}

fn determine_separator(text: &str) -> u8 {
    let mut counts: [(usize, u8); 3] = [(0, b','), (0, b'\t'), (0, b';')];
    for b in text.bytes().take(SNIFF_BYTES) {
        match b {
            b',' => counts[0].0 += 1,
            b'\t' => counts[1].0 += 1,
            b';' => counts[2].0 += 1,
            _ => {}
        }
    }
    // Stable sort, comma wins ties.
    counts.sort_by(|a, b| b.0.cmp(&a.0));
    counts[0].1
}

#[cfg(test)]
mod tests {
    use super::*;
    use filterable_core::{ColumnUid, FilterEngine, FilterHost, FilterTerm, RowIdx, Separator};

    #[test]
    fn headers_and_auto_separator() {
        let input = "Name;City\nAlice;Rome\nBob;\n";
        let grid = load_csv(input.as_bytes(), &CsvImporterConfig::default()).unwrap();
        assert_eq!(grid.column_uid("City"), Some(ColumnUid(1)));
        assert_eq!(grid.data_row_count(), 2);
        assert_eq!(grid.cell(RowIdx(0), ColumnUid(1)), Some("Rome"));
        assert_eq!(grid.cell(RowIdx(1), ColumnUid(1)), None);
    }

    #[test]
    fn skipped_rows_and_generated_names() {
        let input = "exported by tool\nx,1\ny,2,extra\n";
        let config = CsvImporterConfig {
            separator: Separator::Comma,
            skip_first_rows: 1,
            has_headers: false,
        };
        let grid = load_csv(input.as_bytes(), &config).unwrap();
        let names: Vec<&str> = grid.columns().map(|(_, name)| name).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(grid.cell(RowIdx(1), ColumnUid(2)), Some("extra"));
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = load_csv("".as_bytes(), &CsvImporterConfig::default()).unwrap_err();
        assert!(matches!(err, ImportError::Empty));
    }

    #[test]
    fn imported_grid_can_be_filtered() {
        let input = "Name,City\nJürgen,Zürich\nAnna,Bern\n";
        let mut grid = load_csv(input.as_bytes(), &CsvImporterConfig::default()).unwrap();
        let mut engine = FilterEngine::new();
        engine
            .add_term(&mut grid, FilterTerm::new("zür", "City"))
            .unwrap();
        assert_eq!(grid.visible_rows().collect::<Vec<_>>(), vec![RowIdx(0)]);
    }
}
