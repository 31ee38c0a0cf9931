//! Calibration table parsing.
//!
//! Two layouts are accepted:
//! - whitespace-delimited text (the default): `#` starts a comment, blank lines
//!   are skipped
//! - comma-delimited `.csv`, read with the `csv` crate (no header row)
//!
//! Every data row must hold exactly two finite numbers `x y`. Rows must be
//! strictly increasing in `x` and lie inside the physical domain `[0, 1]`.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::domain::UncertaintyTable;
use crate::error::StageError;

/// Read a calibration table from a resolved path.
pub fn read_table(path: &Path) -> Result<UncertaintyTable, StageError> {
    let file = File::open(path).map_err(|e| {
        StageError::resource(format!("Failed to open calibration table '{}': {e}", path.display()))
    })?;

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let rows = if is_csv {
        parse_csv_rows(file)?
    } else {
        parse_text_rows(BufReader::new(file))?
    };

    table_from_rows(rows)
}

/// Parse whitespace-delimited rows.
pub fn parse_text_rows<R: BufRead>(reader: R) -> Result<Vec<(usize, f64, f64)>, StageError> {
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| StageError::resource(format!("Failed to read line {line_no}: {e}")))?;
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let fields: Vec<&str> = content.split_whitespace().collect();
        rows.push(parse_fields(line_no, &fields)?);
    }
    Ok(rows)
}

/// Parse comma-delimited rows.
pub fn parse_csv_rows<R: Read>(reader: R) -> Result<Vec<(usize, f64, f64)>, StageError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| StageError::resource(format!("CSV parse error: {e}")))?;
        let line_no = record.position().map(|p| p.line() as usize).unwrap_or(0);
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        let fields: Vec<&str> = record.iter().collect();
        rows.push(parse_fields(line_no, &fields)?);
    }
    Ok(rows)
}

fn parse_fields(line_no: usize, fields: &[&str]) -> Result<(usize, f64, f64), StageError> {
    if fields.len() != 2 {
        return Err(StageError::resource(format!(
            "Line {line_no}: expected 2 columns, found {}.",
            fields.len()
        )));
    }
    let x = parse_number(line_no, fields[0])?;
    let y = parse_number(line_no, fields[1])?;
    Ok((line_no, x, y))
}

fn parse_number(line_no: usize, field: &str) -> Result<f64, StageError> {
    let v = field
        .parse::<f64>()
        .map_err(|_| StageError::resource(format!("Line {line_no}: '{field}' is not a number.")))?;
    if !v.is_finite() {
        return Err(StageError::resource(format!("Line {line_no}: non-finite value '{field}'.")));
    }
    Ok(v)
}

/// Check row ordering and domain, then split into columns.
pub fn table_from_rows(rows: Vec<(usize, f64, f64)>) -> Result<UncertaintyTable, StageError> {
    if rows.is_empty() {
        return Err(StageError::resource("Calibration table contains no data rows."));
    }

    for &(line_no, x, _) in &rows {
        if !(0.0..=1.0).contains(&x) {
            return Err(StageError::data(format!(
                "Line {line_no}: x={x} lies outside the domain [0, 1]."
            )));
        }
    }
    for pair in rows.windows(2) {
        let (line_no, x1, _) = pair[1];
        if x1 <= pair[0].1 {
            return Err(StageError::data(format!(
                "Line {line_no}: x={x1} is not strictly greater than the previous x={}.",
                pair[0].1
            )));
        }
    }

    let (x, y) = rows.into_iter().map(|(_, x, y)| (x, y)).unzip();
    Ok(UncertaintyTable { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn text_rows_skip_comments_and_blank_lines() {
        let text = "# coszen  delta_gamma\n\n0.1  2.0\n0.5\t0.0   # no MC here\n0.9 4.0\n";
        let rows = parse_text_rows(Cursor::new(text)).unwrap();
        let table = table_from_rows(rows).unwrap();
        assert_eq!(table.x, vec![0.1, 0.5, 0.9]);
        assert_eq!(table.y, vec![2.0, 0.0, 4.0]);
    }

    #[test]
    fn csv_rows_parse() {
        let text = "0.2, 1.5\n0.8, 2.5\n";
        let table = table_from_rows(parse_csv_rows(Cursor::new(text)).unwrap()).unwrap();
        assert_eq!(table.x, vec![0.2, 0.8]);
        assert_eq!(table.y, vec![1.5, 2.5]);
    }

    #[test]
    fn csv_empty_column_is_resource_error() {
        let err = parse_csv_rows(Cursor::new("0.1,,2.0\n")).unwrap_err();
        assert!(matches!(err, StageError::Resource(_)));

        let err = parse_csv_rows(Cursor::new("0.5,3.0,\n")).unwrap_err();
        assert!(matches!(err, StageError::Resource(_)));

        let err = parse_csv_rows(Cursor::new("0.5,\n")).unwrap_err();
        assert!(matches!(err, StageError::Resource(_)));
    }

    #[test]
    fn csv_extension_selects_comma_layout() {
        let dir = std::env::temp_dir().join(format!("mureweight_table_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("muon_coszen_unc.csv");
        std::fs::write(&path, "# coszen,delta\n0.1,2.0\n\n0.6,3.5\n").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.x, vec![0.1, 0.6]);
        assert_eq!(table.y, vec![2.0, 3.5]);

        std::fs::write(&path, "0.1,,2.0\n").unwrap();
        assert!(matches!(read_table(&path), Err(StageError::Resource(_))));
    }

    #[test]
    fn wrong_column_count_is_resource_error() {
        let err = parse_text_rows(Cursor::new("0.1 2.0 3.0\n")).unwrap_err();
        assert!(matches!(err, StageError::Resource(_)));
    }

    #[test]
    fn non_numeric_is_resource_error() {
        let err = parse_text_rows(Cursor::new("0.1 abc\n")).unwrap_err();
        assert!(matches!(err, StageError::Resource(_)));
    }

    #[test]
    fn empty_table_is_resource_error() {
        let rows = parse_text_rows(Cursor::new("# header only\n")).unwrap();
        assert!(matches!(table_from_rows(rows), Err(StageError::Resource(_))));
    }

    #[test]
    fn unsorted_or_out_of_domain_is_data_error() {
        let rows = parse_text_rows(Cursor::new("0.5 1.0\n0.5 2.0\n")).unwrap();
        assert!(matches!(table_from_rows(rows), Err(StageError::Data(_))));

        let rows = parse_text_rows(Cursor::new("-0.2 1.0\n0.5 2.0\n")).unwrap();
        assert!(matches!(table_from_rows(rows), Err(StageError::Data(_))));
    }
}
