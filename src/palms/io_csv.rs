// Primitives for reading CSV files.

use crate::palms::io_common::guess_delimiter;
use crate::palms::*;

/// Reads all the data rows of a CSV report.
///
/// The first non-empty line holds the headers. Lines where every field is
/// empty are dropped.
pub fn read_csv_report(path: &str) -> BPalmsResult<Vec<Row>> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    // Excel likes to start its CSV exports with a byte order mark.
    let contents = contents.trim_start_matches('\u{feff}');
    parse_csv_report(contents, path)
}

fn parse_csv_report(contents: &str, path: &str) -> BPalmsResult<Vec<Row>> {
    let header_line = contents
        .lines()
        .find(|l| !l.trim().is_empty())
        .context(EmptySpreadsheetSnafu { path })?;
    let delimiter = guess_delimiter(header_line);
    debug!(
        "read_csv_report: {:?}: delimiter {:?}",
        path, delimiter as char
    );

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());
    let headers: Vec<String> = rdr
        .headers()
        .context(OpeningCsvSnafu { path })?
        .iter()
        .map(|h| h.to_string())
        .collect();
    debug!("read_csv_report: headers: {:?}", headers);

    let mut res: Vec<Row> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        if line.iter().all(|f| f.is_empty()) {
            continue;
        }
        let mut row = Row::new();
        for (header, field) in headers.iter().zip(line.iter()) {
            if header.is_empty() {
                continue;
            }
            row.push(header.clone(), CellValue::from(field));
        }
        debug!("read_csv_report: lineno: {:?} row: {:?}", lineno, row);
        res.push(row);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_file(name: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    #[test]
    fn sample_report() {
        let rows = read_csv_report(&test_file("sample_palms.csv")).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(
            rows[0].get("name"),
            Some(&CellValue::Text("Sajid Hasan".to_string()))
        );
        assert_eq!(rows[0].get("1-2-1"), Some(&CellValue::Text("2".to_string())));
    }

    #[test]
    fn semicolon_report() {
        let rows = read_csv_report(&test_file("semicolon_palms.csv")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1].get("Last Name"),
            Some(&CellValue::Text("Khanna".to_string()))
        );
        assert_eq!(
            rows[1].get("TYFCB"),
            Some(&CellValue::Text("1,500".to_string()))
        );
    }

    #[test]
    fn tabs_blank_lines_and_short_rows() {
        let contents = "\n\nName\tP\tV\n\nAnn Lee\t2\n\t\t\nBo Kim\t1\t3\n";
        let rows = parse_csv_report(contents, "inline.csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("V"), None);
        assert_eq!(rows[1].get("V"), Some(&CellValue::Text("3".to_string())));
    }

    #[test]
    fn header_only_and_empty_files() {
        assert!(read_csv_report(&test_file("header_only.csv"))
            .unwrap()
            .is_empty());
        let err = parse_csv_report("  \n", "empty.csv").unwrap_err();
        assert!(matches!(*err, PalmsError::EmptySpreadsheet { .. }));
    }
}
