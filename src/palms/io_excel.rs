use calamine::{open_workbook_auto, DataType, Range, Reader};

use crate::palms::*;

/// Reads all the data rows of an Excel report (xlsx or xls).
///
/// The worksheet with the given name is read, or the first worksheet if no
/// name is given. The first row holds the headers.
pub fn read_excel_report(path: &str, worksheet_name: Option<&str>) -> BPalmsResult<Vec<Row>> {
    let wrange = get_range(path, worksheet_name)?;
    let mut iter = wrange.rows();
    let header = match iter.next() {
        Some(h) => h,
        None => return Ok(Vec::new()),
    };
    let headers: Vec<String> = header.iter().map(|c| cell_value(c).as_text()).collect();
    debug!("read_excel_report: header: {:?}", headers);

    let mut res: Vec<Row> = Vec::new();
    for (idx, line) in iter.enumerate() {
        let mut row = Row::new();
        for (header, cell) in headers.iter().zip(line.iter()) {
            // Empty trailing header cells.
            if header.trim().is_empty() {
                continue;
            }
            row.push(header.trim(), cell_value(cell));
        }
        if row.is_blank() {
            continue;
        }
        debug!("read_excel_report: row {}: {:?}", idx + 2, row);
        res.push(row);
    }
    Ok(res)
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> BPalmsResult<Range<DataType>> {
    debug!(
        "read_excel_report: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook = open_workbook_auto(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    let wrange = if let Some(name) = worksheet_name {
        workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name })?
            .context(OpeningExcelSnafu { path })?
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptySpreadsheetSnafu { path })?
            .context(OpeningExcelSnafu { path })?
    };
    Ok(wrange)
}

fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty => CellValue::Empty,
        DataType::String(s) if s.trim().is_empty() => CellValue::Empty,
        DataType::String(s) => CellValue::Text(s.clone()),
        DataType::Int(i) => CellValue::Number(*i as f64),
        DataType::Float(f) => CellValue::Number(*f),
        DataType::Bool(b) => CellValue::Text(b.to_string()),
        // Dates are kept as Excel serial numbers.
        DataType::DateTime(f) => CellValue::Number(*f),
        other => CellValue::Text(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_file(name: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    #[test]
    fn first_worksheet() {
        let rows = read_excel_report(&test_file("sample_palms.xlsx"), None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("Name"),
            Some(&CellValue::Text("Sajid Hasan".to_string()))
        );
        assert_eq!(rows[0].get("P"), Some(&CellValue::Number(4.0)));
    }

    #[test]
    fn named_worksheet() {
        let rows =
            read_excel_report(&test_file("sample_palms.xlsx"), Some("Late arrivals")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Mildly Late"), Some(&CellValue::Number(2.0)));
        let err = read_excel_report(&test_file("sample_palms.xlsx"), Some("Nope")).unwrap_err();
        assert!(matches!(*err, PalmsError::MissingWorksheet { .. }));
    }

    #[test]
    fn cells() {
        assert_eq!(cell_value(&DataType::Int(3)), CellValue::Number(3.0));
        assert_eq!(
            cell_value(&DataType::String("  ".to_string())),
            CellValue::Empty
        );
    }
}
