use std::path::Path;

use crate::palms::*;

/// Larger uploads are rejected.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
const MAX_FILE_NAME_LENGTH: usize = 255;
const SUSPICIOUS_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
/// The delimiters tried on the header line of a CSV file, by order of preference.
const CANDIDATE_DELIMITERS: &[u8] = &[b',', b'\t', b'|', b';'];

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputKind {
    Csv,
    Excel,
}

impl InputKind {
    pub fn from_provider(provider: &str) -> BPalmsResult<InputKind> {
        match provider.to_lowercase().as_str() {
            "csv" => Ok(InputKind::Csv),
            "excel" | "xlsx" | "xls" => Ok(InputKind::Excel),
            x => Err(Box::new(PalmsError::InvalidFile {
                path: "".to_string(),
                reason: format!("unknown input type {:?}", x),
            })),
        }
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Checks that a file can be uploaded, and finds its kind from the extension.
///
/// Suspicious file names are only reported.
pub fn validate_input_file(path: &str) -> BPalmsResult<InputKind> {
    let invalid = |reason: String| {
        Box::new(PalmsError::InvalidFile {
            path: path.to_string(),
            reason,
        })
    };
    let name = simplify_file_name(path);
    if name.chars().count() > MAX_FILE_NAME_LENGTH {
        warn!("validate_input_file: file name is too long: {:?}", name);
    }
    if name.contains(SUSPICIOUS_CHARS) {
        warn!("validate_input_file: file name has invalid characters: {:?}", name);
    }
    let extension = Path::new(&name)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    let kind = match extension.as_deref() {
        Some("csv") => InputKind::Csv,
        Some("xlsx") | Some("xls") => InputKind::Excel,
        _ => {
            return Err(invalid(
                "only CSV (.csv) and Excel (.xlsx, .xls) files are supported".to_string(),
            ))
        }
    };
    let metadata = fs::metadata(path).context(OpeningFileSnafu { path })?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(invalid(format!(
            "the file is {} bytes, the limit is {} bytes",
            metadata.len(),
            MAX_FILE_SIZE
        )));
    }
    debug!("validate_input_file: {:?} -> {:?}", path, kind);
    Ok(kind)
}

/// Picks the delimiter that splits the header line into the most columns.
/// Ties go to the earlier candidate, and a comma is used if nothing splits.
pub fn guess_delimiter(header_line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0;
    for d in CANDIDATE_DELIMITERS.iter() {
        let count = header_line.bytes().filter(|b| b == d).count();
        if count > best_count {
            best = *d;
            best_count = count;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiters() {
        assert_eq!(guess_delimiter("Name,P,A,L"), b',');
        assert_eq!(guess_delimiter("Name;P;A;L"), b';');
        assert_eq!(guess_delimiter("Name\tP\tA"), b'\t');
        assert_eq!(guess_delimiter("Name|P|A"), b'|');
        assert_eq!(guess_delimiter("Name"), b',');
        // A comma inside a header does not win over the real separator.
        assert_eq!(guess_delimiter("Name;Amount (1,000s);P;A"), b';');
    }

    #[test]
    fn file_validation() {
        let dir = format!("{}/tests/data", env!("CARGO_MANIFEST_DIR"));
        assert_eq!(
            validate_input_file(&format!("{}/sample_palms.csv", dir)).unwrap(),
            InputKind::Csv
        );
        assert_eq!(
            validate_input_file(&format!("{}/sample_palms.xlsx", dir)).unwrap(),
            InputKind::Excel
        );
        let err = validate_input_file(&format!("{}/sample_config.json", dir)).unwrap_err();
        assert!(matches!(*err, PalmsError::InvalidFile { .. }));
        assert!(validate_input_file(&format!("{}/missing.csv", dir)).is_err());
    }

    #[test]
    fn providers() {
        assert_eq!(InputKind::from_provider("CSV").unwrap(), InputKind::Csv);
        assert_eq!(InputKind::from_provider("excel").unwrap(), InputKind::Excel);
        assert!(InputKind::from_provider("ess").is_err());
        assert_eq!(simplify_file_name("/tmp/week 1.csv"), "week 1.csv");
    }
}
