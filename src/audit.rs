// 📋 Audit Export - invalid_owners as CSV for manual review
//
// raw,reason
// SMITH,insufficient_name_parts
// ET AL,empty_after_clean

use crate::data_quality::InvalidFragment;
use crate::error::Result;
use std::io;
use std::path::Path;

/// Write `raw,reason` rows (with header) to any writer
pub fn write_invalid_csv<W: io::Write>(writer: W, invalid: &[InvalidFragment]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["raw", "reason"])?;
    for fragment in invalid {
        wtr.write_record([fragment.raw.as_str(), fragment.reason.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the audit CSV to a file, replacing it if present
pub fn write_invalid_csv_file<P: AsRef<Path>>(path: P, invalid: &[InvalidFragment]) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_invalid_csv(file, invalid)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_quality::ReasonCode;
    use tempfile::TempDir;

    fn sample() -> Vec<InvalidFragment> {
        vec![
            InvalidFragment::new("SMITH", ReasonCode::InsufficientNameParts),
            InvalidFragment::new("DOE, J0HN", ReasonCode::NameContainsDigits),
        ]
    }

    #[test]
    fn test_write_to_buffer() {
        let mut buffer = Vec::new();
        write_invalid_csv(&mut buffer, &sample()).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "raw,reason\nSMITH,insufficient_name_parts\n\"DOE, J0HN\",name_contains_digits\n"
        );
    }

    #[test]
    fn test_empty_list_writes_header_only() {
        let mut buffer = Vec::new();
        write_invalid_csv(&mut buffer, &[]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "raw,reason\n");
    }

    #[test]
    fn test_write_to_file_round_trips_through_reader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("invalid.csv");

        write_invalid_csv_file(&path, &sample()).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<InvalidFragment> = rdr.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, sample());
    }
}
