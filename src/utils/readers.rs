use super::Result;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read as ioRead};
use std::path::Path;

pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".gzip")
}

/// Opens a plain or gzip-compressed text input.
pub fn open_input_reader(path: &Path) -> Result<BufReader<Box<dyn ioRead>>> {
    let file = File::open(path).map_err(|e| format!("File {}: {}", path.display(), e))?;
    if is_gzipped(path) {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(format!("Invalid gzip header: {}", path.to_string_lossy()))
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::{BufRead, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_open_plain_reader() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "line one").unwrap();
        writeln!(temp_file, "line two").unwrap();
        let reader = open_input_reader(temp_file.path()).unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["line one", "line two"]);
    }

    #[test]
    fn test_open_gzipped_reader() {
        let temp_file = tempfile::Builder::new().suffix(".gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(temp_file.reopen().unwrap(), Compression::default());
        encoder.write_all(b">seq1\nACGT\n").unwrap();
        encoder.finish().unwrap();

        let reader = open_input_reader(temp_file.path()).unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec![">seq1", "ACGT"]);
    }

    #[test]
    fn test_open_missing_file_err() {
        let result = open_input_reader(Path::new("/nonexistent/motifs.txt"));
        match result {
            Err(e) => assert!(e.starts_with("File /nonexistent/motifs.txt")),
            Ok(_) => panic!("expected an error for a missing file"),
        }
    }

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("regions.fa.gz")));
        assert!(is_gzipped(Path::new("REGIONS.FA.GZIP")));
        assert!(!is_gzipped(Path::new("regions.fa")));
    }
}
