//! CSV Dataset Loader

use crate::DatasetError;
use feature_encoder::{encode, RequestRecord, FEATURE_DIMENSION};
use ndarray::Array2;
use std::path::Path;
use tracing::{info, warn};

/// A fully encoded dataset: one feature row and one label per usable record.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    /// Feature matrix, one encoded record per row, original order preserved
    pub features: Array2<f64>,
    /// Labels aligned with the feature rows: 0 = benign, 1 = malicious
    pub labels: Vec<u8>,
    /// The raw records, aligned with the feature rows; kept so downstream
    /// event reporting can cite the original request fields
    pub records: Vec<RequestRecord>,
    /// Rows dropped because they failed to parse or carried an invalid label
    pub rows_skipped: usize,
}

impl LoadedDataset {
    /// Number of usable records.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when no records survived parsing.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Count of records labeled malicious.
    pub fn malicious_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }
}

/// Load a labeled request CSV and encode every row.
///
/// Expected columns: `ip, method, path, query, user_agent, headers,
/// content_length, label`. A row that fails CSV parsing or whose label is
/// not 0/1 is skipped and counted, never fatal. Row order is preserved.
pub fn load_csv(path: &Path) -> Result<LoadedDataset, DatasetError> {
    let display_path = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|source| DatasetError::Read {
        path: display_path.clone(),
        source,
    })?;

    let mut flat = Vec::new();
    let mut labels = Vec::new();
    let mut records = Vec::new();
    let mut rows_skipped = 0usize;

    for (row_index, row) in reader.deserialize::<RequestRecord>().enumerate() {
        let record = match row {
            Ok(record) => record,
            Err(err) => {
                rows_skipped += 1;
                warn!(row = row_index, %err, "skipping malformed dataset row");
                continue;
            }
        };

        let label = match record.label {
            Some(l @ (0 | 1)) => l,
            other => {
                rows_skipped += 1;
                warn!(row = row_index, label = ?other, "skipping row with invalid label");
                continue;
            }
        };

        flat.extend_from_slice(encode(&record).as_slice());
        labels.push(label);
        records.push(record);
    }

    if labels.is_empty() {
        return Err(DatasetError::Empty { path: display_path });
    }

    let features = Array2::from_shape_vec((labels.len(), FEATURE_DIMENSION), flat)?;
    let dataset = LoadedDataset {
        features,
        labels,
        records,
        rows_skipped,
    };

    info!(
        path = %display_path,
        rows = dataset.len(),
        skipped = dataset.rows_skipped,
        malicious = dataset.malicious_count(),
        "loaded dataset"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_encoder::slot;
    use std::io::Write;

    const HEADER: &str = "ip,method,path,query,user_agent,headers,content_length,label";

    fn write_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_load_and_encode() {
        let file = write_csv(&[
            "10.0.0.1,GET,/,,Mozilla/5.0,,0,0",
            "10.0.0.2,GET,/wp-admin,,sqlmap/1.0,,0,1",
        ]);
        let ds = load_csv(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows_skipped, 0);
        assert_eq!(ds.labels, vec![0, 1]);
        assert_eq!(ds.features.nrows(), 2);
        assert_eq!(ds.features.ncols(), FEATURE_DIMENSION);
        // second row hits the login keyword and scanner UA slots
        assert_eq!(ds.features[[1, slot::HAS_LOGIN_KEYWORD]], 1.0);
        assert_eq!(ds.features[[1, slot::HAS_SUSPICIOUS_UA]], 1.0);
        // raw records stay aligned with the feature rows
        assert_eq!(ds.records[1].path, "/wp-admin");
        assert_eq!(ds.records[1].ip, "10.0.0.2");
    }

    #[test]
    fn test_malformed_rows_are_skipped_and_counted() {
        let file = write_csv(&[
            "10.0.0.1,GET,/,,Mozilla/5.0,,0,0",
            "truncated-row,GET",
            "10.0.0.3,POST,/login,,Mozilla/5.0,,12,not-a-label",
            "10.0.0.4,HEAD,/ping,,Mozilla/5.0,,0,1",
        ]);
        let ds = load_csv(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows_skipped, 2);
        // surviving order preserved: benign "/" first, then "/ping"
        assert_eq!(ds.labels, vec![0, 1]);
        assert_eq!(ds.features[[1, slot::METHOD_HEAD]], 1.0);
    }

    #[test]
    fn test_quoted_fields_with_commas() {
        let file = write_csv(&[
            r#"10.0.0.1,GET,/,,"Mozilla/5.0 (X11, Linux)","Host: a.example; Accept-Language: en-US,en",0,0"#,
        ]);
        let ds = load_csv(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.features[[0, slot::NUM_HEADERS]], 2.0);
        assert_eq!(
            ds.features[[0, slot::ACCEPT_LANGUAGE_LENGTH]],
            "en-US,en".len() as f64
        );
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let file = write_csv(&["bad-row"]);
        assert!(matches!(
            load_csv(file.path()),
            Err(DatasetError::Empty { .. })
        ));
    }
}
