//! Local checks applied to a dataset before it is sent anywhere.

use crate::ApiError;

/// Largest dataset accepted for upload (100 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// A dataset picked by the user, fully read into memory.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        validate_upload(&self.name, self.size())
    }
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Reject anything that is not a `.csv` (any case) or is larger than
/// [`MAX_UPLOAD_BYTES`].
pub fn validate_upload(name: &str, size: u64) -> Result<(), ApiError> {
    if !name.to_ascii_lowercase().ends_with(".csv") {
        let found = name
            .rsplit_once('.')
            .map(|(_, ext)| format!(".{ext}"))
            .unwrap_or_else(|| "no extension".to_string());
        return Err(ApiError::validation(format!(
            "Please upload a CSV file (expected a .csv extension, got {found})"
        )));
    }

    if size > MAX_UPLOAD_BYTES {
        let mib = size as f64 / (1024.0 * 1024.0);
        return Err(ApiError::validation(format!(
            "File size must be less than 100MB (file is {mib:.1} MB)"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn accepts_csv_in_any_case() {
        assert!(validate_upload("data.csv", 10).is_ok());
        assert!(validate_upload("DATA.CSV", 10).is_ok());
        assert!(validate_upload("housing.Csv", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn rejects_other_extensions() {
        let err = validate_upload("data.txt", 10).unwrap_err();
        assert!(err.is_validation());
        let msg = err.to_string();
        assert!(msg.contains("CSV"), "{msg}");
        assert!(msg.contains(".txt"), "{msg}");
    }

    #[test]
    fn rejects_names_without_extension() {
        let err = validate_upload("dataset", 10).unwrap_err();
        assert!(err.to_string().contains("no extension"));
    }

    #[test]
    fn rejects_oversized_files() {
        let err = validate_upload("big.csv", 101 * MIB).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("100MB"));
    }

    #[test]
    fn upload_file_reports_its_size() {
        let file = UploadFile::new("tiny.csv", b"a,b\n1,2\n".to_vec());
        assert_eq!(file.size(), 8);
        assert!(file.validate().is_ok());
        assert!(format!("{file:?}").contains("size: 8"));
    }
}
