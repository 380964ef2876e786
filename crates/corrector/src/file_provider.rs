//! Canonical names from a plain text file.

use std::path::PathBuf;

use zone_core::{async_trait, CanonicalNameProvider, ProviderError};

/// Reads one canonical name per line.
///
/// Blank lines and lines starting with `#` are ignored. A missing or
/// unreadable file makes the provider unavailable.
#[derive(Debug, Clone)]
pub struct FileNameProvider {
    path: PathBuf,
    label: String,
}

impl FileNameProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = format!("file:{}", path.display());
        Self { path, label }
    }
}

/// Parse registry file contents into names, in file order.
pub fn parse_registry(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl CanonicalNameProvider for FileNameProvider {
    async fn canonical_names(&self) -> Result<Vec<String>, ProviderError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        Ok(parse_registry(&contents))
    }

    fn name(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_registry() {
        let names = parse_registry("# Abidjan\nCOCODY\n\n  PLATEAU  \n#MARCORY\nYOPOUGON\n");
        assert_eq!(names, vec!["COCODY", "PLATEAU", "YOPOUGON"]);
    }

    #[tokio::test]
    async fn test_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "COCODY\nPLATEAU").unwrap();

        let provider = FileNameProvider::new(file.path());
        let names = provider.canonical_names().await.unwrap();
        assert_eq!(names, vec!["COCODY", "PLATEAU"]);
        assert!(provider.name().starts_with("file:"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let provider = FileNameProvider::new("/nonexistent/communes.txt");
        let result = provider.canonical_names().await;
        assert!(matches!(result, Err(ProviderError::Io(_))));
    }
}
