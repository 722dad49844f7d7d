use std::path::Path;

/// Extension of the final path component, without the leading dot.
///
/// Returns an empty string when there is no extension; dot-files such as
/// `.bashrc` have none.
pub fn extension(filename: impl AsRef<Path>) -> String {
    filename
        .as_ref()
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn is_csv(filename: impl AsRef<Path>) -> bool {
    extension(filename) == "csv"
}

pub fn is_xlsx(filename: impl AsRef<Path>) -> bool {
    extension(filename) == "xlsx"
}

/// Tag a tabular loader dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    Csv,
    Xlsx,
    Unknown,
}

impl TableFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "csv" => Self::Csv,
            "xlsx" => Self::Xlsx,
            _ => Self::Unknown,
        }
    }

    pub fn from_path(filename: impl AsRef<Path>) -> Self {
        Self::from_extension(&extension(filename))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Unknown => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_strips_separator() {
        assert_eq!(extension("data.csv"), "csv");
        assert_eq!(extension("/tmp/report.xlsx"), "xlsx");
    }

    #[test]
    fn test_extension_takes_last_suffix() {
        assert_eq!(extension("archive.tar.gz"), "gz");
    }

    #[test]
    fn test_extension_missing() {
        assert_eq!(extension("Makefile"), "");
        assert_eq!(extension(".bashrc"), "");
        assert_eq!(extension("dir/"), "");
    }

    #[test]
    fn test_predicates() {
        assert!(is_csv("a.csv"));
        assert!(!is_csv("a.xlsx"));
        assert!(is_xlsx("a.xlsx"));
        // Matching is case sensitive, like the extension itself
        assert!(!is_csv("A.CSV"));
    }

    #[test]
    fn test_table_format() {
        assert_eq!(TableFormat::from_path("x.csv"), TableFormat::Csv);
        assert_eq!(TableFormat::from_path("x.xlsx"), TableFormat::Xlsx);
        assert_eq!(TableFormat::from_path("x.parquet"), TableFormat::Unknown);
        assert_eq!(TableFormat::Xlsx.as_str(), "xlsx");
    }
}
