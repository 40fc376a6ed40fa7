//! Output naming rules
//!
//! Derives folder names, extensions and filesystem-safe file names from
//! user-supplied paths and grouping values.

use crate::domain::table_format::TableFormat;
use regex::Regex;
use std::sync::LazyLock;

/// Characters replaced in grouping values: double quotes, any character
/// followed by two whitespace characters, single whitespace characters,
/// guillemets and apostrophes. Alternatives are tried left to right.
static FORBIDDEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""|.\s\s|\s|«|»|'"#).expect("forbidden-character pattern is valid")
});

/// Remove every double quote from a user-supplied path
pub fn clean_path(raw: &str) -> String {
    raw.replace('"', "")
}

/// Last path component, splitting on both `/` and `\`
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Output folder name for a source file: base name up to its first dot
///
/// `reports/2024.sales.xlsx` gives `2024`.
pub fn folder_name(path: &str) -> String {
    let base = base_name(path);
    let stem = base.split('.').next().unwrap_or(base);
    stem.replace('"', "")
}

/// Text after the last dot of the base name
///
/// A name without a dot is returned whole, so it never matches a known format.
pub fn extension(path: &str) -> &str {
    let base = base_name(path);
    base.rsplit('.').next().unwrap_or(base)
}

/// Replace characters that are unsafe in file names with `_`
pub fn sanitize_name(value: &str) -> String {
    FORBIDDEN.replace_all(value, "_").into_owned()
}

/// File name for one split group: `{prefix} {name} {postfix}.{ext}`
///
/// The single spaces are always present, even for an empty prefix or postfix.
pub fn output_file_name(prefix: &str, name: &str, postfix: &str, format: TableFormat) -> String {
    format!("{} {} {}.{}", prefix, name, postfix, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_quotes_guillemets_and_spaces() {
        assert_eq!(
            sanitize_name("He said \"hi\" « there »"),
            "He_said__hi____there__"
        );
    }

    #[test]
    fn test_sanitize_quoted_value() {
        assert_eq!(sanitize_name("\"Lyon\""), "_Lyon_");
        assert_eq!(sanitize_name("l'avenue"), "l_avenue");
        assert_eq!(sanitize_name("Paris"), "Paris");
    }

    #[test]
    fn test_sanitize_double_whitespace_consumes_preceding_char() {
        assert_eq!(sanitize_name("a  b"), "_b");
        assert_eq!(sanitize_name("Ltd.  Co"), "Ltd_Co");
    }

    #[test]
    fn test_sanitize_other_whitespace() {
        assert_eq!(sanitize_name("a\tb"), "a_b");
        assert_eq!(sanitize_name("a\u{a0}b"), "a_b");
    }

    #[test]
    fn test_folder_name() {
        assert_eq!(folder_name("data.csv"), "data");
        assert_eq!(folder_name("/tmp/in/report.v2.xlsx"), "report");
        assert_eq!(folder_name(r"C:\files\sales.xlsx"), "sales");
        assert_eq!(folder_name("\"quoted.csv\""), "quoted");
        assert_eq!(folder_name("noext"), "noext");
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("data.csv"), "csv");
        assert_eq!(extension("/tmp/in/report.v2.xlsx"), "xlsx");
        assert_eq!(extension("dir.d/noext"), "noext");
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("\"/tmp/a b.csv\""), "/tmp/a b.csv");
    }

    #[test]
    fn test_output_file_name_keeps_spaces() {
        assert_eq!(
            output_file_name("", "Paris", "", TableFormat::Csv),
            " Paris .csv"
        );
        assert_eq!(
            output_file_name("2024", "Lyon", "final", TableFormat::Xlsx),
            "2024 Lyon final.xlsx"
        );
    }
}
