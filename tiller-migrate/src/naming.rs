//! Change unit file naming.
//!
//! Every change script is named `<sequence>_<snake_case_description>.<ext>`,
//! for example `3_add_index_to_table_one.sql`. The sequence is a positive
//! integer without leading zeros; the description is lowercase ASCII letters,
//! digits and underscores. The description is turned into the PascalCase unit
//! name used to look the executable unit up in a
//! [`UnitRegistry`](crate::unit::UnitRegistry):
//!
//! ```text
//! 1_create_table_one.sql        ->  CreateTableOne
//! 3_add_index_to_table_one.rs   ->  AddIndexToTableOne
//! ```

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::{MigrateResult, MigrationError};

/// `<sequence>_<description>` with the extension already removed.
static STEM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([1-9][0-9]*)_([a-z0-9_]+)$").expect("valid stem pattern"));

/// A file name split into its convention parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Numeric prefix.
    pub sequence: u64,
    /// File name without extension, e.g. `3_add_index_to_table_one`.
    pub stem: String,
    /// The snake_case part after the prefix.
    pub description: String,
    /// PascalCase unit name derived from the description.
    pub unit_name: String,
    /// The file extension, without the dot.
    pub extension: String,
}

/// Parse a change script file name, checking its extension against the
/// recognized set.
pub fn parse_file_name(file_name: &str, extensions: &[String]) -> MigrateResult<ParsedName> {
    let Some((stem, extension)) = file_name.rsplit_once('.') else {
        return Err(MigrationError::invalid_name(
            file_name,
            "missing file extension",
        ));
    };

    if !extensions.iter().any(|ext| ext == extension) {
        return Err(MigrationError::invalid_name(
            file_name,
            format!(
                "unrecognized extension '.{}' (expected one of: {})",
                extension,
                extensions.join(", ")
            ),
        ));
    }

    let (sequence, description) = split_stem(stem).map_err(|reason| {
        MigrationError::invalid_name(file_name, reason)
    })?;
    let unit_name = pascal_case(description);
    if unit_name.is_empty() {
        return Err(MigrationError::invalid_name(
            file_name,
            "description contains no words",
        ));
    }

    Ok(ParsedName {
        sequence,
        stem: stem.to_string(),
        description: description.to_string(),
        unit_name,
        extension: extension.to_string(),
    })
}

/// Derive the unit name from an extension-less stem.
///
/// `"3_add_index_to_table_one"` becomes `"AddIndexToTableOne"`.
pub fn unit_name(stem: &str) -> MigrateResult<String> {
    let (_, description) =
        split_stem(stem).map_err(|reason| MigrationError::invalid_name(stem, reason))?;
    let name = pascal_case(description);
    if name.is_empty() {
        return Err(MigrationError::invalid_name(stem, "description contains no words"));
    }
    Ok(name)
}

/// Check whether a string is usable as an unquoted SQL identifier.
pub(crate) fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn split_stem(stem: &str) -> Result<(u64, &str), String> {
    let caps = STEM_PATTERN.captures(stem).ok_or_else(|| {
        if stem.starts_with('0') {
            "sequence number must not start with zero".to_string()
        } else if !stem.starts_with(|c: char| c.is_ascii_digit()) {
            "missing numeric sequence prefix".to_string()
        } else {
            "expected <positive integer>_<lowercase snake_case description>".to_string()
        }
    })?;

    let (Some(digits), Some(description)) = (caps.get(1), caps.get(2)) else {
        return Err("expected <positive integer>_<lowercase snake_case description>".into());
    };
    let sequence = digits
        .as_str()
        .parse::<u64>()
        .map_err(|_| format!("sequence number {} is out of range", digits.as_str()))?;

    Ok((sequence, description.as_str()))
}

fn pascal_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts() -> Vec<String> {
        vec!["sql".to_string(), "rs".to_string()]
    }

    #[test]
    fn test_unit_name_derivation() {
        let cases = [
            ("1_create_table_one", "CreateTableOne"),
            ("3_add_index_to_table_one", "AddIndexToTableOne"),
            ("7_users", "Users"),
            ("12_seed__admin_user_", "SeedAdminUser"),
            ("4_add_2fa_to_users", "Add2faToUsers"),
            ("100_a_b_c", "ABC"),
        ];

        for (stem, expected) in cases {
            assert_eq!(unit_name(stem).unwrap(), expected, "stem: {}", stem);
        }
    }

    #[test]
    fn test_parse_file_name() {
        let parsed = parse_file_name("3_add_index_to_table_one.sql", &exts()).unwrap();
        assert_eq!(parsed.sequence, 3);
        assert_eq!(parsed.stem, "3_add_index_to_table_one");
        assert_eq!(parsed.description, "add_index_to_table_one");
        assert_eq!(parsed.unit_name, "AddIndexToTableOne");
        assert_eq!(parsed.extension, "sql");
    }

    #[test]
    fn test_rejects_missing_prefix() {
        let err = parse_file_name("create_table_one.sql", &exts()).unwrap_err();
        assert!(err.to_string().contains("create_table_one.sql"));
        assert!(err.to_string().contains("missing numeric sequence prefix"));
    }

    #[test]
    fn test_rejects_leading_zero() {
        let err = parse_file_name("01_add_index.sql", &exts()).unwrap_err();
        assert!(matches!(err, MigrationError::InvalidUnitName { ref name, .. } if name == "01_add_index.sql"));
        assert!(unit_name("0_initial").is_err());
    }

    #[test]
    fn test_rejects_bad_description() {
        assert!(parse_file_name("2_AddIndex.sql", &exts()).is_err());
        assert!(parse_file_name("2_add-index.sql", &exts()).is_err());
        assert!(parse_file_name("2_.sql", &exts()).is_err());
        assert!(parse_file_name("2___.sql", &exts()).is_err());
    }

    #[test]
    fn test_rejects_extension() {
        assert!(parse_file_name("2_add_index", &exts()).is_err());
        let err = parse_file_name("2_add_index.php", &exts()).unwrap_err();
        assert!(err.to_string().contains(".php"));
    }

    #[test]
    fn test_sequence_overflow() {
        let err = parse_file_name("99999999999999999999999_huge.sql", &exts()).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_sql_identifier() {
        assert!(is_sql_identifier("migrations"));
        assert!(is_sql_identifier("_seed_date"));
        assert!(!is_sql_identifier("1table"));
        assert!(!is_sql_identifier("drop table; --"));
        assert!(!is_sql_identifier(""));
    }
}
