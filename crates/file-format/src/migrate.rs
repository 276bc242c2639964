use std::cmp::Ordering;

use serde_json::Value;

use crate::errors::LoadError;

/// Major component of a `major.minor.patch` version string.
pub fn major_version(version: &str) -> Option<u64> {
    version.trim().split('.').next()?.parse().ok()
}

/// Compare the majors of a file version and the supported version.
pub fn compare_major(file_version: &str, supported: &str) -> Result<Ordering, LoadError> {
    let parse = |v: &str| {
        major_version(v).ok_or_else(|| LoadError::Parse(format!("malformed schema version {v:?}")))
    };
    Ok(parse(file_version)?.cmp(&parse(supported)?))
}

/// Upgrade a raw document from an older schema major to `to_version`.
///
/// Migrations run on the untyped JSON, one major at a time. No older major
/// has a migration yet, so every request fails.
pub fn migrate(document: Value, from_version: &str, to_version: &str) -> Result<Value, LoadError> {
    if major_version(from_version) == major_version(to_version) {
        return Ok(document);
    }
    Err(LoadError::MigrationFailed {
        from: from_version.to_string(),
        to: to_version.to_string(),
        reason: format!("no migration path from {from_version} to {to_version}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn majors_parse_leniently() {
        assert_eq!(major_version("3.0.0"), Some(3));
        assert_eq!(major_version("2"), Some(2));
        assert_eq!(major_version("x.1"), None);
        assert_eq!(compare_major("2.9.9", "3.0.0").unwrap(), Ordering::Less);
        assert!(compare_major("", "3.0.0").is_err());
    }

    #[test]
    fn same_major_passes_through() {
        let doc = serde_json::json!({"objects": []});
        assert_eq!(migrate(doc.clone(), "3.1.0", "3.0.0").unwrap(), doc);
        assert!(matches!(
            migrate(doc, "2.0.0", "3.0.0"),
            Err(LoadError::MigrationFailed { .. })
        ));
    }
}
