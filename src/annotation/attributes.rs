//! The `key=value;key=value` attribute column of an annotation record.

/// The delimiter between attribute entries.
pub const ENTRY_DELIMITER: char = ';';

/// The separator between an attribute key and its value.
pub const KEY_VALUE_SEPARATOR: char = '=';

/// The attribute key holding a gene's locus tag.
pub const LOCUS_TAG: &str = "locus_tag";

/// The attribute key holding a gene's locus tag in the previous release.
pub const OLD_LOCUS_TAG: &str = "old_locus_tag";

/// Returns an iterator over the `(key, value)` entries of an attribute string.
///
/// Entries without a `=` are skipped. Surrounding whitespace is trimmed from
/// both keys and values.
pub fn entries(attributes: &str) -> impl Iterator<Item = (&str, &str)> {
    attributes
        .split(ENTRY_DELIMITER)
        .filter_map(|entry| entry.split_once(KEY_VALUE_SEPARATOR))
        .map(|(key, value)| (key.trim(), value.trim()))
}

/// Gets the value of the first entry named `key`.
///
/// Empty values are treated as missing.
///
/// # Examples
///
/// ```
/// use genebridge::annotation::attributes;
///
/// let raw = "ID=cds-1;old_locus_tag=B9J08_001458;locus_tag=B9J08_01458";
///
/// assert_eq!(attributes::get(raw, "locus_tag"), Some("B9J08_01458"));
/// assert_eq!(attributes::get(raw, "old_locus_tag"), Some("B9J08_001458"));
/// assert_eq!(attributes::get(raw, "product"), None);
/// ```
pub fn get<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    entries(attributes)
        .find(|(k, _)| *k == key)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Gets the locus tag of a record.
pub fn locus_tag(attributes: &str) -> Option<&str> {
    get(attributes, LOCUS_TAG)
}

/// Gets the previous-release locus tag of a record.
///
/// When several old tags are listed (comma-separated), the first one is
/// returned.
pub fn old_locus_tag(attributes: &str) -> Option<&str> {
    get(attributes, OLD_LOCUS_TAG)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locus_tag_is_not_confused_with_old_locus_tag() {
        let raw = "old_locus_tag=OLD1;locus_tag=NEW1";
        assert_eq!(locus_tag(raw), Some("NEW1"));
        assert_eq!(old_locus_tag(raw), Some("OLD1"));

        let raw = "old_locus_tag=OLD1";
        assert_eq!(locus_tag(raw), None);
    }

    #[test]
    fn test_whitespace_and_malformed_entries() {
        let raw = " locus_tag = g1 ;junk;;Note=a=b";
        assert_eq!(locus_tag(raw), Some("g1"));
        assert_eq!(get(raw, "Note"), Some("a=b"));
        assert_eq!(entries(raw).count(), 2);
    }

    #[test]
    fn test_empty_values_are_missing() {
        assert_eq!(locus_tag("locus_tag="), None);
        assert_eq!(old_locus_tag("old_locus_tag=,X"), None);
        assert_eq!(old_locus_tag("old_locus_tag=A,B"), Some("A"));
    }
}
