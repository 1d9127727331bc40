/// Returns `true` if `name` can be used as a class keyword or field keyword.
///
/// The rules follow XML element names so documents can be mapped to
/// XML without renaming:
///
/// - not empty;
/// - no whitespace or control characters;
/// - the first character is not a digit, and not punctuation other than `_`;
/// - does not start with `xml` in any letter case.
///
/// # Examples
///
/// ```
/// use pdm_reflect::io::is_valid_element_name;
///
/// assert!(is_valid_element_name("_name"));
/// assert!(is_valid_element_name("item-2"));
/// assert!(!is_valid_element_name("2nd"));
/// assert!(!is_valid_element_name("XmlThing"));
/// ```
pub fn is_valid_element_name(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    if first.is_ascii_digit() || (first.is_ascii_punctuation() && first != '_') {
        return false;
    }
    if name
        .as_bytes()
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(b"xml"))
    {
        return false;
    }
    !name.chars().any(|c| c.is_whitespace() || c.is_control())
}
