//! Attribute-name slugs used as query-string keys.

/// Lowercase `input`, keep letters and digits, and collapse every other run
/// of characters into a single `-`.
///
/// # Example
///
/// ```
/// use turbo_facets::codec::slugify;
///
/// assert_eq!(slugify("Exterior Color"), "exterior-color");
/// assert_eq!(slugify("  Fuel / Type "), "fuel-type");
/// ```
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("Body Style"), "body-style");
        assert_eq!(slugify("Drive--Train__Type"), "drive-train-type");
        assert_eq!(slugify("-Seats-"), "seats");
        assert_eq!(slugify("MPG (City)"), "mpg-city");
    }

    #[test]
    fn test_slugify_keeps_unicode_letters() {
        assert_eq!(slugify("Größe"), "größe");
        assert_eq!(slugify("Колір"), "колір");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        for name in ["Exterior Color", "MPG (City)", "a-b", ""] {
            let once = slugify(name);
            assert_eq!(slugify(&once), once);
        }
    }
}
