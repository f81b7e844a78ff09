//! Translation between schema field names and accessor names.
//!
//! Schemas name fields in `camelCase` (`appearsIn`), while callers read and
//! request them in `snake_case` (`appears_in`). Both directions are total and
//! leave names already in the target convention untouched.
//!
//! Leading underscores are kept verbatim, and introspection names such as
//! `__typename` are never rewritten.
//!
//! For lower-case accessors whose segments start with a letter,
//! `to_accessor_case(to_wire_case(a)) == a` except where a one-letter segment
//! (other than the first) is followed by another one-letter segment. Those
//! capitals run together on the wire and read back as an acronym:
//! `coord_x_y` -> `coordXY` -> `coord_xy`. Both accessors still resolve to
//! the same schema field, but results are keyed by the second form.
//!
//! ```
//! use graphql_dsl::names::{to_accessor_case, to_wire_case};
//!
//! assert_eq!(to_wire_case("appears_in"), "appearsIn");
//! assert_eq!(to_accessor_case("appearsIn"), "appears_in");
//! assert_eq!(to_accessor_case("__typename"), "__typename");
//! ```

/// Returns true for reserved introspection names (`__typename`, `__schema`, ...).
#[must_use]
pub fn is_introspection_name(name: &str) -> bool {
    name.starts_with("__")
}

/// Split a name into its leading underscores and the remainder.
fn split_leading_underscores(name: &str) -> (&str, &str) {
    let body_start = name.len() - name.trim_start_matches('_').len();
    name.split_at(body_start)
}

/// Convert an accessor name (`snake_case`) into the schema's `camelCase` form.
///
/// The first segment is kept as written and each following segment gets its
/// first character upper-cased. The rest of a segment is left alone, so
/// `get_HTTP_status` becomes `getHTTPStatus` rather than losing the acronym.
#[must_use]
pub fn to_wire_case(accessor: &str) -> String {
    if is_introspection_name(accessor) {
        return accessor.to_string();
    }

    let (prefix, body) = split_leading_underscores(accessor);
    let mut out = String::with_capacity(accessor.len());
    out.push_str(prefix);

    let mut segments = body.split('_');
    if let Some(first) = segments.next() {
        out.push_str(first);
    }
    for segment in segments {
        let mut chars = segment.chars();
        match chars.next() {
            Some(first) => {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
            // Doubled or trailing underscores survive as-is.
            None => out.push('_'),
        }
    }
    out
}

/// Convert a schema name (`camelCase`) into an accessor name (`snake_case`).
///
/// An underscore is inserted before an upper-case letter that follows a
/// lower-case letter or digit, and before the last capital of an acronym run
/// when a lower-case letter follows it (`HTTPServer` -> `http_server`).
#[must_use]
pub fn to_accessor_case(wire: &str) -> String {
    if is_introspection_name(wire) {
        return wire.to_string();
    }

    let (prefix, body) = split_leading_underscores(wire);
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(wire.len() + 4);
    out.push_str(prefix);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let after_word = prev.is_ascii_lowercase() || prev.is_ascii_digit();
            let ends_acronym = prev.is_ascii_uppercase() && next_is_lower;
            if (after_word || ends_acronym) && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: &[(&str, &str)] = &[
        ("name", "name"),
        ("appears_in", "appearsIn"),
        ("home_planet", "homePlanet"),
        ("primary_function", "primaryFunction"),
        ("created_at_utc", "createdAtUtc"),
        ("_private", "_private"),
        ("_private_field", "_privateField"),
        ("id", "id"),
    ];

    #[test]
    fn test_to_wire_case() {
        for (accessor, wire) in PAIRS {
            assert_eq!(to_wire_case(accessor), *wire, "accessor {accessor}");
        }
    }

    #[test]
    fn test_to_accessor_case() {
        for (accessor, wire) in PAIRS {
            assert_eq!(to_accessor_case(wire), *accessor, "wire {wire}");
        }
    }

    #[test]
    fn test_round_trip() {
        for (accessor, _) in PAIRS {
            assert_eq!(to_accessor_case(&to_wire_case(accessor)), *accessor);
        }
    }

    /// Every accessor of one to three segments drawn from `SEGMENTS`.
    fn generated_accessors() -> Vec<Vec<&'static str>> {
        const SEGMENTS: &[&str] = &["a", "x", "y", "id", "home", "planet2", "utc"];
        let mut names = Vec::new();
        let mut frontier: Vec<Vec<&str>> = vec![Vec::new()];
        for _ in 0..3 {
            frontier = frontier
                .iter()
                .flat_map(|name| {
                    SEGMENTS.iter().map(move |segment| {
                        let mut name = name.clone();
                        name.push(*segment);
                        name
                    })
                })
                .collect();
            names.extend(frontier.iter().cloned());
        }
        names
    }

    /// A one-letter segment after the first, followed by another one.
    fn has_single_letter_run(segments: &[&str]) -> bool {
        segments
            .windows(2)
            .enumerate()
            .any(|(i, pair)| i > 0 && pair[0].len() == 1 && pair[1].len() == 1)
    }

    #[test]
    fn test_round_trip_over_generated_names() {
        let names = generated_accessors();
        assert_eq!(names.len(), 7 + 49 + 343);

        for segments in names {
            let accessor = segments.join("_");
            let wire = to_wire_case(&accessor);
            let back = to_accessor_case(&wire);
            if has_single_letter_run(&segments) {
                assert_ne!(back, accessor, "{accessor} -> {wire}");
            } else {
                assert_eq!(back, accessor, "{accessor} -> {wire}");
            }
            // Back in snake case either way, and stable from there on.
            assert_eq!(to_accessor_case(&back), back);
        }
    }

    #[test]
    fn test_single_letter_runs_read_as_acronyms() {
        assert_eq!(to_wire_case("coord_x_y"), "coordXY");
        assert_eq!(to_accessor_case("coordXY"), "coord_xy");
        assert_eq!(to_wire_case("x_y_z"), "xYZ");
        assert_eq!(to_accessor_case("xYZ"), "x_yz");

        // A leading one-letter segment, or one followed by a longer segment,
        // keeps its boundary.
        for accessor in ["a_b", "x_y", "point_x", "coord_x_id", "coord_x2_y"] {
            assert_eq!(to_accessor_case(&to_wire_case(accessor)), accessor);
        }
    }

    #[test]
    fn test_typename_is_never_transformed() {
        assert_eq!(to_wire_case("__typename"), "__typename");
        assert_eq!(to_accessor_case("__typename"), "__typename");
        assert_eq!(to_accessor_case("__Schema"), "__Schema");
    }

    #[test]
    fn test_idempotent_in_target_convention() {
        assert_eq!(to_wire_case("appearsIn"), "appearsIn");
        assert_eq!(to_accessor_case("appears_in"), "appears_in");
        assert_eq!(to_wire_case(&to_wire_case("home_planet")), "homePlanet");
        assert_eq!(
            to_accessor_case(&to_accessor_case("homePlanet")),
            "home_planet"
        );
    }

    #[test]
    fn test_acronyms() {
        assert_eq!(to_accessor_case("HTTPServer"), "http_server");
        assert_eq!(to_accessor_case("userID"), "user_id");
        assert_eq!(to_accessor_case("parseHTMLDocument"), "parse_html_document");
        assert_eq!(to_wire_case("get_HTTP_status"), "getHTTPStatus");
    }

    #[test]
    fn test_digits() {
        assert_eq!(to_accessor_case("address2Line"), "address2_line");
        assert_eq!(to_wire_case("address2_line"), "address2Line");
    }

    #[test]
    fn test_degenerate_names() {
        assert_eq!(to_wire_case(""), "");
        assert_eq!(to_accessor_case(""), "");
        assert_eq!(to_wire_case("_"), "_");
        assert_eq!(to_accessor_case("_"), "_");
        assert_eq!(to_wire_case("trailing_"), "trailing_");
    }
}
