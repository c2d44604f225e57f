//! Key Generation Module
//!
//! Deterministic cache keys built from a prefix and a set of parameters.

use std::fmt::Display;

// == Constants ==
/// Separates `field:value` pairs in generated keys
pub const PARAM_SEPARATOR: char = '|';

// == Generate Key ==
/// Builds `"<prefix>:<field>:<value>|<field>:<value>..."` with fields sorted
/// lexicographically, so the same parameters always yield the same key whatever
/// order they were supplied in.
///
/// With no parameters the key is the prefix alone.
///
/// # Example
/// ```
/// use tagged_cache::cache::generate_key;
///
/// let key = generate_key("students", [("branch", 2), ("year", 2024)]);
/// assert_eq!(key, "students:branch:2|year:2024");
/// ```
pub fn generate_key<I, K, V>(prefix: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    let mut pairs: Vec<(String, String)> = params
        .into_iter()
        .map(|(field, value)| (field.as_ref().to_string(), value.to_string()))
        .collect();

    if pairs.is_empty() {
        return prefix.to_string();
    }

    pairs.sort();

    let joined = pairs
        .iter()
        .map(|(field, value)| format!("{}:{}", field, value))
        .collect::<Vec<_>>()
        .join(&PARAM_SEPARATOR.to_string());

    format!("{}:{}", prefix, joined)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_order_independent() {
        let a = generate_key("students", [("b", 2), ("a", 1)]);
        let b = generate_key("students", [("a", 1), ("b", 2)]);

        assert_eq!(a, b);
        assert_eq!(a, "students:a:1|b:2");
    }

    #[test]
    fn test_from_hash_map() {
        let mut params = HashMap::new();
        params.insert("page", "3".to_string());
        params.insert("branch", "north".to_string());
        params.insert("size", "20".to_string());

        assert_eq!(
            generate_key("employees", &params),
            "employees:branch:north|page:3|size:20"
        );
    }

    #[test]
    fn test_empty_params() {
        let params: Vec<(&str, u32)> = Vec::new();
        assert_eq!(generate_key("academic-years", params), "academic-years");
    }

    #[test]
    fn test_values_keep_their_display_form() {
        let key = generate_key("payroll", [("month", "2024-05"), ("active", "true")]);
        assert_eq!(key, "payroll:active:true|month:2024-05");
    }
}
