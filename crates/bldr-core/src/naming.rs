//! Java identifier casing and a small deterministic singularizer.

/// Uppercase the first character, leaving the rest untouched.
///
/// `items` => `Items`, `dNSPolicy` => `DNSPolicy`.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Lowercase the first character, leaving the rest untouched.
pub fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Irregular plural => singular pairs that the suffix rules get wrong.
const IRREGULAR: [(&str, &str); 8] = [
    ("children", "child"),
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("feet", "foot"),
    ("teeth", "tooth"),
];

/// Suffixes that pluralize by appending `es`.
const ES_SUFFIXES: [&str; 5] = ["ses", "xes", "zes", "ches", "shes"];

/// Reduce an English plural noun to its singular form.
///
/// Used only for display names of single-item methods (`addToItems` keeps the
/// plural, `buildFirstItem` does not). The rules are intentionally small and
/// deterministic; a name no rule matches is returned unchanged. Casing of the
/// first character is preserved so capitalized method-name fragments stay
/// capitalized.
pub fn singularize(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let lower = name.to_lowercase();
    for (plural, singular) in IRREGULAR {
        if lower == plural {
            return match_case(singular, name);
        }
    }

    if let Some(stem) = name.strip_suffix("ies") {
        // `properties` => `property`, but keep two-letter stems (`ties`) sane.
        if stem.len() > 1 {
            return format!("{stem}y");
        }
    }

    for suffix in ES_SUFFIXES {
        if lower.ends_with(suffix) {
            return name[..name.len() - 2].to_string();
        }
    }

    // Stripping must never empty the name ("s" stays "s").
    if name.len() > 1 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") {
        return name[..name.len() - 1].to_string();
    }

    name.to_string()
}

fn match_case(word: &str, pattern: &str) -> String {
    if pattern.chars().next().is_some_and(|c| c.is_uppercase()) {
        capitalize_first(word)
    } else {
        word.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_and_decapitalizes() {
        assert_eq!(capitalize_first("items"), "Items");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(decapitalize("Dog"), "dog");
        assert_eq!(decapitalize(""), "");
    }

    #[test]
    fn singularizes_regular_plurals() {
        assert_eq!(singularize("items"), "item");
        assert_eq!(singularize("Items"), "Item");
        assert_eq!(singularize("properties"), "property");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("branches"), "branch");
        assert_eq!(singularize("classes"), "class");
    }

    #[test]
    fn singularizes_irregular_plurals() {
        assert_eq!(singularize("children"), "child");
        assert_eq!(singularize("People"), "Person");
    }

    #[test]
    fn leaves_non_plurals_alone() {
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("address"), "address");
        assert_eq!(singularize("metadata"), "metadata");
        assert_eq!(singularize(""), "");
    }

    #[test]
    fn one_letter_names_survive() {
        assert_eq!(singularize("s"), "s");
        assert_eq!(singularize("S"), "S");
        assert_eq!(singularize("x"), "x");
    }
}
