use std::collections::HashMap;

pub const FELT: &str = "felt252";

/// Closed mapping from source type annotations to Cairo primitive types.
///
/// Lookups are exact and case-sensitive on the annotation text. Anything not
/// in the table, parameterized types included, resolves to the fallback.
#[derive(Debug, Clone)]
pub struct TypeMap {
    entries: HashMap<&'static str, &'static str>,
    fallback: &'static str,
}

impl TypeMap {
    pub fn starknet() -> Self {
        let entries = [
            ("number", FELT),
            ("boolean", "bool"),
            ("bigint", "u256"),
            ("string", FELT),
        ]
        .into_iter()
        .collect();

        TypeMap {
            entries,
            fallback: FELT,
        }
    }

    pub fn resolve(&self, annotation: Option<&str>) -> &'static str {
        annotation
            .and_then(|name| self.entries.get(name).copied())
            .unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> &'static str {
        self.fallback
    }
}

impl Default for TypeMap {
    fn default() -> Self {
        Self::starknet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types() {
        let types = TypeMap::starknet();
        assert_eq!(types.resolve(Some("number")), "felt252");
        assert_eq!(types.resolve(Some("boolean")), "bool");
        assert_eq!(types.resolve(Some("bigint")), "u256");
        assert_eq!(types.resolve(Some("string")), "felt252");
    }

    #[test]
    fn test_unknown_and_missing_fall_back() {
        let types = TypeMap::starknet();
        assert_eq!(types.resolve(None), types.fallback());
        assert_eq!(types.resolve(Some("Address")), "felt252");
        assert_eq!(types.resolve(Some("Array<number>")), "felt252");
        assert_eq!(types.resolve(Some("Boolean")), "felt252");
    }
}
