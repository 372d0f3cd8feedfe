//! Cache key derivation

use std::fmt;

use serde::Serialize;

use crate::domain::DomainError;

/// A cache key derived from a value's canonical JSON form
///
/// `serde_json` emits struct fields in declaration order without whitespace, so two
/// value-equal inputs always produce the same key and distinct inputs produce
/// distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives a key from the canonical serialization of `value`
    pub fn derive<T: Serialize + ?Sized>(value: &T) -> Result<Self, DomainError> {
        let json = serde_json::to_string(value).map_err(|e| {
            DomainError::cache(format!("Failed to serialize cache key: {}", e))
        })?;

        Ok(Self(json))
    }

    /// Derives a key and prefixes it with `namespace:`
    pub fn derive_namespaced<T: Serialize + ?Sized>(
        namespace: &str,
        value: &T,
    ) -> Result<Self, DomainError> {
        let key = Self::derive(value)?;

        if namespace.is_empty() {
            Ok(key)
        } else {
            Ok(Self(format!("{}:{}", namespace, key.0)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Pair {
        first: i32,
        second: i32,
    }

    #[test]
    fn test_derive_is_compact_json() {
        let key = CacheKey::derive(&Pair { first: 1, second: 2 }).unwrap();
        assert_eq!(key.as_str(), r#"{"first":1,"second":2}"#);
    }

    #[test]
    fn test_equal_values_give_equal_keys() {
        let a = CacheKey::derive(&Pair { first: 3, second: 4 }).unwrap();
        let b = CacheKey::derive(&Pair { first: 3, second: 4 }).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_values_give_distinct_keys() {
        let a = CacheKey::derive(&Pair { first: 1, second: 1 }).unwrap();
        let b = CacheKey::derive(&Pair { first: 2, second: 2 }).unwrap();
        let swapped = CacheKey::derive(&Pair { first: 12, second: 1 }).unwrap();
        let other = CacheKey::derive(&Pair { first: 1, second: 21 }).unwrap();

        assert_ne!(a, b);
        assert_ne!(swapped, other);
    }

    #[test]
    fn test_namespaced_key() {
        let key = CacheKey::derive_namespaced("dominio", &Pair { first: 1, second: 1 }).unwrap();
        assert_eq!(key.to_string(), r#"dominio:{"first":1,"second":1}"#);
    }

    #[test]
    fn test_empty_namespace_is_plain_key() {
        let plain = CacheKey::derive(&Pair { first: 5, second: 6 }).unwrap();
        let namespaced = CacheKey::derive_namespaced("", &Pair { first: 5, second: 6 }).unwrap();
        assert_eq!(plain, namespaced);
    }
}
