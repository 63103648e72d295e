use crate::{ecc::FR_SIZE, polynomials::Polynomial};
use anyhow::{anyhow, Result};
use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
};

/// Named polynomials owned by a proving key.
#[derive(Debug, Clone, Default)]
pub struct PolynomialStore {
    polynomial_map: HashMap<String, Polynomial>,
}

impl PolynomialStore {
    /// empty store
    pub fn new() -> Self {
        Self {
            polynomial_map: HashMap::new(),
        }
    }

    /// Transfer ownership of a polynomial to the store, replacing any previous entry.
    ///
    /// # Arguments
    /// - `name` - string ID of the polynomial
    /// - `polynomial` - the polynomial to be stored
    pub fn put(&mut self, name: &str, polynomial: Polynomial) {
        self.polynomial_map.insert(name.to_owned(), polynomial);
    }

    /// Get a reference to a polynomial in the store.
    ///
    /// # Errors
    /// If `key` is not present.
    pub fn get(&self, key: &str) -> Result<&Polynomial> {
        self.polynomial_map
            .get(key)
            .ok_or_else(|| anyhow!("didn't find polynomial {key}"))
    }

    /// Erase a polynomial from the store and hand it back.
    pub fn remove(&mut self, key: &str) -> Result<Polynomial> {
        self.polynomial_map
            .remove(key)
            .ok_or_else(|| anyhow!("didn't find polynomial {key}"))
    }

    /// Total size in bytes of all stored coefficients.
    pub fn get_size_in_bytes(&self) -> usize {
        self.polynomial_map
            .values()
            .map(|entry| entry.size() * FR_SIZE)
            .sum()
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.polynomial_map.contains_key(key)
    }

    /// Number of stored polynomials.
    pub fn len(&self) -> usize {
        self.polynomial_map.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.polynomial_map.is_empty()
    }
}

impl Display for PolynomialStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let size_in_mb = self.get_size_in_bytes() as f64 / 1e6;
        writeln!(f, "PolynomialStore contents total size: {size_in_mb} MB")?;
        let mut keys: Vec<&String> = self.polynomial_map.keys().collect();
        keys.sort();
        for key in keys {
            let entry_bytes = self.polynomial_map[key].size() * FR_SIZE;
            writeln!(f, "PolynomialStore: {key} -> {entry_bytes} bytes")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn put_get_remove() {
        let mut store = PolynomialStore::new();
        assert!(store.is_empty());
        store.put("q_m", Polynomial::new(8));
        store.put("sigma_1", Polynomial::from(vec![Fr::from(3u64); 4]));
        assert_eq!(store.len(), 2);
        assert!(store.contains("q_m"));
        assert_eq!(store.get("sigma_1").unwrap()[2], Fr::from(3u64));
        assert_eq!(store.get_size_in_bytes(), 12 * 32);

        let removed = store.remove("q_m").unwrap();
        assert_eq!(removed.size(), 8);
        assert!(!store.contains("q_m"));
        assert!(store.get("q_m").is_err());
        assert!(store.remove("q_m").is_err());
    }

    #[test]
    fn display_lists_entries() {
        let mut store = PolynomialStore::new();
        store.put("w_1", Polynomial::new(2));
        let shown = store.to_string();
        assert!(shown.contains("w_1 -> 64 bytes"));
    }
}
