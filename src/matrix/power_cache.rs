use crate::config::POWER_CACHE_CAPACITY;
use crate::error::Result;
use crate::matrix::matrix::Matrix;
use crate::rings::scalar::Field;
use log::trace;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
struct Entry<T> {
    base: Matrix<T>,
    exponent: i32,
    result: Matrix<T>,
}

/// Bounded memo of `Matrix::power`, keyed by (matrix value, exponent).
/// Least recently used entries are evicted first.
#[derive(Debug, Clone)]
pub struct PowerCache<T> {
    capacity: usize,
    // Most recently used first
    entries: VecDeque<Entry<T>>,
}

impl<T: Field> Default for PowerCache<T> {
    fn default() -> Self {
        PowerCache::new(POWER_CACHE_CAPACITY)
    }
}

impl<T: Field> PowerCache<T> {
    pub fn new(capacity: usize) -> PowerCache<T> {
        let capacity = capacity.max(1);
        PowerCache {
            capacity,
            entries: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, base: &Matrix<T>, exponent: i32) -> bool {
        self.position(base, exponent).is_some()
    }

    fn position(&self, base: &Matrix<T>, exponent: i32) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.exponent == exponent && e.base == *base)
    }

    /// `base^exponent`, computed at most once while it stays cached.
    pub fn power(&mut self, base: &Matrix<T>, exponent: i32) -> Result<Matrix<T>> {
        let hit = self
            .position(base, exponent)
            .and_then(|index| self.entries.remove(index));
        if let Some(entry) = hit {
            trace!("power cache hit for exponent {}", exponent);
            let result = entry.result.clone();
            self.entries.push_front(entry);
            return Ok(result);
        }

        let result = match self.closest_lower(base, exponent) {
            Some((from, partial)) => {
                trace!("power cache resuming exponent {} from {}", exponent, from);
                (from..exponent).try_fold(partial, |acc, _| &acc * base)?
            }
            None => {
                trace!("power cache miss for exponent {}", exponent);
                base.power(exponent)?
            }
        };

        self.entries.push_front(Entry {
            base: base.clone(),
            exponent,
            result: result.clone(),
        });
        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                trace!("power cache evicted exponent {}", evicted.exponent);
            }
        }
        Ok(result)
    }

    /// Largest cached positive power of `base` below `exponent`.
    fn closest_lower(&self, base: &Matrix<T>, exponent: i32) -> Option<(i32, Matrix<T>)> {
        self.entries
            .iter()
            .filter(|e| e.exponent >= 1 && e.exponent < exponent && e.base == *base)
            .max_by_key(|e| e.exponent)
            .map(|e| (e.exponent, e.result.clone()))
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::rings::fraction::Fraction;

    fn fib() -> Matrix<Fraction> {
        Matrix::from_list(vec![
            vec![Fraction::from(1), Fraction::from(1)],
            vec![Fraction::from(1), Fraction::from(0)],
        ])
        .unwrap()
    }

    #[test]
    fn test_power_cache_matches_uncached() {
        let m = fib();
        let mut cache = PowerCache::default();
        for p in [3, 1, 7, 7, 0, -1, 12] {
            assert_eq!(cache.power(&m, p).unwrap(), m.power(p).unwrap());
        }
        assert!(cache.contains(&m, 7));
        assert!(cache.contains(&m, -1));
        assert_eq!(cache.len(), 6);
    }

    #[test]
    fn test_power_cache_eviction() {
        let m = fib();
        let mut cache = PowerCache::new(2);
        cache.power(&m, 1).unwrap();
        cache.power(&m, 2).unwrap();
        // Touch 1 so that 2 becomes the oldest.
        cache.power(&m, 1).unwrap();
        cache.power(&m, 3).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&m, 1));
        assert!(cache.contains(&m, 3));
        assert!(!cache.contains(&m, 2));
    }

    #[test]
    fn test_power_cache_keys_on_matrix_value() {
        let a = fib();
        let b = a.scale(&Fraction::from(2));
        let mut cache = PowerCache::default();
        cache.power(&a, 2).unwrap();
        assert_eq!(cache.power(&b, 2).unwrap(), b.power(2).unwrap());
        assert!(cache.contains(&a, 2));
        assert!(cache.contains(&b, 2));
    }

    #[test]
    fn test_power_cache_errors_not_cached() {
        let m = fib();
        let mut cache = PowerCache::default();
        assert!(matches!(cache.power(&m, -3), Err(Error::Value(_))));
        assert!(cache.is_empty());
    }
}
