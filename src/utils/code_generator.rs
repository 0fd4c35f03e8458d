//! Short code generation.
//!
//! Codes are six letters drawn uniformly from `a-z` and `A-Z`, giving
//! 52^6 (about 19.8 billion) possible codes. They are identifiers, not
//! secrets, so a fast seeded PRNG is used rather than OS entropy.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of characters in every generated code.
pub const CODE_LENGTH: usize = 6;

/// Characters a code may contain.
pub const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Codes that would shadow a fixed route and are never handed out.
const RESERVED_CODES: &[&str] = &["health"];

/// Source of candidate short codes.
///
/// Implementations must be safe to share between request tasks.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Returns a fresh candidate code. Never fails.
    fn generate(&self) -> String;
}

/// Process-wide random code provider.
///
/// Wraps a single PRNG seeded once from the clock. The mutex is held only
/// for the six draws of one code.
pub struct RandomCodeGenerator {
    rng: Mutex<StdRng>,
}

impl RandomCodeGenerator {
    /// Creates a generator seeded from the current time.
    pub fn from_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(seed)
    }

    /// Creates a generator with a fixed seed. Useful for reproducible tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::from_time()
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        // A poisoned lock only means another thread panicked mid-draw; the
        // PRNG state is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        (0..CODE_LENGTH)
            .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
            .collect()
    }
}

/// Returns true if `code` has the shape of a generated code.
///
/// # Examples
///
/// ```
/// use shorten::utils::code_generator::is_valid_code;
///
/// assert!(is_valid_code("AbcXyz"));
/// assert!(!is_valid_code("abc12x"));
/// ```
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Returns true if `code` collides with a fixed route path.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_generate_code_has_correct_length() {
        let generator = RandomCodeGenerator::from_time();
        assert_eq!(generator.generate().len(), CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_only_letters() {
        let generator = RandomCodeGenerator::from_time();
        for _ in 0..1000 {
            let code = generator.generate();
            assert!(
                code.chars().all(|c| c.is_ascii_alphabetic()),
                "unexpected character in {code}"
            );
        }
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let generator = RandomCodeGenerator::from_time();
        let codes: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();

        // 1000 draws from 52^6 collide with probability well below 1e-4.
        assert!(codes.len() >= 999);
    }

    #[test]
    fn test_generate_code_uses_both_cases() {
        let generator = RandomCodeGenerator::with_seed(7);
        let joined: String = (0..200).map(|_| generator.generate()).collect();

        assert!(joined.chars().any(|c| c.is_ascii_lowercase()));
        assert!(joined.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = RandomCodeGenerator::with_seed(42);
        let b = RandomCodeGenerator::with_seed(42);

        for _ in 0..10 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn test_generator_is_shareable_across_threads() {
        let generator = Arc::new(RandomCodeGenerator::from_time());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = generator.clone();
                std::thread::spawn(move || {
                    (0..100).map(|_| generator.generate()).collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            for code in handle.join().unwrap() {
                assert!(is_valid_code(&code));
            }
        }
    }

    #[test]
    fn test_is_valid_code() {
        assert!(is_valid_code("abcdef"));
        assert!(is_valid_code("ABCDEF"));
        assert!(is_valid_code("aBcDeF"));

        assert!(!is_valid_code(""));
        assert!(!is_valid_code("abcde"));
        assert!(!is_valid_code("abcdefg"));
        assert!(!is_valid_code("abc12x"));
        assert!(!is_valid_code("abc-de"));
        assert!(!is_valid_code("ábcdef"));
    }

    #[test]
    fn test_reserved_codes() {
        assert!(is_reserved_code("health"));
        assert!(!is_reserved_code("Health"));
        assert!(!is_reserved_code("abcdef"));
    }
}
