use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::prelude::Distribution;
use rand::Rng;
use thiserror::Error;

/// A numeric pickup code: a submission sequence number followed by four
/// random decimal digits (leading zeros allowed in the suffix).
///
/// Codes are best-effort unique only. Nothing checks a fresh code
/// against stored ones, and lookups resolve a collision by taking the
/// first match found.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PickupCode(String);

impl PickupCode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PickupCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
#[error("pickup codes are decimal digits only")]
pub struct ParseCodeError;

impl FromStr for PickupCode {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_owned()))
        } else {
            Err(ParseCodeError)
        }
    }
}

/// Samples one decimal digit of the random suffix.
struct SuffixDigit;

impl Distribution<char> for SuffixDigit {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        char::from(b'0' + rng.gen_range(0..10_u8))
    }
}

/// Hands out pickup codes from a process-local sequence counter.
///
/// The counter is seeded with the number of directories present when the
/// store opened, so the sequence approximates "how many submissions so
/// far" the same way a live directory count would, without re-listing
/// the root on every submit. It resets to the directory count on reopen.
#[derive(Debug)]
pub struct CodeGenerator {
    counter: AtomicU64,
}

impl CodeGenerator {
    #[must_use]
    pub const fn seeded(existing: u64) -> Self {
        Self {
            counter: AtomicU64::new(existing),
        }
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> PickupCode {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let suffix: String = (0..4).map(|_| SuffixDigit.sample(rng)).collect();
        PickupCode(format!("{sequence}{suffix}"))
    }
}

#[cfg(test)]
mod tests {
    use rand::prelude::StdRng;
    use rand::SeedableRng;

    use super::{CodeGenerator, PickupCode};

    #[test]
    fn codes_are_sequence_plus_four_digits() {
        let mut rng = StdRng::seed_from_u64(0);
        let codes = CodeGenerator::seeded(0);

        let code = codes.generate(&mut rng);
        assert!(code.as_str().bytes().all(|b| b.is_ascii_digit()));
        assert!(code.as_str().starts_with('1'));
        assert_eq!(code.as_str().len(), 5);
    }

    #[test]
    fn sequence_increments_per_code() {
        let mut rng = StdRng::seed_from_u64(0);
        let codes = CodeGenerator::seeded(41);

        assert!(codes.generate(&mut rng).as_str().starts_with("42"));
        assert!(codes.generate(&mut rng).as_str().starts_with("43"));
    }

    #[test]
    fn parse_rejects_non_digits() {
        assert!("123456".parse::<PickupCode>().is_ok());
        assert!("".parse::<PickupCode>().is_err());
        assert!("12a4".parse::<PickupCode>().is_err());
        assert!("12_34".parse::<PickupCode>().is_err());
    }
}
