//! Constrained cryptographically random password generation.

use rand_core::{OsRng, RngCore};

use super::{CryptoError, Result};

/// Upper-case character class.
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Lower-case character class.
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";

/// Digit character class.
pub const DIGITS: &str = "0123456789";

/// Special character class.
pub const SPECIALS: &str = "!@#$%^&*";

/// Options controlling password generation.
///
/// Constructed via [`GeneratePasswordOptions::new`], which enforces that
/// the requested minimum counts fit in the target length. An options
/// value with every character class disabled is constructible but
/// unusable: the empty-set check happens when the character set is
/// actually requested.
#[derive(Debug, Clone)]
pub struct GeneratePasswordOptions {
    /// Target password length.
    pub length: usize,
    /// Include `A-Z`.
    pub uppercase: bool,
    /// Include `a-z`.
    pub lowercase: bool,
    /// Include `0-9`.
    pub digits: bool,
    /// Include `!@#$%^&*`.
    pub specials: bool,
    /// Minimum number of digit characters.
    pub min_digits: usize,
    /// Minimum number of special characters.
    pub min_specials: usize,
}

impl GeneratePasswordOptions {
    /// Create a validated options value.
    ///
    /// # Errors
    /// [`CryptoError::InvalidOptions`] if `min_digits + min_specials`
    /// exceeds `length`.
    pub fn new(
        length: usize,
        uppercase: bool,
        lowercase: bool,
        digits: bool,
        specials: bool,
        min_digits: usize,
        min_specials: usize,
    ) -> Result<Self> {
        if min_digits + min_specials > length {
            return Err(CryptoError::InvalidOptions(
                "length less than minimum numbers and specials".into(),
            ));
        }

        Ok(Self {
            length,
            uppercase,
            lowercase,
            digits,
            specials,
            min_digits,
            min_specials,
        })
    }

    /// Resolve the combined character set selected by the class flags.
    ///
    /// Classes concatenate in a fixed order: upper, lower, digits,
    /// specials.
    ///
    /// # Errors
    /// [`CryptoError::EmptyCharacterSet`] if no class is enabled.
    pub fn character_set(&self) -> Result<String> {
        let mut set = String::new();
        if self.uppercase {
            set.push_str(UPPERCASE);
        }
        if self.lowercase {
            set.push_str(LOWERCASE);
        }
        if self.digits {
            set.push_str(DIGITS);
        }
        if self.specials {
            set.push_str(SPECIALS);
        }
        if set.is_empty() {
            return Err(CryptoError::EmptyCharacterSet);
        }
        Ok(set)
    }
}

impl Default for GeneratePasswordOptions {
    /// Every character class enabled, length 14, at least one digit and
    /// one special character.
    fn default() -> Self {
        Self {
            length: 14,
            uppercase: true,
            lowercase: true,
            digits: true,
            specials: true,
            min_digits: 1,
            min_specials: 1,
        }
    }
}

/// Generate a cryptographically random password.
///
/// Draws `length` characters from the resolved character set, then
/// overwrites the leading positions to satisfy the minimum counts:
/// positions `0..min_digits` with uniformly drawn digits, positions
/// `min_digits..min_digits + min_specials` with uniformly drawn
/// specials. Every draw uses rejection sampling so each candidate
/// character has exactly equal probability regardless of set size.
///
/// Generation either fully succeeds or returns a single typed error;
/// there is no partial output.
pub fn generate(opts: &GeneratePasswordOptions) -> Result<String> {
    // Guaranteed by construction, re-checked in case of manual mutation
    if opts.min_digits + opts.min_specials > opts.length {
        return Err(CryptoError::InvalidOptions(
            "length less than minimum numbers and specials".into(),
        ));
    }

    let charset: Vec<char> = opts.character_set()?.chars().collect();
    let digits: Vec<char> = DIGITS.chars().collect();
    let specials: Vec<char> = SPECIALS.chars().collect();

    let mut password: Vec<char> = (0..opts.length)
        .map(|_| charset[uniform_index(charset.len())])
        .collect();

    let mut idx = 0;
    for _ in 0..opts.min_digits {
        password[idx] = digits[uniform_index(digits.len())];
        idx += 1;
    }
    for _ in 0..opts.min_specials {
        password[idx] = specials[uniform_index(specials.len())];
        idx += 1;
    }

    Ok(password.into_iter().collect())
}

/// Draw a uniform index in `0..bound` from the system CSPRNG.
///
/// Rejects draws above the largest multiple of `bound` in the u32 range,
/// so the final `% bound` cannot favour low indices when `bound` does
/// not divide the random domain evenly.
fn uniform_index(bound: usize) -> usize {
    debug_assert!(bound > 0 && bound <= u32::MAX as usize);
    let bound = bound as u32;
    let zone = (u32::MAX / bound) * bound;

    loop {
        let mut buf = [0u8; 4];
        OsRng.fill_bytes(&mut buf);
        let draw = u32::from_le_bytes(buf);
        if draw < zone {
            return (draw % bound) as usize;
        }
    }
}
