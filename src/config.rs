use std::fmt;
use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::alphabet::unique_chars;

static GLOBAL_CONFIG: Lazy<Mutex<Option<Config<'static>>>> = Lazy::new(|| Mutex::new(None));

/// The alphabet used unless another one is configured.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

// Minimum number of unique characters in an alphabet.
const MIN_ALPHABET_LENGTH: usize = 16;

/// Configuring the hashids library.
#[derive(Clone, Debug)]
pub struct Config<'a> {
    pub(crate) alphabet: &'a str,
    pub(crate) min_length: usize,
    pub(crate) salt: &'a str,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    AlphabetContainsSpace,
    AlphabetTooShort { unique: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::AlphabetContainsSpace => {
                write!(f, "Alphabet cannot contain spaces")
            }
            ConfigError::AlphabetTooShort { unique } => {
                write!(
                    f,
                    "Alphabet has {} unique characters, at least {} required",
                    unique, MIN_ALPHABET_LENGTH
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl<'a> Config<'a> {
    /// Creates a new configuration with the given `salt` and other settings in
    /// default values.
    /// - `min_length` defaults to 0, meaning encoded strings are never padded.
    /// - `alphabet` defaults to `DEFAULT_ALPHABET`, the 62 ASCII letters and digits.
    ///
    /// The salt can be any string, including the empty string.  Changing it changes
    /// every encoded string.
    pub fn new(salt: &'a str) -> Self {
        Config {
            alphabet: DEFAULT_ALPHABET,
            min_length: 0,
            salt,
        }
    }

    /// Sets the minimum length of encoded strings.  Shorter strings are padded.
    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Sets the alphabet encoded strings are made of.
    /// The alphabet must have at least 16 unique characters and no spaces.  Repeated
    /// characters are ignored.
    pub fn alphabet(mut self, alphabet: &'a str) -> Result<Self, ConfigError> {
        let unique = unique_chars(alphabet);

        if unique.len() < MIN_ALPHABET_LENGTH {
            debug!(unique = unique.len(), "rejected alphabet, too few characters");
            return Err(ConfigError::AlphabetTooShort {
                unique: unique.len(),
            });
        }
        if unique.contains(&' ') {
            debug!("rejected alphabet, contains a space");
            return Err(ConfigError::AlphabetContainsSpace);
        }

        self.alphabet = alphabet;
        Ok(self)
    }

    /// Sets the global configuration. This should be called before the `Field` type methods
    /// are called.
    pub fn set_global(config: Config<'static>) {
        let mut global_config = GLOBAL_CONFIG
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *global_config = Some(config);
    }

    /// Accesses the global configuration, if set.
    pub fn global() -> Option<Config<'static>> {
        GLOBAL_CONFIG
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for Config<'_> {
    fn default() -> Self {
        Config::new("")
    }
}
