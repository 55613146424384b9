use std::fmt;
use std::iter;

use tracing::{debug, trace};

use crate::alphabet::{hash, reorder, unhash, Alphabet};
use crate::Config;

/// Error returned when a string cannot be decoded.
#[derive(Debug, PartialEq)]
pub enum Error {
    ChecksumMismatch,
    Malformed,
    UnknownSymbol,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ChecksumMismatch => {
                write!(f, "Decoded values do not encode back to the input")
            }
            Error::Malformed => {
                write!(f, "Malformed hashid")
            }
            Error::UnknownSymbol => {
                write!(f, "Character not in alphabet")
            }
        }
    }
}

impl std::error::Error for Error {}

// Hex strings are encoded in chunks of this many digits.
const HEX_CHUNK: usize = 12;

/// Core encoder/decoder.
#[derive(Clone, Debug)]
pub struct Codec {
    alphabet: Alphabet,
    min_length: usize,
    salt: Vec<char>,
}

impl Codec {
    /// Creates a new `Codec` instance from the given configuration.
    ///
    /// The alphabet is split into digits, separators and guards and shuffled with the
    /// salt here, once.  Encoding and decoding never modify the `Codec`, so a single
    /// instance can be shared between threads.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashids_rs::{Codec, Config};
    ///
    /// let codec = Codec::new(&Config::new("this is my salt"));
    /// ```
    pub fn new(config: &Config) -> Codec {
        let salt: Vec<char> = config.salt.chars().collect();
        let alphabet = Alphabet::new(config.alphabet, &salt);
        trace!(
            digits = alphabet.digits.len(),
            separators = alphabet.separators.len(),
            guards = alphabet.guards.len(),
            "partitioned alphabet"
        );
        Codec {
            alphabet,
            min_length: config.min_length,
            salt,
        }
    }

    /// Encodes a sequence of non-negative integers into a string.
    ///
    /// Returns an empty string if `values` is empty or if any value does not fit
    /// in a `u64`, for example a negative number.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashids_rs::{Codec, Config};
    ///
    /// let codec = Codec::new(&Config::new("this is my salt"));
    /// assert_eq!(codec.encode(&[1, 2, 3]), "laHquq");
    /// assert_eq!(codec.encode(&[1, -2, 3]), "");
    /// ```
    pub fn encode<T>(&self, values: &[T]) -> String
    where
        T: Copy + TryInto<u64>,
    {
        let numbers: Option<Vec<u64>> = values.iter().map(|&v| v.try_into().ok()).collect();
        match numbers {
            Some(numbers) if !numbers.is_empty() => self.encode_numbers(&numbers),
            Some(_) => String::new(),
            None => {
                debug!(count = values.len(), "rejected values outside the u64 range");
                String::new()
            }
        }
    }

    fn encode_numbers(&self, numbers: &[u64]) -> String {
        let digits = &self.alphabet.digits;
        let separators = &self.alphabet.separators;

        let checksum: u64 = numbers
            .iter()
            .enumerate()
            .map(|(i, &number)| number % (i as u64 + 100))
            .sum();
        let lottery = digits[(checksum % digits.len() as u64) as usize];

        let mut alphabet = digits.clone();
        let mut encoded = Vec::with_capacity(self.min_length.max(numbers.len() * 4));
        encoded.push(lottery);

        for (i, &number) in numbers.iter().enumerate() {
            self.shuffle_step(&mut alphabet, lottery);
            let hashed = hash(number, &alphabet);
            encoded.extend_from_slice(&hashed);

            if i + 1 < numbers.len() {
                let number = number % (hashed[0] as u64 + i as u64);
                encoded.push(separators[(number % separators.len() as u64) as usize]);
            }
        }

        if encoded.len() < self.min_length {
            encoded = ensure_length(
                encoded,
                self.min_length,
                alphabet,
                &self.alphabet.guards,
                checksum,
            );
        }

        encoded.into_iter().collect()
    }

    // Shuffles the working alphabet for the next value, salted with the lottery character.
    fn shuffle_step(&self, alphabet: &mut [char], lottery: char) {
        let step_salt: Vec<char> = iter::once(lottery)
            .chain(self.salt.iter().copied())
            .chain(alphabet.iter().copied())
            .take(alphabet.len())
            .collect();
        reorder(alphabet, &step_salt);
    }

    /// Decodes a previously encoded string back into its original values.
    ///
    /// Returns an empty vector for anything that was not produced by `encode` with
    /// the same configuration.  Use `try_decode` to learn why decoding failed.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashids_rs::{Codec, Config};
    ///
    /// let codec = Codec::new(&Config::new("this is my salt"));
    /// assert_eq!(codec.decode("laHquq"), vec![1, 2, 3]);
    /// assert_eq!(codec.decode("laHquw"), Vec::<u64>::new());
    /// ```
    pub fn decode(&self, encoded: &str) -> Vec<u64> {
        self.try_decode(encoded).unwrap_or_else(|err| {
            debug!(error = %err, "rejected hashid");
            Vec::new()
        })
    }

    /// Decodes a previously encoded string back into its original values.
    ///
    /// The decoded values are encoded again and compared to `encoded`, so any string
    /// that `encode` could not have produced is rejected.
    pub fn try_decode(&self, encoded: &str) -> Result<Vec<u64>, Error> {
        let chars: Vec<char> = encoded.chars().collect();

        // Guards only appear as padding around the actual value.
        let parts: Vec<&[char]> = chars
            .split(|c| self.alphabet.guards.contains(c))
            .collect();
        let hashid = match parts.len() {
            2 | 3 => parts[1],
            _ => parts[0],
        };

        let (&lottery, body) = hashid.split_first().ok_or(Error::Malformed)?;

        let mut alphabet = self.alphabet.digits.clone();
        let mut numbers = Vec::new();
        for segment in body.split(|c| self.alphabet.separators.contains(c)) {
            if segment.is_empty() {
                return Err(Error::Malformed);
            }
            self.shuffle_step(&mut alphabet, lottery);
            numbers.push(unhash(segment, &alphabet)?);
        }

        if self.encode_numbers(&numbers) != encoded {
            return Err(Error::ChecksumMismatch);
        }
        Ok(numbers)
    }

    /// Encodes a string of hex digits.
    ///
    /// The digits are split into groups of 12, each prefixed with `1` so that leading
    /// zeros survive the round trip.  Returns an empty string if `hex` is empty or
    /// contains anything but hex digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashids_rs::{Codec, Config};
    ///
    /// let codec = Codec::new(&Config::default());
    /// assert_eq!(codec.encode_hex("deadbeef"), "wpVL4j9g");
    /// assert_eq!(codec.decode_hex("wpVL4j9g"), "deadbeef");
    /// ```
    pub fn encode_hex(&self, hex: &str) -> String {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            debug!("rejected non-hex input");
            return String::new();
        }

        let numbers: Result<Vec<u64>, _> = hex
            .as_bytes()
            .chunks(HEX_CHUNK)
            .map(|chunk| {
                let digits: String = iter::once('1')
                    .chain(chunk.iter().map(|&b| b as char))
                    .collect();
                u64::from_str_radix(&digits, 16)
            })
            .collect();
        match numbers {
            Ok(numbers) => self.encode(numbers.as_slice()),
            Err(_) => String::new(),
        }
    }

    /// Decodes a string produced by `encode_hex` back into hex digits.
    ///
    /// Returns an empty string if decoding fails.
    pub fn decode_hex(&self, encoded: &str) -> String {
        let mut hex = String::new();
        for number in self.decode(encoded) {
            // Drop the leading '1' added by `encode_hex`.
            let digits = format!("{:x}", number);
            hex.push_str(&digits[1..]);
        }
        hex
    }
}

// Pads `encoded` to exactly `min_length` characters, first with guards and then by
// wrapping it in halves of the repeatedly shuffled alphabet.
fn ensure_length(
    mut encoded: Vec<char>,
    min_length: usize,
    mut alphabet: Vec<char>,
    guards: &[char],
    checksum: u64,
) -> Vec<char> {
    let guard = |c: char| guards[((checksum + c as u64) % guards.len() as u64) as usize];

    let front = guard(encoded[0]);
    encoded.insert(0, front);
    if encoded.len() < min_length {
        let back = guard(encoded[2]);
        encoded.push(back);
    }

    let half = alphabet.len() / 2;
    while encoded.len() < min_length {
        let salt = alphabet.clone();
        reorder(&mut alphabet, &salt);

        let mut wrapped = Vec::with_capacity(alphabet.len() + encoded.len());
        wrapped.extend_from_slice(&alphabet[half..]);
        wrapped.extend_from_slice(&encoded);
        wrapped.extend_from_slice(&alphabet[..half]);

        let excess = wrapped.len().saturating_sub(min_length);
        if excess > 0 {
            wrapped.drain(..excess / 2);
            wrapped.truncate(min_length);
        }
        encoded = wrapped;
    }

    encoded
}
