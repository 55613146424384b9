use crate::Error;

// Characters that are preferred as separators, in order of preference.
const SEPARATOR_CANDIDATES: &str = "cfhistuCFHISTU";

/// The digit alphabet, separators and guards derived from a `Config`.
///
/// The three sets are disjoint.  They are computed once when a `Codec` is
/// created and never modified afterwards.
#[derive(Clone, Debug)]
pub(crate) struct Alphabet {
    pub(crate) digits: Vec<char>,
    pub(crate) separators: Vec<char>,
    pub(crate) guards: Vec<char>,
}

impl Alphabet {
    /// Partitions `alphabet` into digits, separators and guards, shuffled by `salt`.
    ///
    /// The caller must have checked that `alphabet` has at least 16 unique characters
    /// (see `Config::alphabet`).
    pub(crate) fn new(alphabet: &str, salt: &[char]) -> Alphabet {
        let unique = unique_chars(alphabet);

        let mut separators: Vec<char> = SEPARATOR_CANDIDATES
            .chars()
            .filter(|c| unique.contains(c))
            .collect();
        let mut digits: Vec<char> = unique
            .into_iter()
            .filter(|c| !separators.contains(c))
            .collect();

        reorder(&mut separators, salt);

        // Keep at least one separator per 3.5 digits.
        let mut min_separators = (2 * digits.len()).div_ceil(7);
        if separators.len() < min_separators {
            if min_separators == 1 {
                min_separators = 2;
            }
            let borrow = (min_separators - separators.len()).min(digits.len());
            separators.extend(digits.drain(..borrow));
        }

        reorder(&mut digits, salt);

        let num_guards = digits.len().div_ceil(12);
        let guards: Vec<char> = if digits.len() < 3 {
            let num_guards = num_guards.min(separators.len());
            separators.drain(..num_guards).collect()
        } else {
            digits.drain(..num_guards).collect()
        };

        Alphabet {
            digits,
            separators,
            guards,
        }
    }
}

/// The characters of `alphabet` with repeats removed, in order of first occurrence.
pub(crate) fn unique_chars(alphabet: &str) -> Vec<char> {
    let mut unique: Vec<char> = Vec::with_capacity(alphabet.len());
    for c in alphabet.chars() {
        if !unique.contains(&c) {
            unique.push(c);
        }
    }
    unique
}

/// Shuffles `chars` in place, deterministically driven by `salt`.
///
/// An empty salt leaves `chars` untouched.
pub(crate) fn reorder(chars: &mut [char], salt: &[char]) {
    if salt.is_empty() {
        return;
    }

    let mut cursor = 0;
    let mut sum = 0usize;
    for i in (1..chars.len()).rev() {
        let code = salt[cursor] as usize;
        sum += code;
        let j = (code + cursor + sum) % i;
        chars.swap(i, j);
        cursor = (cursor + 1) % salt.len();
    }
}

/// Writes `number` as a numeral in base `alphabet.len()`, most significant digit first.
pub(crate) fn hash(mut number: u64, alphabet: &[char]) -> Vec<char> {
    let radix = alphabet.len() as u64;
    let mut hashed = Vec::new();
    loop {
        hashed.push(alphabet[(number % radix) as usize]);
        number /= radix;
        if number == 0 {
            break;
        }
    }
    hashed.reverse();
    hashed
}

/// Inverse of `hash`.
pub(crate) fn unhash(hashed: &[char], alphabet: &[char]) -> Result<u64, Error> {
    let radix = alphabet.len() as u64;
    hashed.iter().try_fold(0u64, |number, c| {
        let position = alphabet
            .iter()
            .position(|a| a == c)
            .ok_or(Error::UnknownSymbol)?;
        // A value that does not fit in u64 can never have been produced by `encode`.
        number
            .checked_mul(radix)
            .and_then(|n| n.checked_add(position as u64))
            .ok_or(Error::ChecksumMismatch)
    })
}
