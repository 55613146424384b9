//! `hashids` turns sequences of non-negative integers into short, salted strings and back,
//! and offers a generic field type to conveniently manage the process with Serde and Diesel.
//!
//! This library is primarily designed to hide raw database IDs in your API.  The encoded
//! strings don't reveal the order or magnitude of the numbers behind them, and the same
//! numbers encode to different strings under different salts.  You can still enjoy the
//! performance benefits of using monotonically increasing integers as your database keys.
//!
//! The output is compatible with the [hashids](https://hashids.org/) algorithm, so strings
//! produced by other implementations with the same salt, alphabet and minimum length decode
//! to the same numbers.
//!
//! Please note that this is obfuscation, not encryption.  Anyone who knows the salt can
//! decode your IDs, and the salt can be recovered from enough encoded strings.  Do not use
//! hashids where guessing an ID must be impossible.
//!
//! # Usage
//!
//! ##  Generic `Field` API
//!
//! Use the generic `Field` type to define a type for each type of object you're exposing
//! in your public APIs.  The `Field` type supports automatic encoding and decoding with Serde,
//! and with Diesel when the `diesel` feature is enabled.
//!
//! ```
//! use hashids_rs;
//! use serde::{Serialize, Deserialize};
//! use serde_json;
//!
//! // Define the ExampleId field type.  The type marker defines the string prefix.
//! #[derive(Debug)]
//! pub struct ExampleIdMarker;
//! impl hashids_rs::TypeMarker for ExampleIdMarker {
//!     fn name() -> &'static str { "example" }
//! }
//!
//! type ExampleId = hashids_rs::Field<ExampleIdMarker>;
//!
//! // The field can then be used in structs, and works automatically with Serde.
//! #[derive(serde::Serialize)]
//! struct Example {
//!     pub id: ExampleId,
//! }
//!
//! hashids_rs::Config::set_global(hashids_rs::Config::new("your salt"));
//! let obj = Example {id: ExampleId::from(12345)};
//! let obj_str = serde_json::to_string(&obj).unwrap();
//! assert_eq!(obj_str, "{\"id\":\"example_1AgZ\"}");
//! ```

//!
//! ## Low level API
//!
//! `Codec` provides a simple API to encode and decode sequences of integers.
//!
//! ```
//! use hashids_rs::{Codec, Config};
//!
//! let codec = Codec::new(&Config::new("Arbitrary string"));
//! let encoded = codec.encode(&[683, 94108, 123, 5]);
//! let decoded = codec.decode(&encoded);
//! assert_eq!(encoded, "QWyf8yboH7KT2");
//! assert_eq!(decoded, vec![683, 94108, 123, 5]);
//! ```
//!

mod alphabet;
mod codec;
mod config;
mod field;

pub use codec::{Codec, Error};
pub use config::{Config, ConfigError, DEFAULT_ALPHABET};
pub use field::{Field, TypeMarker};
