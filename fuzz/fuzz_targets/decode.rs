#![no_main]
use hashids_rs::{Codec, Config};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let codec = Codec::new(&Config::new("random-salt").min_length(8));
    let _ = codec.decode(&String::from_utf8_lossy(data));
});
