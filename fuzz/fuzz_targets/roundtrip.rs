#![no_main]
use hashids_rs::{Codec, Config};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|values: Vec<u64>| {
    let codec = Codec::new(&Config::new("random-salt").min_length(8));
    let encoded = codec.encode(values.as_slice());
    if values.is_empty() {
        assert!(encoded.is_empty());
    } else {
        assert_eq!(codec.decode(&encoded), values);
    }
});
