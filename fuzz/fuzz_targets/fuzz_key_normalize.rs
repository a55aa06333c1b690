#![no_main]

use libfuzzer_sys::fuzz_target;
use zigzag_core::{Key, MAX_KEY_LEN};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Output is always [A-Z]{0,1000}.
    let key = Key::normalize(text);
    assert!(key.len() <= MAX_KEY_LEN);
    assert!(key.as_str().bytes().all(|b| b.is_ascii_uppercase()));

    // Normalizing a key is the identity.
    assert_eq!(Key::normalize(key.as_str()), key);

    // Stats are consistent with the letters.
    let stats = key.stats();
    assert_eq!(stats.length, key.len());
    assert!(stats.duplicate_count < key.len().max(1));
    assert!(stats.missing_count <= 26);
});
