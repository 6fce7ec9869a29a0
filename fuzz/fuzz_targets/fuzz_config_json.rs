//! Fuzz the config parser: arbitrary JSON must parse-or-reject without
//! panicking, and anything that parses must survive validate().

#![no_main]

use libfuzzer_sys::fuzz_target;

use gatewise::config::SystemConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = SystemConfig::from_json(text) {
        let _ = config.validate();
    }
});
