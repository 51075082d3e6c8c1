#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(info) = svn_x509::parse_certificate(data) {
        assert_eq!(info.sha1_digest().len(), 40);
    }
});
