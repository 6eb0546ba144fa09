#[cfg(test)]
mod tests {
    use crate::digest::{compute_digest, encode_value, verify, Digest, SecretKey};

    fn key_0_to_31() -> Vec<u8> {
        (0u8..32).collect()
    }

    #[test]
    fn value_encoding_is_decimal_ascii() {
        assert_eq!(encode_value(0), b"0");
        assert_eq!(encode_value(7), b"7");
        assert_eq!(encode_value(42), b"42");
        assert_eq!(encode_value(u64::MAX), b"18446744073709551615");
    }

    #[test]
    fn hmac_sha3_256_known_answers() {
        // Cross-checked with an independent HMAC-SHA3-256 implementation.
        let key = key_0_to_31();
        assert_eq!(
            compute_digest(&key, 0).unwrap().to_hex(),
            "55a4eb56b278d72e3dcb2b77c20b0a0295c21ff0fe05fc033ceecf51fd23d13d"
        );
        assert_eq!(
            compute_digest(&key, 5).unwrap().to_hex(),
            "3dc99afd04d5e7adead1ac01e26a6868f2e1f22dfd72e6285b3452d20b3fddc0"
        );
        assert_eq!(
            compute_digest(&key, 42).unwrap().to_hex(),
            "2e1a03d43d6c73e5416fbfc20179d458063d971e191d89ea7b62c7347c941594"
        );
        assert_eq!(
            compute_digest(&[0xab; 40], 1).unwrap().to_hex(),
            "463d707d77bd32b138b35f3e403d431100020d2304acc78499a3edbf593bf4c6"
        );
    }

    #[test]
    fn any_key_length_is_accepted() {
        // Empty and longer-than-block keys go through the same fallible path.
        assert_eq!(
            compute_digest(&[], 0).unwrap().to_hex(),
            "da4801ef75e4405c4ac2ce6d3b5f94fd88a7c1e3c9958079aa456a44f60d95e4"
        );
        let long = [0x11u8; 200];
        let d = compute_digest(&long, 7).unwrap();
        assert_eq!(
            d.to_hex(),
            "f789d679a20f547bfbec5c798f33edba94e78b2d1b96c99b2810283832ec5275"
        );
        assert!(verify(&long, 7, &d));
    }

    #[test]
    fn verify_accepts_only_the_committed_value() {
        let key = key_0_to_31();
        let d = compute_digest(&key, 5).unwrap();
        assert!(verify(&key, 5, &d));
        assert!(!verify(&key, 4, &d));
        let mut other = key.clone();
        other[0] ^= 1;
        assert!(!verify(&other, 5, &d));
    }

    #[test]
    fn digest_hex_is_64_lowercase_chars() {
        let hex = compute_digest(&key_0_to_31(), 3).unwrap().to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn digest_hex_parses_back_case_insensitively() {
        let d = compute_digest(&key_0_to_31(), 9).unwrap();
        assert_eq!(Digest::from_hex(&d.to_hex()).unwrap(), d);
        assert_eq!(Digest::from_hex(&d.to_hex().to_uppercase()).unwrap(), d);
        assert!(Digest::from_hex("abcd").is_err());
        assert!(Digest::from_hex("zz").is_err());
    }

    #[test]
    fn secret_key_debug_is_redacted() {
        let key = SecretKey::from_hex("00112233445566778899aabbccddeeff").unwrap();
        assert_eq!(key.len(), 16);
        assert_eq!(key.to_hex(), "00112233445566778899aabbccddeeff");
        let dbg = format!("{key:?}");
        assert!(!dbg.contains("0011"), "{dbg}");
    }
}
