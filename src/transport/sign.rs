use sha1::{Digest, Sha1};

/// Compute the request hash.
///
/// Values of the `hash_keys` present in `params` are concatenated in
/// `hash_keys` order (absent keys contribute nothing), the shared secret is
/// appended, and the SHA-1 digest is returned as 40 lowercase hex chars.
pub fn sign(params: &[(String, String)], hash_keys: &[&str], secret: &str) -> String {
    let mut input = String::new();
    for key in hash_keys {
        if let Some((_, value)) = params.iter().find(|(name, _)| name == key) {
            input.push_str(value);
        }
    }
    input.push_str(secret);

    hex::encode(Sha1::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    fn sha1_hex(input: &str) -> String {
        hex::encode(Sha1::digest(input.as_bytes()))
    }

    #[test]
    fn concatenates_values_in_hash_key_order_then_secret() {
        let params = params(&[("currency", "USD"), ("username", "alice")]);
        let hash = sign(&params, &["username", "currency"], "S3cr3t");
        assert_eq!(hash, sha1_hex("aliceUSDS3cr3t"));
    }

    #[test]
    fn absent_keys_are_skipped() {
        let params = params(&[("username", "alice")]);
        assert_eq!(
            sign(&params, &["username", "currency"], "S3cr3t"),
            sign(&params, &["username"], "S3cr3t")
        );
        assert_eq!(
            sign(&params, &["username", "not_sent"], "S3cr3t"),
            sha1_hex("aliceS3cr3t")
        );
    }

    #[test]
    fn empty_hash_keys_hash_the_secret_alone() {
        let params = params(&[("username", "alice")]);
        assert_eq!(sign(&params, &[], "S3cr3t"), sha1_hex("S3cr3t"));
    }

    #[test]
    fn output_is_deterministic_lowercase_hex() {
        let params = params(&[("device", "12"), ("host", "dynamic")]);
        let first = sign(&params, &["device", "host"], "key");
        let second = sign(&params, &["device", "host"], "key");
        assert_eq!(first, second);
        assert_eq!(first.len(), 40);
        assert!(
            first
                .chars()
                .all(|ch| ch.is_ascii_digit() || ('a'..='f').contains(&ch))
        );
    }

    #[test]
    fn empty_input_matches_published_sha1_digest() {
        assert_eq!(sign(&[], &[], ""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(
            sign(&[], &[], "abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }
}
