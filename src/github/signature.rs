use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";
const SIGNATURE_PREFIX: &str = "sha256=";

/// Verifies `X-Hub-Signature-256` headers against a shared webhook secret.
pub struct SignatureValidator {
    secret: SecretString,
}

impl SignatureValidator {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    fn mac(&self, body: &[u8]) -> Option<HmacSha256> {
        // HMAC accepts keys of any length, so this only fails on a broken build of the crate.
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes()).ok()?;
        mac.update(body);
        Some(mac)
    }

    /// Header value a sender holding the same secret would attach to `body`.
    pub fn sign(&self, body: &[u8]) -> Option<String> {
        let digest = self.mac(body)?.finalize().into_bytes();
        Some(format!("{}{}", SIGNATURE_PREFIX, hex::encode(digest)))
    }

    /// `body` must be the raw request bytes, not a re-serialized payload.
    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> bool {
        let Some(signature) = signature.filter(|s| !s.is_empty()) else {
            return false;
        };
        let Some(hex_digest) = signature.strip_prefix(SIGNATURE_PREFIX) else {
            return false;
        };
        // Senders emit lowercase hex; anything else is not the header we would produce.
        if !hex_digest
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return false;
        }
        let Ok(expected) = hex::decode(hex_digest) else {
            return false;
        };
        let Some(mac) = self.mac(body) else {
            return false;
        };
        mac.verify_slice(&expected).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(secret: &str) -> SignatureValidator {
        SignatureValidator::new(SecretString::from(secret.to_string()))
    }

    #[test]
    fn signs_with_prefixed_hex_digest() {
        // RFC 4231 test case 2.
        let v = validator("Jefe");
        assert_eq!(
            v.sign(b"what do ya want for nothing?").unwrap(),
            "sha256=5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn accepts_own_signature() {
        let v = validator("It's a Secret to Everybody");
        let body = br#"{"action":"push","ref":"refs/heads/main"}"#;
        let header = v.sign(body).unwrap();
        assert!(v.verify(body, Some(&header)));
    }

    #[test]
    fn any_body_mutation_invalidates() {
        let v = validator("s3cret");
        let body = br#"{"action":"pull_request","pull_request":{"id":42}}"#.to_vec();
        let header = v.sign(&body).unwrap();

        for i in 0..body.len() {
            let mut mutated = body.clone();
            mutated[i] ^= 0x01;
            assert!(!v.verify(&mutated, Some(&header)), "byte {} mutation accepted", i);
        }
    }

    #[test]
    fn any_header_mutation_invalidates() {
        let v = validator("s3cret");
        let body = b"{}";
        let header = v.sign(body).unwrap().into_bytes();

        for i in 0..header.len() {
            let mut mutated = header.clone();
            mutated[i] ^= 0x01;
            let mutated = String::from_utf8_lossy(&mutated).into_owned();
            assert!(!v.verify(body, Some(&mutated)), "header byte {} mutation accepted", i);
        }
    }

    #[test]
    fn rejects_missing_or_empty_header() {
        let v = validator("s3cret");
        assert!(!v.verify(b"{}", None));
        assert!(!v.verify(b"{}", Some("")));
        assert!(!v.verify(b"", None));
    }

    #[test]
    fn rejects_uppercase_and_unprefixed_digests() {
        let v = validator("s3cret");
        let body = b"payload";
        let header = v.sign(body).unwrap();
        let digest = header.trim_start_matches(SIGNATURE_PREFIX);

        assert!(!v.verify(body, Some(digest)));
        assert!(!v.verify(body, Some(&format!("sha256={}", digest.to_uppercase()))));
        assert!(!v.verify(body, Some(&format!("sha1={}", digest))));
    }

    #[test]
    fn different_secret_is_rejected() {
        let body = b"payload";
        let header = validator("one").sign(body).unwrap();
        assert!(!validator("two").verify(body, Some(&header)));
    }
}
