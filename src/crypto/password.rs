use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::CryptoError;

/// Iteration count for new hashes. Test builds use a small count so the
/// suite stays fast; stored hashes carry their own count.
pub const PBKDF2_ITERATIONS: u32 = if cfg!(test) { 1_000 } else { 210_000 };
pub const HASH_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 16;

const SCHEME: &str = "pbkdf2-sha256";

/// Hash a password with PBKDF2-HMAC-SHA256 and a fresh random salt.
///
/// Output format: `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>`.
pub fn hash_password(password: &str) -> Result<String, CryptoError> {
    if password.is_empty() {
        return Err(CryptoError::EmptyPassword);
    }
    let salt = generate_salt();
    let hash = derive(password, &salt, PBKDF2_ITERATIONS);
    Ok(format!(
        "{SCHEME}${PBKDF2_ITERATIONS}${}${}",
        BASE64.encode(salt),
        BASE64.encode(hash.as_slice())
    ))
}

/// Check `password` against a hash produced by [`hash_password`].
/// Comparison is constant-time.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, CryptoError> {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(CryptoError::MalformedHash);
    };
    if scheme != SCHEME {
        return Err(CryptoError::MalformedHash);
    }
    let iterations: u32 = iterations.parse().map_err(|_| CryptoError::MalformedHash)?;
    if iterations == 0 {
        return Err(CryptoError::MalformedHash);
    }
    let salt = BASE64.decode(salt).map_err(|_| CryptoError::MalformedHash)?;
    let expected = BASE64.decode(expected).map_err(|_| CryptoError::MalformedHash)?;
    if expected.len() != HASH_LENGTH {
        return Err(CryptoError::MalformedHash);
    }

    let actual = derive(password, &salt, iterations);
    Ok(actual.as_slice().ct_eq(&expected).into())
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; HASH_LENGTH]> {
    let mut out = Zeroizing::new([0u8; HASH_LENGTH]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, out.as_mut_slice());
    out
}

fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let stored = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &stored).unwrap());
        assert!(!verify_password("wrong horse", &stored).unwrap());
    }

    #[test]
    fn hash_is_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("pbkdf2-sha256$"));
    }

    #[test]
    fn hash_never_contains_plaintext() {
        let stored = hash_password("plaintext-secret").unwrap();
        assert!(!stored.contains("plaintext-secret"));
    }

    #[test]
    fn empty_password_rejected() {
        assert!(matches!(hash_password(""), Err(CryptoError::EmptyPassword)));
    }

    #[test]
    fn stored_iteration_count_is_honoured() {
        let salt = [7u8; SALT_LENGTH];
        let hash = derive("pw", &salt, 5);
        let stored = format!(
            "pbkdf2-sha256$5${}${}",
            BASE64.encode(salt),
            BASE64.encode(hash.as_slice())
        );
        assert!(verify_password("pw", &stored).unwrap());
    }

    #[test]
    fn malformed_hashes_rejected() {
        for bad in [
            "",
            "plain",
            "pbkdf2-sha256$abc$AAAA$AAAA",
            "pbkdf2-sha256$0$AAAA$AAAA",
            "bcrypt$10$AAAA$AAAA",
            "pbkdf2-sha256$10$!!!$AAAA",
            "pbkdf2-sha256$10$AAAA$AAAA$extra",
        ] {
            assert!(
                matches!(verify_password("pw", bad), Err(CryptoError::MalformedHash)),
                "accepted {bad:?}"
            );
        }
    }
}
