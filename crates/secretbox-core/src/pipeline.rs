//! Encrypt and decrypt pipelines.
//!
//! Encrypt: read → validate JSON → seal → base64 → wrap → write.
//! Decrypt: read → unwrap → base64 → unseal → validate JSON → write.
//!
//! There are no retries; the first failure ends the run.

use std::path::Path;

use crate::entropy::Entropy;
use crate::envelope;
use crate::error::{Result, SecretBoxError};
use crate::fs::{read_text, write_atomic};
use crate::invocation::{Invocation, Mode};
use crate::json::is_valid_json;
use crate::seal::{Scope, Sealer};

/// Seal a JSON document into envelope text.
///
/// The sealer is not called unless `document` is valid JSON.
pub fn seal_document<S: Sealer + ?Sized>(
    sealer: &S,
    scope: &Scope,
    document: &str,
    entropy: Option<&Entropy>,
) -> Result<String> {
    if !is_valid_json(document) {
        return Err(SecretBoxError::InputNotJson);
    }
    let sealed = sealer.seal(document.as_bytes(), entropy.map(Entropy::as_bytes), scope)?;
    Ok(envelope::encode(&sealed))
}

/// Recover the JSON document from envelope text.
///
/// Base64 and unseal failures both surface as
/// [`SecretBoxError::UnsealFailed`] so callers cannot tell which step failed.
pub fn unseal_envelope<S: Sealer + ?Sized>(
    sealer: &S,
    scope: &Scope,
    envelope_text: &str,
    entropy: Option<&Entropy>,
) -> Result<String> {
    let sealed = envelope::decode(envelope_text).map_err(|e| {
        tracing::debug!(error = %e, "envelope is not base64");
        SecretBoxError::UnsealFailed
    })?;
    let plaintext = sealer
        .unseal(&sealed, entropy.map(Entropy::as_bytes), scope)
        .map_err(|e| {
            tracing::debug!(error = %e, "unseal failed");
            SecretBoxError::UnsealFailed
        })?;

    let document =
        String::from_utf8(plaintext).map_err(|_| SecretBoxError::DecryptedContentNotJson)?;
    if !is_valid_json(&document) {
        return Err(SecretBoxError::DecryptedContentNotJson);
    }
    Ok(document)
}

/// Encrypt the JSON file at `input` into an envelope file at `output`.
pub fn encrypt_file<S: Sealer + ?Sized>(
    sealer: &S,
    scope: &Scope,
    input: &Path,
    output: &Path,
    entropy: Option<&Entropy>,
) -> Result<()> {
    let document = read_text(input)?.ok_or(SecretBoxError::InputNotJson)?;
    let envelope_text = seal_document(sealer, scope, &document, entropy)?;
    write_atomic(output, envelope_text.as_bytes())?;
    tracing::debug!(output = %output.display(), bytes = envelope_text.len(), "wrote envelope");
    Ok(())
}

/// Decrypt the envelope file at `input` into a JSON file at `output`.
pub fn decrypt_file<S: Sealer + ?Sized>(
    sealer: &S,
    scope: &Scope,
    input: &Path,
    output: &Path,
    entropy: Option<&Entropy>,
) -> Result<()> {
    let envelope_text = read_text(input)?.ok_or(SecretBoxError::UnsealFailed)?;
    let document = unseal_envelope(sealer, scope, &envelope_text, entropy)?;
    write_atomic(output, document.as_bytes())?;
    tracing::debug!(output = %output.display(), bytes = document.len(), "wrote document");
    Ok(())
}

/// Execute a validated invocation.
pub fn run<S: Sealer + ?Sized>(sealer: &S, scope: &Scope, invocation: &Invocation) -> Result<()> {
    let entropy = invocation.entropy.as_ref();
    match invocation.mode {
        Mode::Encrypt => encrypt_file(sealer, scope, &invocation.input, &invocation.output, entropy),
        Mode::Decrypt => decrypt_file(sealer, scope, &invocation.input, &invocation.output, entropy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::entropy::parse_hex;

    /// Reversible stand-in that records how often it was called.
    #[derive(Default)]
    struct XorSealer {
        calls: Cell<usize>,
    }

    impl XorSealer {
        fn mask(bytes: &[u8], entropy: Option<&[u8]>, scope: &Scope) -> Vec<u8> {
            let salt = entropy.map(|e| e.iter().fold(0u8, |a, b| a ^ b)).unwrap_or(0x5A)
                ^ scope.account().len() as u8;
            bytes.iter().map(|b| b ^ salt ^ 0xA5).collect()
        }
    }

    impl Sealer for XorSealer {
        fn seal(&self, plaintext: &[u8], entropy: Option<&[u8]>, scope: &Scope) -> Result<Vec<u8>> {
            self.calls.set(self.calls.get() + 1);
            Ok(Self::mask(plaintext, entropy, scope))
        }

        fn unseal(&self, sealed: &[u8], entropy: Option<&[u8]>, scope: &Scope) -> Result<Vec<u8>> {
            self.calls.set(self.calls.get() + 1);
            Ok(Self::mask(sealed, entropy, scope))
        }
    }

    /// Unseal that always fails with an internal-looking error.
    struct BrokenSealer;

    impl Sealer for BrokenSealer {
        fn seal(&self, plaintext: &[u8], _: Option<&[u8]>, _: &Scope) -> Result<Vec<u8>> {
            Ok(plaintext.to_vec())
        }

        fn unseal(&self, _: &[u8], _: Option<&[u8]>, _: &Scope) -> Result<Vec<u8>> {
            Err(SecretBoxError::KeyStore("backend exploded".to_string()))
        }
    }

    fn scope() -> Scope {
        Scope::new("secretbox-test", "alice")
    }

    #[test]
    fn test_round_trip_preserves_text() {
        let sealer = XorSealer::default();
        let document = "{ \"a\" : [1, 2.5, \"ü\"] }\n";

        let envelope_text = seal_document(&sealer, &scope(), document, None).unwrap();
        let recovered = unseal_envelope(&sealer, &scope(), &envelope_text, None).unwrap();
        assert_eq!(recovered, document);
    }

    #[test]
    fn test_non_json_never_reaches_sealer() {
        let sealer = XorSealer::default();
        let err = seal_document(&sealer, &scope(), "{not json", None).unwrap_err();
        assert!(matches!(err, SecretBoxError::InputNotJson));
        assert_eq!(sealer.calls.get(), 0);
    }

    #[test]
    fn test_bad_base64_is_unseal_failure() {
        let sealer = XorSealer::default();
        let err = unseal_envelope(&sealer, &scope(), "@@@@", None).unwrap_err();
        assert!(matches!(err, SecretBoxError::UnsealFailed));
        assert_eq!(sealer.calls.get(), 0);
    }

    #[test]
    fn test_sealer_errors_are_merged() {
        let envelope_text = seal_document(&BrokenSealer, &scope(), "{}", None).unwrap();
        let err = unseal_envelope(&BrokenSealer, &scope(), &envelope_text, None).unwrap_err();
        assert!(matches!(err, SecretBoxError::UnsealFailed));
        assert!(!err.to_string().contains("exploded"));
    }

    #[test]
    fn test_wrong_content_is_distinct_failure() {
        let sealer = XorSealer::default();
        let envelope_text = seal_document(&sealer, &scope(), "{\"a\":1}", None).unwrap();

        // A different account length changes the mask, so the bytes come back wrong.
        let other = Scope::new("secretbox-test", "mallory");
        let err = unseal_envelope(&sealer, &other, &envelope_text, None).unwrap_err();
        assert!(matches!(err, SecretBoxError::DecryptedContentNotJson));
    }

    #[test]
    fn test_entropy_is_passed_through() {
        let sealer = XorSealer::default();
        let entropy = parse_hex("0F").unwrap();
        let envelope_text = seal_document(&sealer, &scope(), "[]", Some(&entropy)).unwrap();

        assert_eq!(
            unseal_envelope(&sealer, &scope(), &envelope_text, Some(&entropy)).unwrap(),
            "[]"
        );
        assert!(unseal_envelope(&sealer, &scope(), &envelope_text, None).is_err());
    }

    #[test]
    fn test_run_dispatches_on_mode() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.json");
        let sealed = dir.path().join("sealed.txt");
        let restored = dir.path().join("restored.json");
        std::fs::write(&plain, "{\"a\":1}").unwrap();

        let sealer = XorSealer::default();
        let encrypt = Invocation::new("encrypt", &plain, &sealed, None).unwrap();
        run(&sealer, &scope(), &encrypt).unwrap();

        let decrypt = Invocation::new("decrypt", &sealed, &restored, None).unwrap();
        run(&sealer, &scope(), &decrypt).unwrap();

        assert_eq!(std::fs::read_to_string(&restored).unwrap(), "{\"a\":1}");
        assert_eq!(sealer.calls.get(), 2);
    }
}
