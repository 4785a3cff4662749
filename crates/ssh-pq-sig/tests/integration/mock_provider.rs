//! The adapter over an injected provider.

use crate::common::{mac_key, mac_sig_len, MacProvider, MAX_MAC_SIG_LEN};
use ssh_pq_sig::{
    decode_signature, encode_signature, Algorithm, SignerConfig, SshPqKey, SshPqSigner,
    SshSigError,
};

fn signer() -> SshPqSigner<MacProvider> {
    SshPqSigner::with_provider(MacProvider, SignerConfig::default())
}

#[test]
fn variable_length_signatures_are_framed_exactly() {
    let signer = signer();
    let key = mac_key(Algorithm::Dilithium5, [7; 32]);
    for len in [0usize, 1, 31, 32, 33, 100] {
        let message = vec![0x5A; len];
        let blob = signer
            .sign(Algorithm::Dilithium5, &key, &message)
            .expect("signing should succeed");
        let raw = decode_signature(blob.as_bytes(), "dilithium5").expect("decode should succeed");
        assert_eq!(raw.len(), mac_sig_len(&message));
        assert_eq!(blob.len(), 4 + 4 + 4 + 10 + 4 + raw.len());
        signer
            .verify(Algorithm::Dilithium5, &key, blob.as_bytes(), &message)
            .expect("verification should succeed");
    }
}

#[test]
fn wrong_mac_key_is_signature_invalid() {
    let signer = signer();
    let blob = signer
        .sign(Algorithm::Dilithium2, &mac_key(Algorithm::Dilithium2, [1; 32]), b"m")
        .expect("signing should succeed");
    let other = mac_key(Algorithm::Dilithium2, [2; 32]);
    assert_eq!(
        signer.verify(Algorithm::Dilithium2, &other, blob.as_bytes(), b"m"),
        Err(SshSigError::SignatureInvalid)
    );
}

#[test]
fn signature_at_exact_maximum_reaches_primitive() {
    let signer = signer();
    let key = mac_key(Algorithm::Dilithium3, [3; 32]);
    let blob = encode_signature("dilithium3", &[0u8; MAX_MAC_SIG_LEN])
        .expect("encoding should succeed");
    assert_eq!(
        signer.verify(Algorithm::Dilithium3, &key, blob.as_bytes(), b"m"),
        Err(SshSigError::SignatureInvalid)
    );

    let over = encode_signature("dilithium3", &[0u8; MAX_MAC_SIG_LEN + 1])
        .expect("encoding should succeed");
    assert!(matches!(
        signer.verify(Algorithm::Dilithium3, &key, over.as_bytes(), b"m"),
        Err(SshSigError::InvalidFormat(_))
    ));
}

#[test]
fn wrong_secret_key_length_is_invalid_argument() {
    let signer = signer();
    let key = SshPqKey::from_parts(Algorithm::OqsDefault, Some(&[0u8; 5]), None)
        .expect("key construction should succeed");
    assert!(matches!(
        signer.sign(Algorithm::OqsDefault, &key, b"m"),
        Err(SshSigError::InvalidArgument(_))
    ));
}

#[test]
fn unlocked_scratch_policy_produces_same_blob() {
    let locked = signer();
    let unlocked = SshPqSigner::with_provider(
        MacProvider,
        SignerConfig {
            lock_scratch_memory: false,
            ..SignerConfig::default()
        },
    );
    let key = mac_key(Algorithm::Dilithium2, [9; 32]);
    let a = locked
        .sign(Algorithm::Dilithium2, &key, b"deterministic")
        .expect("signing should succeed");
    let b = unlocked
        .sign(Algorithm::Dilithium2, &key, b"deterministic")
        .expect("signing should succeed");
    assert_eq!(a, b);
}
