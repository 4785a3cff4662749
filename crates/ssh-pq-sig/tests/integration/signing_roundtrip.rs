//! Integration tests for ML-DSA SSH signatures.
//!
//! Full sign → verify roundtrips through [`SshPqSigner`] for every key type,
//! with realistic message sizes, cross-key rejection, and error kinds.

use ssh_pq_sig::{
    decode_signature, Algorithm, KeyMaterial, LibcruxProvider, MlDsaLevel, SignerConfig,
    SshPqKey, SshPqSigner, SshSigError,
};

fn keypair(alg: Algorithm) -> SshPqKey {
    LibcruxProvider::default()
        .generate_keypair(alg)
        .expect("keygen should succeed")
}

/// Every key type signs and verifies a short message.
#[test]
fn roundtrip_every_algorithm() {
    let signer = SshPqSigner::default();
    for alg in Algorithm::ALL {
        let key = keypair(alg);
        let blob = signer
            .sign(alg, &key, b"SSH_MSG_USERAUTH_REQUEST")
            .expect("signing should succeed");
        signer
            .verify(alg, &key, blob.as_bytes(), b"SSH_MSG_USERAUTH_REQUEST")
            .expect("verification should succeed");
    }
}

/// Empty message signs and verifies.
#[test]
fn roundtrip_empty_message() {
    let signer = SshPqSigner::default();
    let key = keypair(Algorithm::Dilithium2);
    let blob = signer
        .sign(Algorithm::Dilithium2, &key, b"")
        .expect("signing should succeed");
    signer
        .verify(Algorithm::Dilithium2, &key, blob.as_bytes(), b"")
        .expect("verification should succeed");
}

/// Roundtrip with a 1 MB payload.
#[test]
fn roundtrip_1mb_message() {
    let signer = SshPqSigner::default();
    let key = keypair(Algorithm::Dilithium5);
    let message = vec![0xCD_u8; 1_048_576];

    let blob = signer
        .sign(Algorithm::Dilithium5, &key, &message)
        .expect("signing should succeed");
    signer
        .verify(Algorithm::Dilithium5, &key, blob.as_bytes(), &message)
        .expect("verification should succeed");
}

/// A verification-only copy of the key verifies what the full key signed.
#[test]
fn public_only_key_verifies() {
    let signer = SshPqSigner::default();
    let key = keypair(Algorithm::Dilithium3);
    let blob = signer
        .sign(Algorithm::Dilithium3, &key, b"host key proof")
        .expect("signing should succeed");
    signer
        .verify(Algorithm::Dilithium3, &key.public_only(), blob.as_bytes(), b"host key proof")
        .expect("verification should succeed");
}

/// Raw signature length matches the parameter set behind each key type.
#[test]
fn raw_signature_length_matches_parameter_set() {
    let provider = LibcruxProvider::default();
    let signer = SshPqSigner::default();
    for alg in Algorithm::ALL {
        let key = keypair(alg);
        let blob = signer.sign(alg, &key, b"len").expect("signing should succeed");
        let raw = decode_signature(blob.as_bytes(), alg.wire_name()).expect("decode");
        assert_eq!(raw.len(), provider.level_for(alg.provider_alg()).signature_len());
    }
}

/// The configured default scheme drives the `oqsdefault` key type.
#[test]
fn configured_default_scheme_is_used() {
    let config = SignerConfig {
        default_scheme: MlDsaLevel::MlDsa65,
        lock_scratch_memory: false,
    };
    let signer = SshPqSigner::new(config);
    let key = signer
        .provider()
        .generate_keypair(Algorithm::OqsDefault)
        .expect("keygen should succeed");
    assert_eq!(
        key.public_handle().map(<[u8]>::len),
        Some(MlDsaLevel::MlDsa65.verification_key_len())
    );

    let blob = signer
        .sign(Algorithm::OqsDefault, &key, b"default")
        .expect("signing should succeed");
    let raw = decode_signature(blob.as_bytes(), "oqsdefault").expect("decode");
    assert_eq!(raw.len(), MlDsaLevel::MlDsa65.signature_len());
    signer
        .verify(Algorithm::OqsDefault, &key, blob.as_bytes(), b"default")
        .expect("verification should succeed");
}

/// Cross-key rejection: sign with key A, verify with key B.
#[test]
fn cross_keypair_verification_fails() {
    let signer = SshPqSigner::default();
    let key_a = keypair(Algorithm::Dilithium2);
    let key_b = keypair(Algorithm::Dilithium2);

    let blob = signer
        .sign(Algorithm::Dilithium2, &key_a, b"signed with key A")
        .expect("signing should succeed");
    let result = signer.verify(Algorithm::Dilithium2, &key_b, blob.as_bytes(), b"signed with key A");

    assert_eq!(result, Err(SshSigError::SignatureInvalid));
}

/// A key of the wrong parameter set is just another failed verification.
#[test]
fn key_of_other_parameter_set_is_signature_invalid() {
    let signer = SshPqSigner::default();
    let key2 = keypair(Algorithm::Dilithium2);
    let key3 = keypair(Algorithm::Dilithium3);

    let blob = signer
        .sign(Algorithm::Dilithium2, &key2, b"m")
        .expect("signing should succeed");
    let result = signer.verify(Algorithm::Dilithium2, &key3, blob.as_bytes(), b"m");
    assert_eq!(result, Err(SshSigError::SignatureInvalid));
}

/// Signing with a secret key of the wrong length is an invalid argument.
#[test]
fn sign_with_wrong_secret_length_is_invalid_argument() {
    let signer = SshPqSigner::default();
    let key = SshPqKey::from_parts(Algorithm::Dilithium2, Some(&[0u8; 31]), None)
        .expect("key construction should succeed");
    let result = signer.sign(Algorithm::Dilithium2, &key, b"m");
    assert!(matches!(result, Err(SshSigError::InvalidArgument(_))));
}

/// Lookup by SSH key type name reaches the same binding.
#[test]
fn sign_and_verify_by_key_type_name() {
    let signer = SshPqSigner::default();
    let key = keypair(Algorithm::Dilithium3);
    let blob = signer
        .sign_by_name("ssh-dilithium3", &key, b"by name")
        .expect("signing should succeed");
    signer
        .verify_by_name("dilithium3", &key, blob.as_bytes(), b"by name")
        .expect("verification should succeed");
}

/// One signer serves concurrent callers with distinct keys.
#[test]
fn concurrent_callers_do_not_interfere() {
    let signer = SshPqSigner::default();
    std::thread::scope(|s| {
        for alg in Algorithm::ALL {
            let signer = &signer;
            s.spawn(move || {
                let key = keypair(alg);
                for i in 0u8..4 {
                    let msg = [i; 16];
                    let blob = signer.sign(alg, &key, &msg).expect("signing should succeed");
                    signer
                        .verify(alg, &key, blob.as_bytes(), &msg)
                        .expect("verification should succeed");
                }
            });
        }
    });
}
