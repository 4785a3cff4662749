//! ML-DSA (FIPS 204) Known-Answer Tests.
//!
//! Pins the provider to `libcrux-ml-dsa` itself: keys derived from a seed
//! match the library's, and signatures cross-verify in both directions with
//! the empty context string.

use libcrux_ml_dsa::{ml_dsa_44, ml_dsa_65, ml_dsa_87};
use ssh_pq_sig::{
    encode_signature, Algorithm, KeyMaterial, LibcruxProvider, MlDsaLevel, SshPqSigner,
};

/// ML-DSA-65 verification key prefix from `[0xAA; 32]`, as produced by
/// libcrux-ml-dsa 0.0.6. A failure here means the keygen algorithm changed.
#[rustfmt::skip]
const ML_DSA_65_VK_PREFIX_AA: [u8; 16] = [
    0x2A, 0x3C, 0xD5, 0x53, 0x79, 0x10, 0x45, 0xA9,
    0x36, 0x33, 0x93, 0xC3, 0xF7, 0x20, 0x86, 0x60,
];

#[test]
fn ml_dsa_65_verification_key_pinned_prefix() {
    let key = LibcruxProvider::default()
        .generate_keypair_from_seed(Algorithm::Dilithium3, [0xAA; 32])
        .expect("keygen should succeed");
    let vk = key.public_handle().expect("public handle");
    assert_eq!(
        &vk[..16],
        &ML_DSA_65_VK_PREFIX_AA,
        "ML-DSA-65 verification key prefix must match pinned value (libcrux-ml-dsa 0.0.6)"
    );
}

/// Seeded keygen matches the library for every parameter set.
#[test]
fn seeded_keys_match_libcrux() {
    let seed = [0x5E_u8; 32];
    let provider = LibcruxProvider::default();

    let ours = provider
        .generate_keypair_from_seed(Algorithm::Dilithium2, seed)
        .expect("keygen should succeed");
    let kp = ml_dsa_44::generate_key_pair(seed);
    assert_eq!(ours.public_handle().expect("public handle"), &kp.verification_key.as_ref()[..]);
    assert_eq!(ours.secret_handle().expect("secret handle"), &kp.signing_key.as_slice()[..]);

    let ours = provider
        .generate_keypair_from_seed(Algorithm::Dilithium3, seed)
        .expect("keygen should succeed");
    let kp = ml_dsa_65::generate_key_pair(seed);
    assert_eq!(ours.public_handle().expect("public handle"), &kp.verification_key.as_ref()[..]);
    assert_eq!(ours.secret_handle().expect("secret handle"), &kp.signing_key.as_slice()[..]);

    let ours = provider
        .generate_keypair_from_seed(Algorithm::Dilithium5, seed)
        .expect("keygen should succeed");
    let kp = ml_dsa_87::generate_key_pair(seed);
    assert_eq!(ours.public_handle().expect("public handle"), &kp.verification_key.as_ref()[..]);
    assert_eq!(ours.secret_handle().expect("secret handle"), &kp.signing_key.as_slice()[..]);
}

/// The `oqsdefault` key type shares ML-DSA-44 keys unless reconfigured.
#[test]
fn oqsdefault_keys_are_ml_dsa_44() {
    let seed = [0x0D_u8; 32];
    let ours = LibcruxProvider::default()
        .generate_keypair_from_seed(Algorithm::OqsDefault, seed)
        .expect("keygen should succeed");
    let kp = ml_dsa_44::generate_key_pair(seed);
    assert_eq!(ours.public_handle().expect("public handle"), &kp.verification_key.as_ref()[..]);

    let ours87 = LibcruxProvider::new(MlDsaLevel::MlDsa87)
        .generate_keypair_from_seed(Algorithm::OqsDefault, seed)
        .expect("keygen should succeed");
    let kp87 = ml_dsa_87::generate_key_pair(seed);
    assert_eq!(ours87.public_handle().expect("public handle"), &kp87.verification_key.as_ref()[..]);
}

/// A signature made directly with libcrux and an empty context verifies
/// through the adapter once framed.
#[test]
fn libcrux_signature_verifies_through_adapter() {
    let seed = [0x71_u8; 32];
    let kp = ml_dsa_65::generate_key_pair(seed);
    let sig = ml_dsa_65::sign(&kp.signing_key, b"interop", b"", [0x72; 32])
        .expect("signing should succeed");

    let blob = encode_signature("dilithium3", sig.as_ref()).expect("encoding should succeed");
    let signer = SshPqSigner::default();
    let key = signer
        .provider()
        .generate_keypair_from_seed(Algorithm::Dilithium3, seed)
        .expect("keygen should succeed");
    signer
        .verify(Algorithm::Dilithium3, &key.public_only(), blob.as_bytes(), b"interop")
        .expect("verification should succeed");
}

/// A signature with a non-empty context does not verify: SSH signatures
/// carry no context string.
#[test]
fn nonempty_context_signature_is_rejected() {
    let seed = [0x73_u8; 32];
    let kp = ml_dsa_44::generate_key_pair(seed);
    let sig = ml_dsa_44::sign(&kp.signing_key, b"interop", b"ssh", [0x74; 32])
        .expect("signing should succeed");

    let blob = encode_signature("dilithium2", sig.as_ref()).expect("encoding should succeed");
    let signer = SshPqSigner::default();
    let key = signer
        .provider()
        .generate_keypair_from_seed(Algorithm::Dilithium2, seed)
        .expect("keygen should succeed");
    assert!(signer
        .verify(Algorithm::Dilithium2, &key, blob.as_bytes(), b"interop")
        .is_err());
}

/// Adapter signatures verify directly with libcrux and an empty context.
#[test]
fn adapter_signature_verifies_with_libcrux() {
    let seed = [0x75_u8; 32];
    let signer = SshPqSigner::default();
    let key = signer
        .provider()
        .generate_keypair_from_seed(Algorithm::Dilithium5, seed)
        .expect("keygen should succeed");
    let blob = signer
        .sign(Algorithm::Dilithium5, &key, b"interop")
        .expect("signing should succeed");
    let raw = ssh_pq_sig::decode_signature(blob.as_bytes(), "dilithium5")
        .expect("decode should succeed");

    let kp = ml_dsa_87::generate_key_pair(seed);
    let raw: [u8; 4627] = raw.try_into().expect("ML-DSA-87 signature length");
    let sig = ml_dsa_87::MLDSA87Signature::new(raw);
    ml_dsa_87::verify(&kp.verification_key, b"interop", b"", &sig)
        .expect("verification should succeed");
}

/// Signing randomness is fresh per call: two signatures of the same
/// message differ, and both verify.
#[test]
fn signatures_are_randomized() {
    let signer = SshPqSigner::default();
    let key = signer
        .provider()
        .generate_keypair(Algorithm::Dilithium2)
        .expect("keygen should succeed");
    let a = signer
        .sign(Algorithm::Dilithium2, &key, b"same message")
        .expect("signing should succeed");
    let b = signer
        .sign(Algorithm::Dilithium2, &key, b"same message")
        .expect("signing should succeed");
    assert_ne!(a, b);
    for blob in [&a, &b] {
        signer
            .verify(Algorithm::Dilithium2, &key, blob.as_bytes(), b"same message")
            .expect("verification should succeed");
    }
}
