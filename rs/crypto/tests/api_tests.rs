use assert_matches::assert_matches;
use bcy_crypto::{
    sig, unmarshal_ec_public_key, CryptoError, CurveId, EcdsaPrivateKey, EcdsaPublicKey,
    RsaPublicKeyView,
};
use bcy_crypto_internal_curves::lookup;
use bcy_crypto_test_utils_reproducible_rng::reproducible_rng;
use num_bigint::BigUint;
use rand::Rng;
use sha2::{Digest, Sha256};

fn random_digest<R: Rng>(rng: &mut R) -> Vec<u8> {
    let mut message = [0u8; 48];
    rng.fill(&mut message[..]);
    Sha256::digest(message).to_vec()
}

mod sign_and_verify {
    use super::*;

    #[test]
    fn should_round_trip_many_digests_on_every_curve() {
        let mut rng = reproducible_rng();
        for curve_id in CurveId::all() {
            let key = EcdsaPrivateKey::generate(curve_id).unwrap();
            for _ in 0..20 {
                let digest = random_digest(&mut rng);
                let signature = key.sign(&digest).unwrap();
                assert_eq!(
                    key.public_key().verify(&signature, &digest),
                    Ok(true),
                    "round trip failed on {}",
                    curve_id
                );
            }
        }
    }

    #[test]
    fn should_produce_only_low_s_signatures() {
        let mut rng = reproducible_rng();
        let key = EcdsaPrivateKey::generate(CurveId::P256).unwrap();
        let curve = lookup(CurveId::P256);
        for _ in 0..32 {
            let digest = random_digest(&mut rng);
            let signature = key.sign(&digest).unwrap();
            let (_, s) = sig::decode(&signature).unwrap();
            assert!(sig::is_low_s(&s, curve));
        }
    }

    #[test]
    fn should_reject_a_high_s_signature_with_the_policy_error() {
        let mut rng = reproducible_rng();
        let key = EcdsaPrivateKey::generate(CurveId::P256).unwrap();
        let curve = lookup(CurveId::P256);
        let digest = random_digest(&mut rng);

        let signature = key.sign(&digest).unwrap();
        let (r, s) = sig::decode(&signature).unwrap();

        // (r, n - s) satisfies the raw ECDSA equation just as well, so the
        // rejection below is purely the canonical-form policy.
        let high_s = &curve.n - &s;
        assert!(!sig::is_low_s(&high_s, curve));
        let malleated = sig::encode(&r, &high_s).unwrap();

        assert_eq!(
            key.public_key().verify(&malleated, &digest),
            Err(CryptoError::HighSSignature)
        );
    }

    #[test]
    fn should_distinguish_malformed_from_high_s_from_invalid() {
        let mut rng = reproducible_rng();
        let key = EcdsaPrivateKey::generate(CurveId::P256).unwrap();
        let digest = random_digest(&mut rng);
        let signature = key.sign(&digest).unwrap();

        // undecodable bytes: malformed
        assert_matches!(
            key.public_key().verify(b"junk", &digest),
            Err(CryptoError::MalformedSignature(_))
        );

        // valid encoding, wrong digest: cryptographically invalid, not an error
        let other_digest = random_digest(&mut rng);
        assert_eq!(key.public_key().verify(&signature, &other_digest), Ok(false));
    }

    #[test]
    fn should_sign_and_verify_hello_world_on_p256() {
        let key = EcdsaPrivateKey::generate(CurveId::P256).unwrap();
        let digest = Sha256::digest(b"hello world");
        let signature = key.sign(&digest).unwrap();
        assert_eq!(key.public_key().verify(&signature, &digest), Ok(true));

        let curve = lookup(CurveId::P256);
        let (r, s) = sig::decode(&signature).unwrap();
        let malleated = sig::encode(&r, &(&curve.n - &s)).unwrap();
        assert_eq!(
            key.public_key().verify(&malleated, &digest),
            Err(CryptoError::HighSSignature)
        );
    }

    #[test]
    fn should_expose_the_raw_signature_pair() {
        let mut rng = reproducible_rng();
        let key = EcdsaPrivateKey::generate(CurveId::P384).unwrap();
        let curve = lookup(CurveId::P384);
        let digest = random_digest(&mut rng);
        let (r, s) = key.sign_raw(&digest).unwrap();
        assert!(r > BigUint::from(0u8) && s > BigUint::from(0u8));
        assert!(r < curve.n && s < curve.n);
    }
}

mod ski {
    use super::*;

    #[test]
    fn should_be_stable_across_calls_and_distinct_across_keys() {
        let k1 = EcdsaPrivateKey::generate(CurveId::P256).unwrap();
        let k2 = EcdsaPrivateKey::generate(CurveId::P256).unwrap();
        assert_eq!(k1.ski(), k1.ski());
        assert!(k1.ski().is_some());
        assert_ne!(k1.ski(), k2.ski());
    }

    #[test]
    fn should_match_between_a_private_key_and_its_public_half() {
        let key = EcdsaPrivateKey::generate(CurveId::P521).unwrap();
        assert_eq!(key.ski(), key.public_key().ski());
    }

    #[test]
    fn should_be_absent_for_a_nil_key() {
        let nil = EcdsaPublicKey::wrap(CurveId::P256, BigUint::from(0u8), BigUint::from(0u8));
        assert_eq!(nil.ski(), None);
    }
}

mod marshal {
    use super::*;
    use simple_asn1::{oid, to_der, ASN1Block};

    #[test]
    fn should_round_trip_public_keys_through_pkix_on_every_curve() {
        for curve_id in CurveId::all() {
            let key = EcdsaPrivateKey::generate(curve_id).unwrap();
            let der = key.public_key().marshal_pkix().unwrap();
            let recovered = unmarshal_ec_public_key(&der).unwrap();
            assert_eq!(&recovered, key.public_key(), "mismatch on {}", curve_id);
        }
    }

    #[test]
    fn should_reject_an_off_curve_public_key() {
        let bogus = EcdsaPublicKey::wrap(CurveId::P256, BigUint::from(1u8), BigUint::from(2u8));
        assert_matches!(bogus.marshal_pkix(), Err(CryptoError::InvalidPoint));
    }

    #[test]
    fn should_reject_an_unregistered_curve_oid() {
        // SubjectPublicKeyInfo claiming secp256k1, which is not registered
        let point = vec![0x04u8; 65];
        let algorithm = ASN1Block::Sequence(
            0,
            vec![
                ASN1Block::ObjectIdentifier(0, oid!(1, 2, 840, 10045, 2, 1)),
                ASN1Block::ObjectIdentifier(0, oid!(1, 3, 132, 0, 10)),
            ],
        );
        let spki = ASN1Block::Sequence(
            0,
            vec![algorithm, ASN1Block::BitString(0, point.len() * 8, point)],
        );
        let der = to_der(&spki).unwrap();
        assert_matches!(
            unmarshal_ec_public_key(&der),
            Err(CryptoError::UnsupportedCurve)
        );
    }

    #[test]
    fn should_reject_an_off_curve_point_in_valid_pkix_framing() {
        let key = EcdsaPrivateKey::generate(CurveId::P256).unwrap();
        let mut der = key.public_key().marshal_pkix().unwrap();
        // corrupt the last coordinate byte
        let last = der.len() - 1;
        der[last] ^= 0x01;
        assert_matches!(
            unmarshal_ec_public_key(&der),
            Err(CryptoError::InvalidPoint)
        );
    }
}

mod rsa {
    use super::*;

    #[test]
    fn should_marshal_and_identify_an_rsa_public_key() {
        let key = RsaPublicKeyView::new(
            BigUint::parse_bytes(
                b"c0f2c6c8a26e1b0b9b8f2e2f8e8d5a4b3c2d1e0f9e8d7c6b5a4938271605",
                16,
            )
            .unwrap(),
            BigUint::from(65537u32),
        );
        let der = key.marshal_pkcs1().unwrap();
        assert_eq!(der[0], 0x30);
        assert_eq!(key.ski(), key.ski());
        assert!(key.ski().is_some());
    }

    #[test]
    fn should_identify_distinct_rsa_keys_distinctly() {
        let k1 = RsaPublicKeyView::new(BigUint::from(3233u32), BigUint::from(17u32));
        let k2 = RsaPublicKeyView::new(BigUint::from(3233u32), BigUint::from(65537u32));
        assert_ne!(k1.ski(), k2.ski());
    }
}

mod canonicalization_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn to_low_s_is_idempotent_and_bounded(bytes in proptest::collection::vec(any::<u8>(), 1..32)) {
            let curve = lookup(CurveId::P256);
            let s = BigUint::from_bytes_be(&bytes) % &curve.n;
            let low = sig::to_low_s(s, curve);
            prop_assert!(sig::is_low_s(&low, curve));
            prop_assert_eq!(sig::to_low_s(low.clone(), curve), low);
        }

        #[test]
        fn decode_never_panics_on_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let _ = sig::decode(&bytes);
        }
    }
}
