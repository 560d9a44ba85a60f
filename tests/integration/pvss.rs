//! End-to-end tests for the secret sharing protocol.

use rand::{seq::IteratorRandom, thread_rng, Rng};
use rand_chacha::ChaChaRng;
use rand_core::{CryptoRng, RngCore, SeedableRng};

use crate::assert_ct_eq;
use dhpvss::{
    group::Group,
    pvss::{self, DecryptionProof, DhpvssParams, Secret, SharingProof},
    Error, Keypair, PublicKey, SecretKey,
};

struct Rig<G: Group> {
    params: DhpvssParams<G>,
    secret: Secret<G>,
    dealer: Keypair<G>,
    recipient: Keypair<G>,
    parties: Vec<Keypair<G>>,
}

impl<G: Group> Rig<G> {
    fn new(parties: usize, threshold: usize, rng: &mut (impl RngCore + CryptoRng)) -> Self {
        let (params, secret) = pvss::setup::<G, _>(parties, threshold, 128, rng).unwrap();
        Self {
            params,
            secret,
            dealer: Keypair::generate(rng),
            recipient: Keypair::generate(rng),
            parties: (0..parties).map(|_| Keypair::generate(rng)).collect(),
        }
    }

    fn party_keys(&self) -> Vec<PublicKey<G>> {
        self.parties.iter().map(|party| party.public().clone()).collect()
    }

    fn secret_keys(&self) -> Vec<SecretKey<G>> {
        self.parties.iter().map(|party| party.secret().clone()).collect()
    }

    fn share(
        &self,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> (Vec<G::Element>, SharingProof<G>) {
        pvss::share(
            &self.params,
            self.recipient.public(),
            &self.dealer,
            &self.party_keys(),
            &self.secret,
            rng,
        )
        .unwrap()
    }

    fn verify(&self, ciphertexts: &[G::Element], proof: &SharingProof<G>) -> bool {
        pvss::verify(
            &self.params,
            self.dealer.public(),
            self.recipient.public(),
            ciphertexts,
            &self.party_keys(),
            proof,
        )
        .unwrap()
    }

    fn pre_reconstruct(
        &self,
        ciphertexts: &[G::Element],
        rng: &mut (impl RngCore + CryptoRng),
    ) -> (Vec<G::Element>, DecryptionProof<G>) {
        pvss::pre_reconstruct(
            &self.params,
            self.dealer.public(),
            &self.party_keys(),
            &self.secret_keys(),
            ciphertexts,
            rng,
        )
        .unwrap()
    }

    fn verify_decryption(
        &self,
        ciphertexts: &[G::Element],
        partial_decryptions: &[G::Element],
        proof: &DecryptionProof<G>,
    ) -> bool {
        pvss::verify_decryption(
            &self.params,
            self.dealer.public(),
            &self.party_keys(),
            ciphertexts,
            partial_decryptions,
            proof,
        )
        .unwrap()
    }

    fn reconstruct(
        &self,
        partial_decryptions: &[G::Element],
        indexes: &[usize],
    ) -> Result<G::Element, Error> {
        pvss::reconstruct(
            &self.params,
            partial_decryptions,
            self.dealer.public(),
            self.recipient.secret(),
            indexes,
        )
    }
}

fn test_end_to_end_for_every_subset<G: Group>() {
    let mut rng = thread_rng();
    let rig = Rig::<G>::new(10, 6, &mut rng);
    let (ciphertexts, proof) = rig.share(&mut rng);
    assert!(rig.verify(&ciphertexts, &proof));

    let (partial_decryptions, dec_proof) = rig.pre_reconstruct(&ciphertexts, &mut rng);
    assert!(rig.verify_decryption(&ciphertexts, &partial_decryptions, &dec_proof));

    let expected = rig.secret.to_element();
    for mask in 0_u32..(1 << 10) {
        let indexes: Vec<_> = (0..10).filter(|&i| mask & (1 << i) != 0).collect();
        let result = rig.reconstruct(&partial_decryptions, &indexes);
        if indexes.len() < 6 {
            assert!(matches!(result, Err(Error::InsufficientShares { .. })));
        } else {
            assert_ct_eq(&result.unwrap(), &expected);
        }
    }
}

fn test_threshold_boundary<G: Group>() {
    let mut rng = thread_rng();
    let rig = Rig::<G>::new(7, 4, &mut rng);
    let (ciphertexts, _) = rig.share(&mut rng);
    let (partial_decryptions, _) = rig.pre_reconstruct(&ciphertexts, &mut rng);

    let indexes: Vec<_> = (0..7).choose_multiple(&mut rng, 3);
    let err = rig.reconstruct(&partial_decryptions, &indexes).unwrap_err();
    assert!(matches!(
        err,
        Error::InsufficientShares {
            required: 4,
            provided: 3
        }
    ));

    let indexes: Vec<_> = (0..7).choose_multiple(&mut rng, 4);
    let restored = rig.reconstruct(&partial_decryptions, &indexes).unwrap();
    assert_ct_eq(&restored, &rig.secret.to_element());
}

fn test_subsets_agree<G: Group>() {
    let mut rng = thread_rng();
    let rig = Rig::<G>::new(5, 3, &mut rng);
    let (ciphertexts, _) = rig.share(&mut rng);
    let (partial_decryptions, _) = rig.pre_reconstruct(&ciphertexts, &mut rng);

    let first = rig.reconstruct(&partial_decryptions, &[0, 1, 2]).unwrap();
    let second = rig.reconstruct(&partial_decryptions, &[1, 3, 4]).unwrap();
    assert_ct_eq(&first, &second);
    assert_ct_eq(&first, &rig.secret.to_element());
}

fn test_tampered_ciphertexts<G: Group>() {
    let mut rng = thread_rng();
    let rig = Rig::<G>::new(6, 3, &mut rng);
    let (ciphertexts, proof) = rig.share(&mut rng);
    assert!(rig.verify(&ciphertexts, &proof));

    let mut tampered = ciphertexts.clone();
    let index = rng.gen_range(0..6);
    tampered[index] = tampered[index] + G::generator();
    assert!(!rig.verify(&tampered, &proof));

    let mut swapped = ciphertexts;
    swapped.swap(0, 5);
    assert!(!rig.verify(&swapped, &proof));
}

fn test_tampered_keys<G: Group>() {
    let mut rng = thread_rng();
    let rig = Rig::<G>::new(6, 4, &mut rng);
    let (ciphertexts, proof) = rig.share(&mut rng);
    let other_key = Keypair::<G>::generate(&mut rng).into_tuple().0;
    let party_keys = rig.party_keys();

    let verify = |dealer_key: &PublicKey<G>,
                  recipient_key: &PublicKey<G>,
                  party_keys: &[PublicKey<G>]| {
        pvss::verify(
            &rig.params,
            dealer_key,
            recipient_key,
            &ciphertexts,
            party_keys,
            &proof,
        )
        .unwrap()
    };
    assert!(verify(rig.dealer.public(), rig.recipient.public(), &party_keys));
    assert!(!verify(&other_key, rig.recipient.public(), &party_keys));
    assert!(!verify(rig.dealer.public(), &other_key, &party_keys));

    let mut other_party_keys = party_keys;
    other_party_keys[2] = other_key;
    assert!(!verify(rig.dealer.public(), rig.recipient.public(), &other_party_keys));
}

fn test_tampered_partial_decryptions<G: Group>() {
    let mut rng = thread_rng();
    let rig = Rig::<G>::new(8, 5, &mut rng);
    let (ciphertexts, _) = rig.share(&mut rng);
    let (mut partial_decryptions, dec_proof) = rig.pre_reconstruct(&ciphertexts, &mut rng);
    assert!(rig.verify_decryption(&ciphertexts, &partial_decryptions, &dec_proof));

    let index = rng.gen_range(0..8);
    partial_decryptions[index] = partial_decryptions[index] + G::generator();
    assert!(!rig.verify_decryption(&ciphertexts, &partial_decryptions, &dec_proof));

    let invalid = pvss::invalid_decryptions(
        &rig.params,
        rig.dealer.public(),
        &rig.party_keys(),
        &ciphertexts,
        &partial_decryptions,
        &dec_proof,
    )
    .unwrap();
    assert_eq!(invalid, [index]);

    // Decryptions of the honest parties are still sufficient.
    let indexes: Vec<_> = (0..8).filter(|&i| i != index).take(5).collect();
    let restored = rig.reconstruct(&partial_decryptions, &indexes).unwrap();
    assert_ct_eq(&restored, &rig.secret.to_element());

    // ...while including the tampered decryption leads to a wrong result.
    let mut indexes: Vec<_> = (0..8).filter(|&i| i != index).take(4).collect();
    indexes.push(index);
    let restored = rig.reconstruct(&partial_decryptions, &indexes).unwrap();
    assert_ne!(restored, rig.secret.to_element());
}

fn test_wrong_recipient_secret<G: Group>() {
    let mut rng = thread_rng();
    let rig = Rig::<G>::new(4, 2, &mut rng);
    let (ciphertexts, _) = rig.share(&mut rng);
    let (partial_decryptions, _) = rig.pre_reconstruct(&ciphertexts, &mut rng);

    let other_secret = SecretKey::<G>::generate(&mut rng);
    let restored = pvss::reconstruct(
        &rig.params,
        &partial_decryptions,
        rig.dealer.public(),
        &other_secret,
        &[0, 3],
    )
    .unwrap();
    assert_ne!(restored, rig.secret.to_element());
}

fn test_length_mismatches<G: Group>() {
    let mut rng = thread_rng();
    let rig = Rig::<G>::new(5, 3, &mut rng);
    let (ciphertexts, proof) = rig.share(&mut rng);

    let err = pvss::verify(
        &rig.params,
        rig.dealer.public(),
        rig.recipient.public(),
        &ciphertexts[..4],
        &rig.party_keys(),
        &proof,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::LengthMismatch {
            collection: "ciphertexts",
            expected: 5,
            actual: 4,
        }
    ));

    let err = pvss::verify(
        &rig.params,
        rig.dealer.public(),
        rig.recipient.public(),
        &ciphertexts,
        &rig.party_keys()[1..],
        &proof,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::LengthMismatch {
            collection: "party keys",
            ..
        }
    ));

    let (partial_decryptions, _) = rig.pre_reconstruct(&ciphertexts, &mut rng);
    let err = rig
        .reconstruct(&partial_decryptions, &[0, 1, 5])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidIndex { index: 5, parties: 5 }));
    let err = rig
        .reconstruct(&partial_decryptions, &[0, 2, 2])
        .unwrap_err();
    assert!(matches!(err, Error::DegenerateInput));
}

fn test_deterministic_sharing<G: Group>() {
    let run = |seed: u64| {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        let rig = Rig::<G>::new(5, 3, &mut rng);
        let (ciphertexts, proof) = rig.share(&mut rng);
        let (partial_decryptions, dec_proof) = rig.pre_reconstruct(&ciphertexts, &mut rng);
        (ciphertexts, proof.to_bytes(), partial_decryptions, dec_proof.to_bytes())
    };

    let (ciphertexts, proof, partial_decryptions, dec_proof) = run(42);
    let (other_ciphertexts, other_proof, other_decryptions, other_dec_proof) = run(42);
    assert_eq!(ciphertexts, other_ciphertexts);
    assert_eq!(proof, other_proof);
    assert_eq!(partial_decryptions, other_decryptions);
    assert_eq!(dec_proof, other_dec_proof);

    let (ciphertexts_for_other_seed, ..) = run(43);
    assert_ne!(ciphertexts, ciphertexts_for_other_seed);
}

fn test_proofs_survive_byte_roundtrip<G: Group>() {
    let mut rng = thread_rng();
    let rig = Rig::<G>::new(6, 3, &mut rng);
    let (ciphertexts, proof) = rig.share(&mut rng);
    let proof = SharingProof::<G>::from_bytes(&proof.to_bytes()).unwrap();
    assert!(rig.verify(&ciphertexts, &proof));

    let (partial_decryptions, dec_proof) = rig.pre_reconstruct(&ciphertexts, &mut rng);
    let dec_proof = DecryptionProof::<G>::from_bytes(&dec_proof.to_bytes()).unwrap();
    assert_eq!(dec_proof.len(), 6);
    assert!(rig.verify_decryption(&ciphertexts, &partial_decryptions, &dec_proof));
}

fn tiny_fuzz<G: Group>(parties: usize, threshold: usize) {
    let mut rng = thread_rng();
    let rig = Rig::<G>::new(parties, threshold, &mut rng);
    let (ciphertexts, proof) = rig.share(&mut rng);
    assert!(rig.verify(&ciphertexts, &proof));
    let (partial_decryptions, dec_proof) = rig.pre_reconstruct(&ciphertexts, &mut rng);
    assert!(rig.verify_decryption(&ciphertexts, &partial_decryptions, &dec_proof));

    let expected = rig.secret.to_element();
    for _ in 0..5 {
        let count = rng.gen_range(threshold..=parties);
        let indexes = (0..parties).choose_multiple(&mut rng, count);
        let restored = rig.reconstruct(&partial_decryptions, &indexes).unwrap();
        assert_ct_eq(&restored, &expected);
    }
}

#[cfg(feature = "serde")]
fn test_serde_roundtrip<G: Group>() {
    let mut rng = thread_rng();
    let rig = Rig::<G>::new(5, 3, &mut rng);
    let (ciphertexts, proof) = rig.share(&mut rng);
    let (partial_decryptions, dec_proof) = rig.pre_reconstruct(&ciphertexts, &mut rng);

    let params_json = serde_json::to_value(&rig.params).unwrap();
    assert_eq!(params_json, serde_json::json!({ "parties": 5, "threshold": 3 }));
    let params: DhpvssParams<G> = serde_json::from_value(params_json).unwrap();
    assert_eq!(params.coefficients(), rig.params.coefficients());

    let invalid_params = serde_json::json!({ "parties": 5, "threshold": 6 });
    assert!(serde_json::from_value::<DhpvssParams<G>>(invalid_params).is_err());

    let proof_json = serde_json::to_string(&proof).unwrap();
    let proof: SharingProof<G> = serde_json::from_str(&proof_json).unwrap();
    assert!(rig.verify(&ciphertexts, &proof));

    let dec_proof_json = serde_json::to_string(&dec_proof).unwrap();
    let dec_proof: DecryptionProof<G> = serde_json::from_str(&dec_proof_json).unwrap();
    assert!(rig.verify_decryption(&ciphertexts, &partial_decryptions, &dec_proof));

    let dealer_key_json = serde_json::to_string(rig.dealer.public()).unwrap();
    let dealer_key: PublicKey<G> = serde_json::from_str(&dealer_key_json).unwrap();
    assert_eq!(dealer_key, *rig.dealer.public());
}

mod ristretto {
    use super::*;
    use dhpvss::group::Ristretto;

    #[test]
    fn end_to_end_for_every_subset() {
        test_end_to_end_for_every_subset::<Ristretto>();
    }

    #[test]
    fn threshold_boundary() {
        test_threshold_boundary::<Ristretto>();
    }

    #[test]
    fn subsets_agree() {
        test_subsets_agree::<Ristretto>();
    }

    #[test]
    fn tampered_ciphertexts() {
        test_tampered_ciphertexts::<Ristretto>();
    }

    #[test]
    fn tampered_keys() {
        test_tampered_keys::<Ristretto>();
    }

    #[test]
    fn tampered_partial_decryptions() {
        test_tampered_partial_decryptions::<Ristretto>();
    }

    #[test]
    fn wrong_recipient_secret() {
        test_wrong_recipient_secret::<Ristretto>();
    }

    #[test]
    fn length_mismatches() {
        test_length_mismatches::<Ristretto>();
    }

    #[test]
    fn deterministic_sharing() {
        test_deterministic_sharing::<Ristretto>();
    }

    #[test]
    fn proofs_survive_byte_roundtrip() {
        test_proofs_survive_byte_roundtrip::<Ristretto>();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip() {
        test_serde_roundtrip::<Ristretto>();
    }

    #[test]
    fn fuzz_2_of_2() {
        tiny_fuzz::<Ristretto>(2, 2);
    }

    #[test]
    fn fuzz_3_of_5() {
        tiny_fuzz::<Ristretto>(5, 3);
    }

    #[test]
    fn fuzz_5_of_5() {
        tiny_fuzz::<Ristretto>(5, 5);
    }

    #[test]
    fn fuzz_7_of_10() {
        tiny_fuzz::<Ristretto>(10, 7);
    }

    #[test]
    fn fuzz_10_of_15() {
        tiny_fuzz::<Ristretto>(15, 10);
    }

    #[test]
    fn fuzz_14_of_20() {
        tiny_fuzz::<Ristretto>(20, 14);
    }
}

mod k256 {
    use super::*;
    use dhpvss::group::Generic;

    type K256 = Generic<::k256::Secp256k1>;

    #[test]
    fn end_to_end_for_every_subset() {
        test_end_to_end_for_every_subset::<K256>();
    }

    #[test]
    fn threshold_boundary() {
        test_threshold_boundary::<K256>();
    }

    #[test]
    fn subsets_agree() {
        test_subsets_agree::<K256>();
    }

    #[test]
    fn tampered_ciphertexts() {
        test_tampered_ciphertexts::<K256>();
    }

    #[test]
    fn tampered_keys() {
        test_tampered_keys::<K256>();
    }

    #[test]
    fn tampered_partial_decryptions() {
        test_tampered_partial_decryptions::<K256>();
    }

    #[test]
    fn wrong_recipient_secret() {
        test_wrong_recipient_secret::<K256>();
    }

    #[test]
    fn length_mismatches() {
        test_length_mismatches::<K256>();
    }

    #[test]
    fn deterministic_sharing() {
        test_deterministic_sharing::<K256>();
    }

    #[test]
    fn proofs_survive_byte_roundtrip() {
        test_proofs_survive_byte_roundtrip::<K256>();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip() {
        test_serde_roundtrip::<K256>();
    }

    #[test]
    fn fuzz_3_of_5() {
        tiny_fuzz::<K256>(5, 3);
    }

    #[test]
    fn fuzz_6_of_6() {
        tiny_fuzz::<K256>(6, 6);
    }

    #[test]
    fn fuzz_12_of_20() {
        tiny_fuzz::<K256>(20, 12);
    }
}
