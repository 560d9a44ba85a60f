//! Partial decryption of shares and its verification.

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use tracing::{debug, instrument, trace};

use super::{DecryptionProof, DhpvssParams};
use crate::{
    alloc::Vec, group::Group, proofs::TranscriptForGroup, Error, LogEqualityProof, PublicKey,
    SecretKey,
};

fn decryption_transcript<G: Group>(
    params: &DhpvssParams<G>,
    dealer_key: &PublicKey<G>,
    index: usize,
    ciphertext: &G::Element,
) -> Transcript {
    let mut transcript = Transcript::new(b"dhpvss_decryption");
    params.commit(&mut transcript);
    transcript.append_element_bytes(b"A", dealer_key.as_bytes());
    transcript.append_u64(b"i", index as u64);
    transcript.append_element::<G>(b"C", ciphertext);
    transcript
}

/// Computes statements `(E_i, C_i - Cp_i)` for the decryption proofs.
fn decryption_statements<G: Group>(
    party_keys: &[PublicKey<G>],
    ciphertexts: &[G::Element],
    partial_decryptions: &[G::Element],
) -> Vec<(G::Element, G::Element)> {
    party_keys
        .iter()
        .zip(ciphertexts.iter().zip(partial_decryptions))
        .map(|(party_key, (&ciphertext, &decryption))| {
            (party_key.as_element(), ciphertext - decryption)
        })
        .collect()
}

fn check_decryption_lengths<G: Group>(
    params: &DhpvssParams<G>,
    party_keys: &[PublicKey<G>],
    ciphertexts: &[G::Element],
    partial_decryptions: &[G::Element],
    proof: &DecryptionProof<G>,
) -> Result<(), Error> {
    let parties = params.parties();
    Error::check_lengths("party keys", parties, party_keys.len())?;
    Error::check_lengths("ciphertexts", parties, ciphertexts.len())?;
    Error::check_lengths("partial decryptions", parties, partial_decryptions.len())?;
    Error::check_lengths("decryption proofs", parties, proof.len())
}

/// Partially decrypts the encrypted share `ciphertext` of the party with the specified
/// 0-based `index`: `Cp_i = C_i - [sk_i]A`.
///
/// Returns the partial decryption together with a proof that `dlog_G(E_i) = dlog_A(C_i - Cp_i)`.
/// The proof is bound to the party index, the dealer key and the ciphertext.
///
/// # Errors
///
/// Returns [`Error::InvalidIndex`] if `index` is out of bounds for `params`.
#[instrument(level = "debug", skip_all, fields(index = index))]
pub fn partial_decrypt<G: Group, R: CryptoRng + RngCore>(
    params: &DhpvssParams<G>,
    dealer_key: &PublicKey<G>,
    index: usize,
    party_key: &PublicKey<G>,
    secret_key: &SecretKey<G>,
    ciphertext: G::Element,
    rng: &mut R,
) -> Result<(G::Element, LogEqualityProof<G>), Error> {
    params.check_index(index)?;

    let mask = dealer_key.as_element() * secret_key.expose_scalar();
    let partial_decryption = ciphertext - mask;
    let proof = LogEqualityProof::new(
        dealer_key,
        secret_key,
        (party_key.as_element(), mask),
        &mut decryption_transcript(params, dealer_key, index, &ciphertext),
        rng,
    );
    Ok((partial_decryption, proof))
}

/// Partially decrypts encrypted shares of all parties. This is a batch version
/// of [`partial_decrypt()`]; `party_keys`, `secret_keys` and `ciphertexts` must be ordered
/// by the party index.
///
/// # Errors
///
/// Returns [`Error::LengthMismatch`] if any of the provided slices has a length different
/// from the number of parties in `params`.
#[instrument(
    level = "debug",
    skip_all,
    fields(parties = params.parties(), threshold = params.threshold())
)]
pub fn pre_reconstruct<G: Group, R: CryptoRng + RngCore>(
    params: &DhpvssParams<G>,
    dealer_key: &PublicKey<G>,
    party_keys: &[PublicKey<G>],
    secret_keys: &[SecretKey<G>],
    ciphertexts: &[G::Element],
    rng: &mut R,
) -> Result<(Vec<G::Element>, DecryptionProof<G>), Error> {
    let parties = params.parties();
    Error::check_lengths("party keys", parties, party_keys.len())?;
    Error::check_lengths("secret keys", parties, secret_keys.len())?;
    Error::check_lengths("ciphertexts", parties, ciphertexts.len())?;

    let mut partial_decryptions = Vec::with_capacity(parties);
    let mut proofs = Vec::with_capacity(parties);
    let inputs = party_keys.iter().zip(secret_keys).zip(ciphertexts);
    for (index, ((party_key, secret_key), &ciphertext)) in inputs.enumerate() {
        let (partial_decryption, proof) = partial_decrypt(
            params,
            dealer_key,
            index,
            party_key,
            secret_key,
            ciphertext,
            rng,
        )?;
        partial_decryptions.push(partial_decryption);
        proofs.push(proof);
    }
    trace!("created partial decryptions");
    Ok((partial_decryptions, DecryptionProof::from_proofs(proofs)))
}

/// Verifies partial decryptions of all parties.
///
/// Returns `Ok(false)` if the decryption proof does not verify for at least one party;
/// use [`invalid_decryptions()`] to find out which parties are at fault.
///
/// # Errors
///
/// Returns [`Error::LengthMismatch`] if any of the provided collections has a length different
/// from the number of parties in `params`.
#[instrument(
    level = "debug",
    skip_all,
    fields(parties = params.parties(), threshold = params.threshold())
)]
pub fn verify_decryption<G: Group>(
    params: &DhpvssParams<G>,
    dealer_key: &PublicKey<G>,
    party_keys: &[PublicKey<G>],
    ciphertexts: &[G::Element],
    partial_decryptions: &[G::Element],
    proof: &DecryptionProof<G>,
) -> Result<bool, Error> {
    check_decryption_lengths(params, party_keys, ciphertexts, partial_decryptions, proof)?;

    let statements = decryption_statements(party_keys, ciphertexts, partial_decryptions);
    let result = proof.verify(dealer_key, &statements, |index| {
        decryption_transcript(params, dealer_key, index, &ciphertexts[index])
    });
    match result {
        Ok(()) => Ok(true),
        Err(err) => {
            debug!(%err, "decryption proof rejected");
            Ok(false)
        }
    }
}

/// Returns 0-based indexes of parties whose partial decryptions do not verify. Parameters
/// are the same as for [`verify_decryption()`].
///
/// # Errors
///
/// Returns [`Error::LengthMismatch`] if any of the provided collections has a length different
/// from the number of parties in `params`.
#[instrument(
    level = "debug",
    skip_all,
    fields(parties = params.parties(), threshold = params.threshold())
)]
pub fn invalid_decryptions<G: Group>(
    params: &DhpvssParams<G>,
    dealer_key: &PublicKey<G>,
    party_keys: &[PublicKey<G>],
    ciphertexts: &[G::Element],
    partial_decryptions: &[G::Element],
    proof: &DecryptionProof<G>,
) -> Result<Vec<usize>, Error> {
    check_decryption_lengths(params, party_keys, ciphertexts, partial_decryptions, proof)?;

    let statements = decryption_statements(party_keys, ciphertexts, partial_decryptions);
    let invalid_indexes = proof
        .invalid_indexes(dealer_key, &statements, |index| {
            decryption_transcript(params, dealer_key, index, &ciphertexts[index])
        })
        .map_err(|_| Error::LengthMismatch {
            collection: "decryption proofs",
            expected: statements.len(),
            actual: proof.len(),
        })?;
    for &index in &invalid_indexes {
        debug!(index, "partial decryption rejected");
    }
    Ok(invalid_indexes)
}

#[cfg(test)]
mod tests {
    use rand::thread_rng;

    use super::*;
    use crate::{
        group::{ElementOps, Ristretto},
        pvss::Params,
        Keypair,
    };

    fn create_parties(count: usize) -> (Vec<PublicKey<Ristretto>>, Vec<SecretKey<Ristretto>>) {
        let mut rng = thread_rng();
        (0..count)
            .map(|_| Keypair::<Ristretto>::generate(&mut rng).into_tuple())
            .unzip()
    }

    fn random_ciphertexts(count: usize) -> Vec<<Ristretto as ElementOps>::Element> {
        let mut rng = thread_rng();
        (0..count)
            .map(|_| Keypair::<Ristretto>::generate(&mut rng).public().as_element())
            .collect()
    }

    #[test]
    fn partial_decryption_strips_party_mask() {
        let mut rng = thread_rng();
        let params = DhpvssParams::<Ristretto>::new(Params::new(3, 2).unwrap()).unwrap();
        let dealer = Keypair::<Ristretto>::generate(&mut rng);
        let (party_key, secret_key) = Keypair::<Ristretto>::generate(&mut rng).into_tuple();
        let value = Ristretto::generator();
        let ciphertext = value + dealer.public().as_element() * secret_key.expose_scalar();

        let (partial_decryption, proof) = partial_decrypt(
            &params,
            dealer.public(),
            1,
            &party_key,
            &secret_key,
            ciphertext,
            &mut rng,
        )
        .unwrap();
        assert_eq!(partial_decryption, value);
        proof
            .verify(
                dealer.public(),
                (party_key.as_element(), ciphertext - partial_decryption),
                &mut decryption_transcript(&params, dealer.public(), 1, &ciphertext),
            )
            .unwrap();

        // The proof is bound to the party index.
        assert!(proof
            .verify(
                dealer.public(),
                (party_key.as_element(), ciphertext - partial_decryption),
                &mut decryption_transcript(&params, dealer.public(), 0, &ciphertext),
            )
            .is_err());

        let err = partial_decrypt(
            &params,
            dealer.public(),
            3,
            &party_key,
            &secret_key,
            ciphertext,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidIndex { index: 3, parties: 3 }));
    }

    #[test]
    fn decryptions_are_verified() {
        let mut rng = thread_rng();
        let params = DhpvssParams::<Ristretto>::new(Params::new(5, 3).unwrap()).unwrap();
        let dealer = Keypair::<Ristretto>::generate(&mut rng);
        let (party_keys, secret_keys) = create_parties(5);
        let ciphertexts = random_ciphertexts(5);

        let (mut partial_decryptions, proof) = pre_reconstruct(
            &params,
            dealer.public(),
            &party_keys,
            &secret_keys,
            &ciphertexts,
            &mut rng,
        )
        .unwrap();
        let verify = |partial_decryptions: &[_]| {
            verify_decryption(
                &params,
                dealer.public(),
                &party_keys,
                &ciphertexts,
                partial_decryptions,
                &proof,
            )
            .unwrap()
        };
        assert!(verify(&partial_decryptions));

        partial_decryptions[1] = partial_decryptions[1] + Ristretto::generator();
        partial_decryptions[3] = Ristretto::identity();
        assert!(!verify(&partial_decryptions));
        let invalid = invalid_decryptions(
            &params,
            dealer.public(),
            &party_keys,
            &ciphertexts,
            &partial_decryptions,
            &proof,
        )
        .unwrap();
        assert_eq!(invalid, [1, 3]);
    }

    #[test]
    fn length_mismatches_are_reported() {
        let mut rng = thread_rng();
        let params = DhpvssParams::<Ristretto>::new(Params::new(4, 2).unwrap()).unwrap();
        let dealer = Keypair::<Ristretto>::generate(&mut rng);
        let (party_keys, secret_keys) = create_parties(4);
        let ciphertexts = random_ciphertexts(4);

        let err = pre_reconstruct(
            &params,
            dealer.public(),
            &party_keys,
            &secret_keys[..3],
            &ciphertexts,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                collection: "secret keys",
                ..
            }
        ));

        let (partial_decryptions, proof) = pre_reconstruct(
            &params,
            dealer.public(),
            &party_keys,
            &secret_keys,
            &ciphertexts,
            &mut rng,
        )
        .unwrap();
        let err = verify_decryption(
            &params,
            dealer.public(),
            &party_keys,
            &ciphertexts,
            &partial_decryptions[..3],
            &proof,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                collection: "partial decryptions",
                expected: 4,
                actual: 3,
            }
        ));
    }
}
