//! Ethereum key derivation

use hmac::{Hmac, Mac};
use secp256k1::{All, PublicKey as Secp256k1PublicKey, Scalar, Secp256k1, SecretKey};
use sha2::Sha512;
use sha3::{Digest, Keccak256};

use crate::account::Address;
use crate::error::{Error, Result};
use super::derivation::{DerivationPath, KeyPair, PrivateKey, PublicKey, HARDENED_OFFSET};

/// Derive an Ethereum key pair from seed bytes and a derivation path
pub fn derive_key_pair(seed: &[u8], path: &DerivationPath) -> Result<KeyPair> {
    let secp = Secp256k1::new();

    // Derive the master key
    let (mut secret_key, mut chain_code) = derive_master_key(seed)?;

    // Derive the child keys
    for &component in path.components() {
        (secret_key, chain_code) = derive_child_key(&secp, &secret_key, &chain_code, component)?;
    }

    let public_key = Secp256k1PublicKey::from_secret_key(&secp, &secret_key);

    Ok(KeyPair::new(
        PrivateKey::new(secret_key.secret_bytes()),
        PublicKey::new(public_key),
    ))
}

/// Derive the master key from a seed
fn derive_master_key(seed: &[u8]) -> Result<(SecretKey, [u8; 32])> {
    let mut hmac = Hmac::<Sha512>::new_from_slice(b"Bitcoin seed")
        .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;

    hmac.update(seed);
    let result = hmac.finalize().into_bytes();

    let secret_key = SecretKey::from_slice(&result[0..32])
        .map_err(|e| Error::KeyDerivation(format!("Invalid master key: {}", e)))?;

    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&result[32..64]);

    Ok((secret_key, chain_code))
}

/// Derive a child key from a parent key
fn derive_child_key(
    secp: &Secp256k1<All>,
    parent_key: &SecretKey,
    parent_chain_code: &[u8; 32],
    index: u32,
) -> Result<(SecretKey, [u8; 32])> {
    let mut data = Vec::with_capacity(37);

    if index >= HARDENED_OFFSET {
        // Hardened derivation
        data.push(0);
        data.extend_from_slice(&parent_key.secret_bytes());
    } else {
        // Normal derivation
        let parent_public_key = Secp256k1PublicKey::from_secret_key(secp, parent_key);
        data.extend_from_slice(&parent_public_key.serialize());
    }

    data.extend_from_slice(&index.to_be_bytes());

    let mut hmac = Hmac::<Sha512>::new_from_slice(parent_chain_code)
        .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;

    hmac.update(&data);
    let result = hmac.finalize().into_bytes();

    let mut child_chain_code = [0u8; 32];
    child_chain_code.copy_from_slice(&result[32..64]);

    // child = IL + parent (mod n)
    let tweak = SecretKey::from_slice(&result[0..32])
        .map_err(|e| Error::KeyDerivation(format!("Invalid child key at index {}: {}", index, e)))?;

    let child_secret_key = tweak
        .add_tweak(&Scalar::from(*parent_key))
        .map_err(|e| Error::KeyDerivation(format!("Key addition error at index {}: {}", index, e)))?;

    Ok((child_secret_key, child_chain_code))
}

/// Get the Ethereum address of a public key
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    let uncompressed = public_key.uncompressed();

    // Skip the 0x04 tag and keep the last 20 bytes of the hash
    let hash = keccak256(&uncompressed[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address::new(address)
}

/// Calculate the Keccak-256 hash of data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
