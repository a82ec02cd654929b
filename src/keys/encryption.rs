use anyhow::{Context, bail};
use openssl::symm::{Cipher, Crypter, Mode};

/// AES-256-GCM key size in bytes.
const KEY_SIZE: usize = 32;
/// AES-256-GCM nonce size in bytes.
const NONCE_SIZE: usize = 12;
/// AES-256-GCM authentication tag size in bytes.
const TAG_SIZE: usize = 16;

/// Encrypts LiteLLM API keys at rest with AES-256-GCM. Every stored value has the
/// `nonce || ciphertext || tag` layout.
#[derive(Clone)]
pub struct ApiKeyEncryption {
    key: Vec<u8>,
}

impl ApiKeyEncryption {
    /// Creates a new instance from a hex-encoded 32-byte key.
    pub fn new(hex_key: &str) -> anyhow::Result<Self> {
        let key = hex::decode(hex_key.trim())
            .with_context(|| "API key encryption key is not valid hex.")?;
        if key.len() != KEY_SIZE {
            bail!(
                "API key encryption key must be {KEY_SIZE} bytes (256 bits), got {} bytes.",
                key.len()
            );
        }
        Ok(Self { key })
    }

    /// Encrypts the secret with a fresh random nonce.
    pub fn encrypt(&self, api_key: &str) -> anyhow::Result<Vec<u8>> {
        let cipher = Cipher::aes_256_gcm();
        let nonce = random_nonce()?;

        let mut crypter = Crypter::new(cipher, Mode::Encrypt, &self.key, Some(&nonce))?;
        let plaintext = api_key.as_bytes();
        let mut ciphertext = vec![0u8; plaintext.len() + cipher.block_size()];
        let mut count = crypter.update(plaintext, &mut ciphertext)?;
        count += crypter.finalize(&mut ciphertext[count..])?;
        ciphertext.truncate(count);

        let mut tag = [0u8; TAG_SIZE];
        crypter.get_tag(&mut tag)?;

        let mut output = Vec::with_capacity(NONCE_SIZE + ciphertext.len() + TAG_SIZE);
        output.extend_from_slice(&nonce);
        output.extend_from_slice(&ciphertext);
        output.extend_from_slice(&tag);

        Ok(output)
    }

    /// Decrypts a value produced by [`ApiKeyEncryption::encrypt`].
    pub fn decrypt(&self, data: &[u8]) -> anyhow::Result<String> {
        if data.len() < NONCE_SIZE + TAG_SIZE {
            bail!("Encrypted API key is too short to contain nonce and tag.");
        }

        let cipher = Cipher::aes_256_gcm();
        let (nonce, rest) = data.split_at(NONCE_SIZE);
        let (ciphertext, tag) = rest.split_at(rest.len() - TAG_SIZE);

        let mut crypter = Crypter::new(cipher, Mode::Decrypt, &self.key, Some(nonce))?;
        crypter.set_tag(tag)?;

        let mut plaintext = vec![0u8; ciphertext.len() + cipher.block_size()];
        let mut count = crypter.update(ciphertext, &mut plaintext)?;
        count += crypter
            .finalize(&mut plaintext[count..])
            .with_context(|| "Encrypted API key failed authentication.")?;
        plaintext.truncate(count);

        String::from_utf8(plaintext).with_context(|| "Decrypted API key is not valid UTF-8.")
    }
}

fn random_nonce() -> anyhow::Result<[u8; NONCE_SIZE]> {
    let mut nonce = [0u8; NONCE_SIZE];
    openssl::rand::rand_bytes(&mut nonce).with_context(|| "Failed to generate random nonce.")?;
    Ok(nonce)
}
