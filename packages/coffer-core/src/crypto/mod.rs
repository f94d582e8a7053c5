//! # Cryptography Module
//!
//! The primitives behind a sealed file. Nothing in here knows about
//! envelopes or storage; the pipelines in [`crate::envelope`] compose them.
//!
//! ## Security Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CRYPTOGRAPHIC ARCHITECTURE                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    KEY HIERARCHY                                │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  Vault Identity (RSA-2048+, e = 65537)                         │   │
//! │  │  PKCS#8 private PEM  /  SPKI public PEM                        │   │
//! │  │                          │                                      │   │
//! │  │            ┌─────────────┴─────────────┐                       │   │
//! │  │            ▼                           ▼                       │   │
//! │  │  ┌─────────────────┐         ┌─────────────────┐              │   │
//! │  │  │  Key Wrapping   │         │  Signatures     │              │   │
//! │  │  │  (RSA-OAEP)     │         │  (RSA-PSS)      │              │   │
//! │  │  │                 │         │                 │              │   │
//! │  │  │ • SHA-256       │         │ • SHA-256       │              │   │
//! │  │  │ • MGF1-SHA256   │         │ • MGF1-SHA256   │              │   │
//! │  │  │ • empty label   │         │ • max salt      │              │   │
//! │  │  └────────┬────────┘         └─────────────────┘              │   │
//! │  │           │                                                     │   │
//! │  │           ▼                                                     │   │
//! │  │  File Key (AES-256, fresh per file, never stored in clear)     │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 ENCRYPTION SCHEME                               │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  Content Encryption (AES-256-GCM)                              │   │
//! │  │  ─────────────────────────────────                              │   │
//! │  │  • 256-bit key                                                 │   │
//! │  │  • 96-bit nonce (random per file)                              │   │
//! │  │  • 128-bit tag, stored detached                                │   │
//! │  │  • no associated data                                          │   │
//! │  │                                                                 │   │
//! │  │  len(ciphertext) == len(plaintext)                             │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm Choices
//!
//! | Algorithm | Purpose | Parameters |
//! |-----------|---------|------------|
//! | AES-256-GCM | Content encryption | 12-byte nonce, 16-byte tag |
//! | RSA-OAEP | File key wrapping | SHA-256, MGF1-SHA256, no label |
//! | RSA-PSS | Content signature | SHA-256, MGF1-SHA256, max salt |
//! | SHA-256 | Signed digest, key fingerprint | |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: File keys are zeroized when dropped
//! 2. **Secure Random**: Keys and nonces come from `rand::rngs::OsRng`
//! 3. **No Key Reuse**: Every file gets its own key and nonce
//! 4. **Uniform Failures**: Open-side failures carry no primitive detail

pub mod cipher;
mod digest;
pub mod keys;
mod random;
pub mod signing;
pub mod wrap;

pub use cipher::{Nonce, SealedContent, SymmetricKey, Tag, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use digest::{Digest, DIGEST_SIZE};
pub use keys::{KeyPair, PrivateKey, PublicKey, DEFAULT_KEY_BITS, MAX_KEY_BITS, MIN_KEY_BITS};
pub use signing::Signature;
pub use wrap::WrappedKey;
