//! Envelope structured-text codec.
//!
//! Envelopes are JSON objects indented with four spaces. Binary fields are
//! standard base64 with padding. Decoding validates every field's presence
//! and length before anything downstream touches key material, so a
//! malformed envelope is always reported as `InvalidEnvelope` and never as
//! an opaque cipher or padding failure.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::crypto::{Nonce, Signature, Tag, WrappedKey};
use crate::envelope::Envelope;
use crate::error::{Error, Result};

/// Smallest accepted wrapped-key / signature length (RSA-2048)
pub const MIN_RSA_BLOCK: usize = 256;

/// Largest accepted wrapped-key / signature length (RSA-8192)
pub const MAX_RSA_BLOCK: usize = 1024;

/// Field names as they appear on disk
pub mod fields {
    /// Original filename
    pub const ORIGINAL_FILENAME: &str = "original_filename";
    /// RSA-OAEP-wrapped AES key
    pub const ENCRYPTED_AES_KEY: &str = "encrypted_aes_key";
    /// AES-GCM nonce
    pub const NONCE: &str = "nonce";
    /// AES-GCM tag
    pub const TAG: &str = "tag";
    /// RSA-PSS signature
    pub const SIGNATURE: &str = "signature";
    /// Seal time
    pub const TIMESTAMP: &str = "timestamp";
}

/// Wire shape. Every field is optional here so a missing one can be
/// reported by name instead of as a generic parse error.
#[derive(Serialize, Deserialize)]
struct EnvelopeDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    original_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encrypted_aes_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
    #[serde(flatten)]
    extensions: BTreeMap<String, serde_json::Value>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| Error::InvalidEnvelope(format!("missing required field `{}`", field)))
}

fn decode_b64(value: &str, field: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value.trim())
        .map_err(|e| Error::InvalidEnvelope(format!("field `{}` is not valid base64: {}", field, e)))
}

fn check_rsa_block(bytes: &[u8], field: &str) -> Result<()> {
    if !(MIN_RSA_BLOCK..=MAX_RSA_BLOCK).contains(&bytes.len()) {
        return Err(Error::InvalidEnvelope(format!(
            "field `{}` has implausible length {} (expected {}..={} bytes)",
            field,
            bytes.len(),
            MIN_RSA_BLOCK,
            MAX_RSA_BLOCK
        )));
    }
    Ok(())
}

/// Serialize an envelope to structured text
pub fn encode(envelope: &Envelope) -> Result<String> {
    let document = EnvelopeDocument {
        original_filename: Some(envelope.original_filename.clone()),
        encrypted_aes_key: Some(STANDARD.encode(envelope.wrapped_key.as_bytes())),
        nonce: Some(STANDARD.encode(envelope.nonce.as_bytes())),
        tag: Some(STANDARD.encode(envelope.tag.as_bytes())),
        signature: Some(STANDARD.encode(envelope.signature.as_bytes())),
        timestamp: Some(envelope.timestamp),
        extensions: envelope.extensions.clone(),
    };

    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    document.serialize(&mut serializer)?;

    String::from_utf8(out).map_err(|e| Error::SerializationError(e.to_string()))
}

/// Parse and structurally validate an envelope
///
/// ## Errors
///
/// `InvalidEnvelope` if the text is not a JSON object, a required field is
/// absent, a binary field is not base64, or a field has the wrong length:
///
/// | Field | Accepted length |
/// |-------|-----------------|
/// | `nonce` | exactly 12 bytes |
/// | `tag` | exactly 16 bytes |
/// | `encrypted_aes_key` | 256–1024 bytes |
/// | `signature` | 256–1024 bytes |
pub fn decode(text: &str) -> Result<Envelope> {
    let document: EnvelopeDocument = serde_json::from_str(text)
        .map_err(|e| Error::InvalidEnvelope(format!("not a valid envelope document: {}", e)))?;

    let original_filename = required(document.original_filename, fields::ORIGINAL_FILENAME)?;
    let timestamp = required(document.timestamp, fields::TIMESTAMP)?;

    let wrapped_key = decode_b64(
        &required(document.encrypted_aes_key, fields::ENCRYPTED_AES_KEY)?,
        fields::ENCRYPTED_AES_KEY,
    )?;
    check_rsa_block(&wrapped_key, fields::ENCRYPTED_AES_KEY)?;

    let nonce = Nonce::from_slice(&decode_b64(
        &required(document.nonce, fields::NONCE)?,
        fields::NONCE,
    )?)?;

    let tag = Tag::from_slice(&decode_b64(
        &required(document.tag, fields::TAG)?,
        fields::TAG,
    )?)?;

    let signature = decode_b64(
        &required(document.signature, fields::SIGNATURE)?,
        fields::SIGNATURE,
    )?;
    check_rsa_block(&signature, fields::SIGNATURE)?;

    Ok(Envelope {
        original_filename,
        wrapped_key: WrappedKey::from_bytes(wrapped_key),
        nonce,
        tag,
        signature: Signature::from_bytes(signature),
        timestamp,
        extensions: document.extensions,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            original_filename: "report.pdf".into(),
            wrapped_key: WrappedKey::from_bytes(vec![0x11; 256]),
            nonce: Nonce::from_bytes([0x22; 12]),
            tag: Tag::from_bytes([0x33; 16]),
            signature: Signature::from_bytes(vec![0x44; 256]),
            timestamp: 1_717_171_717,
            extensions: BTreeMap::new(),
        }
    }

    fn document(envelope: &Envelope) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::from_str(&encode(envelope).unwrap()).unwrap() {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    fn decode_map(map: serde_json::Map<String, serde_json::Value>) -> Result<Envelope> {
        decode(&serde_json::Value::Object(map).to_string())
    }

    #[test]
    fn test_encode_uses_wire_field_names() {
        let map = document(&sample());

        assert_eq!(map["original_filename"], "report.pdf");
        assert_eq!(map["timestamp"], 1_717_171_717);
        assert_eq!(map["nonce"], STANDARD.encode([0x22u8; 12]));
        assert_eq!(map["tag"], STANDARD.encode([0x33u8; 16]));
        assert!(map["encrypted_aes_key"].is_string());
        assert!(map["signature"].is_string());
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn test_encode_is_indented_with_four_spaces() {
        let text = encode(&sample()).unwrap();
        assert!(text.starts_with("{\n    \"original_filename\": \"report.pdf\""));
    }

    #[test]
    fn test_decode_encoded_envelope() {
        let envelope = sample();
        let decoded = decode(&encode(&envelope).unwrap()).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn test_extension_fields_are_preserved() {
        let mut map = document(&sample());
        map.insert("ssdeep_hash".into(), "3:abc:def".into());

        let decoded = decode_map(map).unwrap();
        assert_eq!(decoded.extensions["ssdeep_hash"], "3:abc:def");

        let reencoded = document(&decoded);
        assert_eq!(reencoded["ssdeep_hash"], "3:abc:def");
    }

    #[test]
    fn test_missing_fields_are_named() {
        for field in [
            fields::ORIGINAL_FILENAME,
            fields::ENCRYPTED_AES_KEY,
            fields::NONCE,
            fields::TAG,
            fields::SIGNATURE,
            fields::TIMESTAMP,
        ] {
            let mut map = document(&sample());
            map.remove(field);

            match decode_map(map) {
                Err(Error::InvalidEnvelope(msg)) => assert!(msg.contains(field), "{}", msg),
                other => panic!("expected InvalidEnvelope for {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_wrong_nonce_length_rejected() {
        let mut map = document(&sample());
        map.insert("nonce".into(), STANDARD.encode([0u8; 11]).into());

        assert!(matches!(decode_map(map), Err(Error::InvalidEnvelope(_))));
    }

    #[test]
    fn test_wrong_tag_length_rejected() {
        let mut map = document(&sample());
        map.insert("tag".into(), STANDARD.encode([0u8; 17]).into());

        assert!(matches!(decode_map(map), Err(Error::InvalidEnvelope(_))));
    }

    #[test]
    fn test_implausible_rsa_blocks_rejected() {
        let mut map = document(&sample());
        map.insert("encrypted_aes_key".into(), STANDARD.encode([0u8; 32]).into());
        assert!(matches!(decode_map(map), Err(Error::InvalidEnvelope(_))));

        let mut map = document(&sample());
        map.insert("signature".into(), STANDARD.encode(vec![0u8; 2048]).into());
        assert!(matches!(decode_map(map), Err(Error::InvalidEnvelope(_))));
    }

    #[test]
    fn test_non_base64_rejected() {
        let mut map = document(&sample());
        map.insert("signature".into(), "not*base64!".into());

        match decode_map(map) {
            Err(Error::InvalidEnvelope(msg)) => assert!(msg.contains("signature")),
            other => panic!("expected InvalidEnvelope, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_field_types_rejected() {
        let mut map = document(&sample());
        map.insert("timestamp".into(), "yesterday".into());
        assert!(matches!(decode_map(map), Err(Error::InvalidEnvelope(_))));

        let mut map = document(&sample());
        map.insert("nonce".into(), serde_json::Value::Null);
        assert!(matches!(decode_map(map), Err(Error::InvalidEnvelope(_))));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(decode("[]"), Err(Error::InvalidEnvelope(_))));
        assert!(matches!(decode(""), Err(Error::InvalidEnvelope(_))));
        assert!(matches!(decode("{\"original_filename\": "), Err(Error::InvalidEnvelope(_))));
    }
}
