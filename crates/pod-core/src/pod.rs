//! The signed POD aggregate.

use serde::{Deserialize, Serialize};

use crate::crypto::{verify_signature, PodPublicKey, PodSignature};
use crate::entries::PodEntries;
use crate::error::{PodError, Result};
use crate::types::ContentId;
use crate::value::PodValue;

/// A set of entries together with a signature over their content ID.
///
/// The signature and public key are kept in their text encoding so that a
/// POD re-serializes exactly as it was received. A `Pod` can be constructed
/// from untrusted input; call [`Pod::verify`] before relying on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    entries: PodEntries,
    signature: String,
    signer_public_key: String,
}

impl Pod {
    /// Assemble a POD from its parts without checking anything.
    pub fn from_parts(
        entries: PodEntries,
        signature: impl Into<String>,
        signer_public_key: impl Into<String>,
    ) -> Self {
        Self {
            entries,
            signature: signature.into(),
            signer_public_key: signer_public_key.into(),
        }
    }

    pub fn entries(&self) -> &PodEntries {
        &self.entries
    }

    /// Encoded signature, as received or produced.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Encoded signer public key, as received or produced.
    pub fn signer_public_key(&self) -> &str {
        &self.signer_public_key
    }

    pub fn get(&self, name: &str) -> Option<&PodValue> {
        self.entries.get(name)
    }

    pub fn into_parts(self) -> (PodEntries, String, String) {
        (self.entries, self.signature, self.signer_public_key)
    }

    /// Decoded signature bytes.
    pub fn signature_bytes(&self) -> Result<PodSignature> {
        PodSignature::decode(&self.signature)
    }

    /// Decoded signer public key bytes.
    pub fn signer_public_key_bytes(&self) -> Result<PodPublicKey> {
        PodPublicKey::decode(&self.signer_public_key)
    }

    pub fn content_id(&self) -> Result<ContentId> {
        self.entries.content_id()
    }

    /// Structural validation: entries are legal and the key and signature
    /// decode to the right lengths. Does not check the signature itself.
    pub fn check(&self) -> Result<()> {
        self.entries.check()?;
        self.signer_public_key_bytes()?;
        self.signature_bytes()?;
        Ok(())
    }

    /// Verify the signature over the recomputed content ID.
    ///
    /// A well-formed signature that does not match yields `Ok(false)`.
    /// Undecodable key or signature text is a `KeyFormat` error, and bytes
    /// that are not a curve point are a `Decode` error.
    pub fn verify(&self) -> Result<bool> {
        let public_key = self.signer_public_key_bytes()?;
        let signature = self.signature_bytes()?;
        let point = public_key.to_point()?;
        let decompressed = signature.decompress()?;
        let content_id = self.content_id()?;
        let verified = verify_signature(point, decompressed, &content_id);
        if !verified {
            tracing::debug!(%content_id, signer = ?public_key, "POD signature did not verify");
        }
        Ok(verified)
    }

    /// Compact JSON: `{"entries":…,"signature":…,"signerPublicKey":…}`.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| PodError::ValueFormat(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PodError::ValueFormat(e.to_string()))
    }

    /// Parse a POD. Entries are checked; the signature is not verified.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PodError::ValueFormat(e.to_string()))
    }
}

/// Verify a POD. See [`Pod::verify`].
pub fn verify_pod(pod: &Pod) -> Result<bool> {
    pod.verify()
}
