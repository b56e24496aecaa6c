//! PCD envelope: a POD split into claim and proof with a stable identifier,
//! plus the Zupass "add" link that hands it to a PCD wallet.

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::entries::PodEntries;
use crate::error::{PodError, Result};
use crate::pod::Pod;

/// Zupass page that accepts `#/add?request=` links.
pub const ZUPASS_URL: &str = "https://zupass.org/";

/// PCD type tag Zupass uses for PODs.
pub const POD_PCD_TYPE: &str = "pod-pcd";

/// What the signer asserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodPcdClaim {
    pub entries: PodEntries,
    pub signer_public_key: String,
}

/// Evidence for the claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodPcdProof {
    pub signature: String,
}

/// A POD wrapped for exchange between PCD-aware applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodPcd {
    pub id: Uuid,
    pub claim: PodPcdClaim,
    pub proof: PodPcdProof,
}

impl PodPcd {
    /// Wrap a POD under a caller-chosen identifier.
    pub fn with_id(pod: Pod, id: Uuid) -> Self {
        let (entries, signature, signer_public_key) = pod.into_parts();
        Self {
            id,
            claim: PodPcdClaim {
                entries,
                signer_public_key,
            },
            proof: PodPcdProof { signature },
        }
    }

    /// Rebuild the inner POD.
    pub fn to_pod(&self) -> Pod {
        Pod::from_parts(
            self.claim.entries.clone(),
            self.proof.signature.clone(),
            self.claim.signer_public_key.clone(),
        )
    }

    /// Verify the inner POD.
    pub fn verify(&self) -> Result<bool> {
        self.to_pod().verify()
    }

    /// Link that asks Zupass to add this PCD, then return to `return_url`.
    pub fn make_zupass_url(&self, return_url: &str) -> Result<Url> {
        let request = ZupassRequest {
            request_type: "Add".to_string(),
            return_url: return_url.to_string(),
            pcd: ZupassPcdWrapper {
                pcd_type: POD_PCD_TYPE.to_string(),
                pcd: serde_json::to_string(self).map_err(|e| PodError::ValueFormat(e.to_string()))?,
            },
        };
        let request_json =
            serde_json::to_string(&request).map_err(|e| PodError::ValueFormat(e.to_string()))?;
        let link = format!(
            "{ZUPASS_URL}#/add?request={}",
            urlencoding::encode(&request_json)
        );
        Url::parse(&link).map_err(|e| PodError::ValueFormat(format!("zupass url: {e}")))
    }

    /// [`make_zupass_url`](Self::make_zupass_url) returning to Zupass itself.
    pub fn make_zupass_url_default_return_url(&self) -> Result<Url> {
        self.make_zupass_url(ZUPASS_URL)
    }
}

#[derive(Serialize, Deserialize)]
struct ZupassPcdWrapper {
    #[serde(rename = "type")]
    pcd_type: String,
    /// The serialized [`PodPcd`], as a JSON string.
    pcd: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZupassRequest {
    #[serde(rename = "type")]
    request_type: String,
    return_url: String,
    pcd: ZupassPcdWrapper,
}

impl From<Pod> for PodPcd {
    fn from(pod: Pod) -> Self {
        Self::with_id(pod, Uuid::new_v4())
    }
}

impl From<PodPcd> for Pod {
    fn from(pcd: PodPcd) -> Self {
        Pod::from_parts(pcd.claim.entries, pcd.proof.signature, pcd.claim.signer_public_key)
    }
}
