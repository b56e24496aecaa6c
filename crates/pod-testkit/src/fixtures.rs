//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Once;

use pod_core::{pod_entries, Pod, PodEntries, PodPublicKey, Signer, SignerConfig};
use tracing_subscriber::EnvFilter;

/// A test fixture holding one signer.
pub struct TestFixture {
    pub signer: Signer,
}

impl TestFixture {
    /// Create a new test fixture with a random key.
    pub fn new() -> Self {
        Self {
            signer: Signer::generate(),
        }
    }

    /// Create with a deterministic key from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            signer: Signer::from_seed(&seed),
        }
    }

    /// Use a non-default signer configuration.
    pub fn with_config(self, config: SignerConfig) -> Self {
        Self {
            signer: self.signer.with_config(config),
        }
    }

    /// Get the signer's public key.
    pub fn public_key(&self) -> PodPublicKey {
        self.signer.public_key()
    }

    /// Sign a set of entries.
    pub fn sign(&self, entries: PodEntries) -> Pod {
        self.signer.sign(entries).expect("fixture entries are valid")
    }

    /// Sign a small item-style POD.
    pub fn make_item(&self, attack: i64) -> Pod {
        self.sign(pod_entries! {
            "attack" => attack,
            "itemSet" => "celestial",
            "pod_type" => "item.weapon",
            "weaponType" => "sword",
        })
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple test fixtures for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture::with_seed(seed)
        })
        .collect()
}

static TRACING: Once = Once::new();

/// Install a test subscriber filtered by `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
