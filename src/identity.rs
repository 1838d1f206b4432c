use log::{info, warn};
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

use crate::store::{KeyValueStore, DEVICE_KEY};
use crate::utils::date::now_millis;

/// Hands out the identifier local ratings are attributed to.
pub trait IdentityProvider: Send {
    fn device_id(&mut self) -> anyhow::Result<String>;
}

/// 32 hex characters from the OS random source. Falls back to a timestamp and
/// a pseudo-random suffix when the OS source is unavailable.
pub fn random_id() -> String {
    let mut buf = [0u8; 16];

    match OsRng.try_fill_bytes(&mut buf) {
        Ok(()) => buf.iter().map(|b| format!("{:02x}", b)).collect(),
        Err(err) => {
            warn!("os random source unavailable: {}", err);
            let mut rng = StdRng::seed_from_u64(now_millis() as u64);
            format!("{}{:x}", now_millis(), rng.next_u64())
        }
    }
}

/// Identifier generated on first use and kept in the store from then on.
pub struct StoredIdentity<S: KeyValueStore + Send> {
    store: S,
}

impl<S: KeyValueStore + Send> StoredIdentity<S> {
    pub fn new(store: S) -> StoredIdentity<S> {
        StoredIdentity { store }
    }
}

impl<S: KeyValueStore + Send> IdentityProvider for StoredIdentity<S> {
    fn device_id(&mut self) -> anyhow::Result<String> {
        if let Some(id) = self.store.get(DEVICE_KEY) {
            if !id.trim().is_empty() {
                return Ok(id);
            }
        }

        let id = random_id();
        self.store.set(DEVICE_KEY, id.clone())?;

        info!("created device id {}", id);

        Ok(id)
    }
}

pub struct FixedIdentity(pub String);

impl IdentityProvider for FixedIdentity {
    fn device_id(&mut self) -> anyhow::Result<String> {
        Ok(self.0.clone())
    }
}
