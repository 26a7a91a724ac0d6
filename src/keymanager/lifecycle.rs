//! Key-pair lifecycle operations
//!
//! [`KeyringService`] is the caller-facing entry point: it binds the
//! provider registry (chain crypto) to the repository (persistence) and
//! implements the create/read/update/delete contract. All mutations are
//! read-modify-write against the store; callers that need concurrent
//! writers on one (chain, service) key must serialize externally.

use std::sync::Arc;

use tracing::info;

use crate::chain::Chain;
use crate::error::{Error, Result};
use crate::provider::ProviderRegistry;
use crate::storage::KeyValueStore;

use super::repository::KeyManagerRepository;
use super::{AddressEntry, CreatedKeyPair, ExternalData, KeyManager, KeyPair};

pub struct KeyringService {
    registry: ProviderRegistry,
    repository: KeyManagerRepository,
}

impl KeyringService {
    pub fn new(registry: ProviderRegistry, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            registry,
            repository: KeyManagerRepository::new(store),
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub(super) fn repository(&self) -> &KeyManagerRepository {
        &self.repository
    }

    /// Imports or generates a key under the chain's rules and appends the
    /// resulting pair to the service's key manager, creating the record on
    /// first use. Nothing is persisted when the key input is rejected.
    pub fn create_key_pair(
        &self,
        chain: Chain,
        service_name: &str,
        private_key: Option<&str>,
    ) -> Result<CreatedKeyPair> {
        let service_name = validated_service_name(service_name)?;
        let key_input = private_key.map(str::trim).filter(|s| !s.is_empty());

        let provider = self.registry.provider(chain);
        let material = provider.import_or_generate(key_input)?;
        let address = provider.derive_address(&material.public_key)?;

        let mut manager = self
            .repository
            .get(chain, service_name)?
            .unwrap_or_else(|| KeyManager::new(service_name));
        let public_key = hex::encode(&material.public_key);
        manager.key_pairs.push(KeyPair {
            private_key: hex::encode(material.private_key.as_slice()),
            public_key: public_key.clone(),
            address: address.clone(),
            external_data: None,
            external_data_locked: false,
        });
        self.repository.put(chain, &manager)?;

        info!(%chain, service = %service_name, %address, "created key pair");
        Ok(CreatedKeyPair {
            service_name: service_name.to_string(),
            address,
            public_key,
        })
    }

    /// Address/public-key projections in insertion order. An absent
    /// service reads as empty rather than an error.
    pub fn list_addresses(&self, chain: Chain, service_name: &str) -> Result<Vec<AddressEntry>> {
        let service_name = validated_service_name(service_name)?;
        let Some(manager) = self.repository.get(chain, service_name)? else {
            return Ok(Vec::new());
        };
        Ok(manager
            .key_pairs
            .into_iter()
            .map(|pair| AddressEntry {
                address: pair.address,
                public_key: pair.public_key,
                external_data: pair.external_data,
            })
            .collect())
    }

    /// Service names with at least one key pair under the chain.
    pub fn list_services(&self, chain: Chain) -> Result<Vec<String>> {
        self.repository.list(chain)
    }

    /// Removes every key pair whose address matches exactly. Deleting the
    /// last pair removes the whole record.
    pub fn delete_key_pair(&self, chain: Chain, service_name: &str, address: &str) -> Result<()> {
        let service_name = validated_service_name(service_name)?;
        let mut manager = self.require_manager(chain, service_name)?;

        let before = manager.key_pairs.len();
        manager.key_pairs.retain(|pair| pair.address != address);
        if manager.key_pairs.len() == before {
            return Err(Error::NotFound(format!(
                "no key pair with address {address} under {chain}/{service_name}"
            )));
        }

        if manager.key_pairs.is_empty() {
            self.repository.delete(chain, service_name)?;
        } else {
            self.repository.put(chain, &manager)?;
        }
        info!(%chain, service = %service_name, %address, "deleted key pair");
        Ok(())
    }

    /// Removes the service's record and every key pair in it; deleting an
    /// absent record is not an error.
    pub fn delete_key_manager(&self, chain: Chain, service_name: &str) -> Result<()> {
        let service_name = validated_service_name(service_name)?;
        self.repository.delete(chain, service_name)?;
        info!(%chain, service = %service_name, "deleted key manager");
        Ok(())
    }

    /// Overwrites the metadata of the first key pair matching the address;
    /// passing `None` clears it. Fails on a locked pair.
    pub fn attach_external_data(
        &self,
        chain: Chain,
        service_name: &str,
        address: &str,
        external_data: Option<ExternalData>,
    ) -> Result<()> {
        let service_name = validated_service_name(service_name)?;
        self.update_key_pair(chain, service_name, address, |pair| {
            if pair.external_data_locked {
                return Err(Error::Validation(format!(
                    "external data is locked for address {address}"
                )));
            }
            pair.external_data = external_data;
            Ok(())
        })
    }

    /// Toggles the metadata lock on the first key pair matching the
    /// address. The lock itself is never locked: it can always be cleared.
    pub fn set_external_data_lock(
        &self,
        chain: Chain,
        service_name: &str,
        address: &str,
        locked: bool,
    ) -> Result<()> {
        let service_name = validated_service_name(service_name)?;
        self.update_key_pair(chain, service_name, address, |pair| {
            pair.external_data_locked = locked;
            Ok(())
        })
    }

    fn update_key_pair(
        &self,
        chain: Chain,
        service_name: &str,
        address: &str,
        apply: impl FnOnce(&mut KeyPair) -> Result<()>,
    ) -> Result<()> {
        let mut manager = self.require_manager(chain, service_name)?;
        let pair = manager
            .key_pairs
            .iter_mut()
            .find(|pair| pair.address == address)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "no key pair with address {address} under {chain}/{service_name}"
                ))
            })?;
        apply(pair)?;
        self.repository.put(chain, &manager)
    }

    fn require_manager(&self, chain: Chain, service_name: &str) -> Result<KeyManager> {
        self.repository.get(chain, service_name)?.ok_or_else(|| {
            Error::NotFound(format!("no key manager for {chain}/{service_name}"))
        })
    }
}

fn validated_service_name(service_name: &str) -> Result<&str> {
    let trimmed = service_name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("service name is required".to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn service() -> KeyringService {
        KeyringService::new(
            ProviderRegistry::with_default_providers(),
            Arc::new(MemoryStore::new()),
        )
    }

    #[test]
    fn rejects_empty_service_name() {
        let svc = service();
        let err = svc.create_key_pair(Chain::Eth, "  ", None).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn rejected_key_persists_nothing() {
        let svc = service();
        let err = svc
            .create_key_pair(Chain::Sol, "svc", Some("not-a-key"))
            .unwrap_err();
        assert!(err.to_string().contains("invalid private key"));
        assert!(svc.list_addresses(Chain::Sol, "svc").unwrap().is_empty());
        assert!(svc.list_services(Chain::Sol).unwrap().is_empty());
    }

    #[test]
    fn blank_key_input_means_generate() {
        let svc = service();
        let created = svc.create_key_pair(Chain::Eth, "svc", Some("   ")).unwrap();
        assert!(created.address.starts_with("0x"));
    }

    #[test]
    fn delete_of_unknown_address_is_not_found() {
        let svc = service();
        svc.create_key_pair(Chain::Eth, "svc", None).unwrap();
        let err = svc
            .delete_key_pair(Chain::Eth, "svc", "0xdeadbeef")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn delete_on_absent_service_is_not_found() {
        let svc = service();
        let err = svc.delete_key_pair(Chain::Eth, "ghost", "0x0").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn lock_blocks_metadata_overwrite_until_cleared() {
        let svc = service();
        let created = svc.create_key_pair(Chain::Eth, "svc", None).unwrap();

        svc.set_external_data_lock(Chain::Eth, "svc", &created.address, true)
            .unwrap();
        let mut data = ExternalData::new();
        data.insert("team".to_string(), serde_json::json!("payments"));
        let err = svc
            .attach_external_data(Chain::Eth, "svc", &created.address, Some(data.clone()))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        svc.set_external_data_lock(Chain::Eth, "svc", &created.address, false)
            .unwrap();
        svc.attach_external_data(Chain::Eth, "svc", &created.address, Some(data))
            .unwrap();

        let entries = svc.list_addresses(Chain::Eth, "svc").unwrap();
        assert_eq!(
            entries[0].external_data.as_ref().unwrap()["team"],
            serde_json::json!("payments")
        );
    }

    #[test]
    fn metadata_update_without_payload_clears_it() {
        let svc = service();
        let created = svc.create_key_pair(Chain::Trx, "svc", None).unwrap();

        let mut data = ExternalData::new();
        data.insert("env".to_string(), serde_json::json!("prod"));
        svc.attach_external_data(Chain::Trx, "svc", &created.address, Some(data))
            .unwrap();
        svc.attach_external_data(Chain::Trx, "svc", &created.address, None)
            .unwrap();

        let entries = svc.list_addresses(Chain::Trx, "svc").unwrap();
        assert!(entries[0].external_data.is_none());
    }
}
