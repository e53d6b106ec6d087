//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`StoragePort`], [`ConfigPort`] and [`GroupStorePort`] for
//! the outlet board.
//!
//! - Group table: namespace `outlet`, key `groups`, postcard-encoded
//!   `[u8; RELAY_COUNT]`.  A single-entry update rewrites the whole blob;
//!   NVS commits are atomic, so a power loss leaves the old or the new
//!   table, never a mix.  Writes that would not change the stored value
//!   are skipped to spare flash.
//! - Board config: same namespace, key `boardcfg`, validated before save.
//!
//! On the host the backend is an in-memory map (dev/test only).

use log::{debug, info, warn};

use crate::app::ports::{ConfigError, ConfigPort, GroupStorePort, StorageError, StoragePort};
use crate::app::relay_store::default_groups;
use crate::config::{BoardConfig, RELAY_COUNT};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const NAMESPACE: &str = "outlet";
const GROUPS_KEY: &str = "groups";
const CONFIG_KEY: &str = "boardcfg";

/// Largest blob this adapter ever stores.
const MAX_BLOB_SIZE: usize = 32;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: std::cell::RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    /// Initialise NVS flash.
    ///
    /// On first boot or after a layout/version mismatch the partition is
    /// erased and re-initialised, which resets groups to factory defaults.
    pub fn new() -> crate::error::Result<Self> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the single main-task context before
            // any other NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as esp_err_t
                || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as esp_err_t
            {
                warn!("NVS: erasing and re-initialising flash partition");
                let ret = unsafe { nvs_flash_erase() };
                if ret != ESP_OK as esp_err_t {
                    return Err(crate::error::Error::Init("nvs_flash_erase", ret));
                }
                let ret = unsafe { nvs_flash_init() };
                if ret != ESP_OK as esp_err_t {
                    return Err(crate::error::Error::Init("nvs_flash_init", ret));
                }
            } else if ret != ESP_OK as esp_err_t {
                return Err(crate::error::Error::Init("nvs_flash_init", ret));
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// Open an NVS namespace, execute a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, esp_err_t>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, esp_err_t>,
    {
        let ns = nvs_name(namespace);
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        // SAFETY: `ns` is NUL-terminated and outlives the call.
        let ret = unsafe { nvs_open(ns.as_ptr().cast(), mode, &mut handle) };
        if ret != ESP_OK as esp_err_t {
            return Err(ret);
        }

        let result = f(handle);
        // SAFETY: handle was opened above and is not used after close.
        unsafe {
            nvs_close(handle);
        }
        result
    }

    /// Atomic blob write; `&self` so [`ConfigPort::save`] can use it.
    fn write_blob(&self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            self.store
                .borrow_mut()
                .insert(Self::composite_key(namespace, key), data.to_vec());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let key = nvs_name(key);
            let result = Self::with_nvs_handle(namespace, true, |handle| {
                // SAFETY: key is NUL-terminated; data pointer/len describe a live slice.
                let ret = unsafe {
                    nvs_set_blob(handle, key.as_ptr().cast(), data.as_ptr().cast(), data.len())
                };
                if ret != ESP_OK as esp_err_t {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK as esp_err_t {
                    return Err(ret);
                }
                Ok(())
            });
            result.map_err(|e| {
                warn!("NvsAdapter: NVS write error {}", e);
                if e == ESP_ERR_NVS_NOT_ENOUGH_SPACE as esp_err_t {
                    StorageError::Full
                } else {
                    StorageError::IoError
                }
            })
        }
    }
}

/// NUL-terminated copy of an NVS namespace or key (max 15 chars).
#[cfg(target_os = "espidf")]
fn nvs_name(name: &str) -> [u8; 16] {
    let mut buf = [0u8; 16];
    let bytes = name.as_bytes();
    let len = bytes.len().min(15);
    buf[..len].copy_from_slice(&bytes[..len]);
    buf
}

impl StoragePort for NvsAdapter {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            match self.store.borrow().get(&composite) {
                Some(data) => {
                    let len = data.len().min(buf.len());
                    buf[..len].copy_from_slice(&data[..len]);
                    Ok(len)
                }
                None => Err(StorageError::NotFound),
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let key = nvs_name(key);
            let result = Self::with_nvs_handle(namespace, false, |handle| {
                let mut size = buf.len();
                // SAFETY: buf is valid for `size` bytes; key is NUL-terminated.
                let ret = unsafe {
                    nvs_get_blob(handle, key.as_ptr().cast(), buf.as_mut_ptr().cast(), &mut size)
                };
                if ret != ESP_OK as esp_err_t {
                    return Err(ret);
                }
                Ok(size)
            });
            match result {
                Ok(size) => Ok(size),
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND as esp_err_t => Err(StorageError::NotFound),
                Err(e) if e == ESP_ERR_NVS_INVALID_LENGTH as esp_err_t => {
                    Err(StorageError::Corrupted)
                }
                Err(_) => Err(StorageError::IoError),
            }
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.write_blob(namespace, key, data)
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            self.store
                .borrow_mut()
                .remove(&Self::composite_key(namespace, key));
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let key = nvs_name(key);
            let result = Self::with_nvs_handle(namespace, true, |handle| {
                // SAFETY: key is NUL-terminated.
                let ret = unsafe { nvs_erase_key(handle, key.as_ptr().cast()) };
                if ret != ESP_OK as esp_err_t && ret != ESP_ERR_NVS_NOT_FOUND as esp_err_t {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK as esp_err_t {
                    return Err(ret);
                }
                Ok(())
            });
            match result {
                Ok(()) => Ok(()),
                // Namespace never created: nothing to delete.
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND as esp_err_t => Ok(()),
                Err(_) => Err(StorageError::IoError),
            }
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        let mut buf = [0u8; MAX_BLOB_SIZE];
        self.read(namespace, key, &mut buf).is_ok()
    }
}

// ── Group table ───────────────────────────────────────────────

impl GroupStorePort for NvsAdapter {
    fn load_groups(&mut self) -> Result<[u8; RELAY_COUNT], StorageError> {
        let mut buf = [0u8; MAX_BLOB_SIZE];
        let len = self.read(NAMESPACE, GROUPS_KEY, &mut buf)?;
        postcard::from_bytes(&buf[..len]).map_err(|_| StorageError::Corrupted)
    }

    fn store_group(&mut self, relay: usize, group: u8) -> Result<(), StorageError> {
        let mut table = match self.load_groups() {
            Ok(table) => table,
            Err(StorageError::NotFound | StorageError::Corrupted) => default_groups(),
            Err(e) => return Err(e),
        };

        if table[relay] == group && self.exists(NAMESPACE, GROUPS_KEY) {
            debug!("NvsAdapter: group of outlet {} unchanged, skipping write", relay);
            return Ok(());
        }

        table[relay] = group;
        let bytes = postcard::to_allocvec(&table).map_err(|_| StorageError::IoError)?;
        self.write_blob(NAMESPACE, GROUPS_KEY, &bytes)?;
        info!("NvsAdapter: outlet {} -> group {} saved", relay, group);
        Ok(())
    }
}

// ── Board config ──────────────────────────────────────────────

fn validate_config(cfg: &BoardConfig) -> Result<(), ConfigError> {
    cfg.validate().map_err(ConfigError::ValidationFailed)
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<BoardConfig, ConfigError> {
        let mut buf = [0u8; MAX_BLOB_SIZE];
        match self.read(NAMESPACE, CONFIG_KEY, &mut buf) {
            Ok(len) => {
                let cfg: BoardConfig =
                    postcard::from_bytes(&buf[..len]).map_err(|_| ConfigError::Corrupted)?;
                if let Err(e) = validate_config(&cfg) {
                    warn!("NvsAdapter: stored config invalid ({}), using defaults", e);
                    return Ok(BoardConfig::default());
                }
                info!("NvsAdapter: loaded board config ({} bytes)", len);
                Ok(cfg)
            }
            Err(StorageError::NotFound) => {
                info!("NvsAdapter: no stored config, using defaults");
                Ok(BoardConfig::default())
            }
            Err(e) => {
                warn!("NvsAdapter: config read error ({}), using defaults", e);
                Ok(BoardConfig::default())
            }
        }
    }

    fn save(&self, config: &BoardConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        self.write_blob(NAMESPACE, CONFIG_KEY, &bytes)
            .map_err(|_| ConfigError::IoError)?;
        info!("NvsAdapter: board config saved ({} bytes)", bytes.len());
        Ok(())
    }
}
