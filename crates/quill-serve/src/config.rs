//! Application configuration loaded from environment variables.

use std::path::PathBuf;

/// Development fallback for the cookie signing secret. Fine for local
/// hacking, useless in production; a warning is logged when it is used.
pub const DEV_SECRET_KEY: &str = "quill-dev-secret-change-me-before-deploying";

/// Minimum secret length accepted for cookie key derivation.
const MIN_SECRET_LEN: usize = 32;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1:8080").
    pub bind_addr: String,

    /// Path to the SQLite database file.
    pub db_path: PathBuf,

    /// Secret used to derive the session cookie signing key.
    pub secret_key: String,

    /// Site name shown in page titles and the header.
    pub site_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - None (all have defaults for local development)
    ///
    /// Optional:
    /// - `QUILL_BIND_ADDR`: Server bind address (default: "127.0.0.1:8080")
    /// - `QUILL_DB_PATH`: SQLite file path (default: "quill.db")
    /// - `QUILL_SECRET_KEY`: Cookie signing secret, at least 32 bytes
    ///   (default: an insecure development value)
    /// - `QUILL_SITE_NAME`: Site name (default: "Quill")
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("QUILL_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

        let db_path = std::env::var("QUILL_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("quill.db"));

        let secret_key = match std::env::var("QUILL_SECRET_KEY") {
            Ok(secret) => {
                if secret.len() < MIN_SECRET_LEN {
                    anyhow::bail!(
                        "QUILL_SECRET_KEY must be at least {MIN_SECRET_LEN} bytes (got {})",
                        secret.len()
                    );
                }
                secret
            }
            Err(_) => {
                tracing::warn!(
                    "QUILL_SECRET_KEY not set; using the insecure development default"
                );
                DEV_SECRET_KEY.to_string()
            }
        };

        let site_name = std::env::var("QUILL_SITE_NAME").unwrap_or_else(|_| "Quill".to_string());

        tracing::info!(
            bind_addr = %bind_addr,
            db_path = %db_path.display(),
            site_name = %site_name,
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            db_path,
            secret_key,
            site_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "QUILL_BIND_ADDR",
        "QUILL_DB_PATH",
        "QUILL_SECRET_KEY",
        "QUILL_SITE_NAME",
    ];

    /// Helper to run config tests with isolated env vars.
    /// Uses a mutex to prevent concurrent env var races.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn config_defaults() {
        with_env_vars(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "127.0.0.1:8080");
            assert_eq!(config.db_path, PathBuf::from("quill.db"));
            assert_eq!(config.secret_key, DEV_SECRET_KEY);
            assert_eq!(config.site_name, "Quill");
        });
    }

    #[test]
    fn config_custom_values() {
        with_env_vars(
            &[
                ("QUILL_BIND_ADDR", "0.0.0.0:3000"),
                ("QUILL_DB_PATH", "/tmp/blog.db"),
                ("QUILL_SECRET_KEY", "0123456789abcdef0123456789abcdef"),
                ("QUILL_SITE_NAME", "My Blog"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bind_addr, "0.0.0.0:3000");
                assert_eq!(config.db_path, PathBuf::from("/tmp/blog.db"));
                assert_eq!(config.secret_key, "0123456789abcdef0123456789abcdef");
                assert_eq!(config.site_name, "My Blog");
            },
        );
    }

    #[test]
    fn config_rejects_short_secret() {
        with_env_vars(&[("QUILL_SECRET_KEY", "tooshort")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn dev_secret_is_long_enough_for_key_derivation() {
        assert!(DEV_SECRET_KEY.len() >= MIN_SECRET_LEN);
    }
}
