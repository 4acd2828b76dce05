//! Remote repository connection configuration.

use secrecy::SecretString;

/// Coordinates and credentials for one GitHub repository.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub owner: String,
    pub repo: String,
    pub token: SecretString,
}
