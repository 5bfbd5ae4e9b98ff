use s3meta_core::utils::Redact;
use s3meta_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential that holds the access key pair.
///
/// Both values are opaque strings owned by the caller and used only as HMAC
/// key material; they are never mutated.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id for the service.
    pub access_key_id: String,
    /// Secret access key for the service.
    pub secret_access_key: String,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }
}
