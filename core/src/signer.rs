use crate::{Context, ProvideCredential, Result, SignRequest, SigningCredential};
use std::sync::{Arc, Mutex};

/// Signer is the main struct used to sign the request.
///
/// It caches the last loaded credential and reloads it through the configured
/// [`ProvideCredential`] once it stops being valid.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = K>>,
    signer: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = K>,
        signer: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            provider: Arc::new(provider),
            signer: Arc::new(signer),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Sign the pending request in place.
    pub async fn sign(&self, req: &mut http::request::Parts) -> Result<()> {
        let cred = self
            .credential
            .lock()
            .expect("lock poisoned")
            .clone();
        let cred = if cred.is_valid() {
            cred
        } else {
            let cred = self.provider.provide_credential(&self.ctx).await?;
            *self.credential.lock().expect("lock poisoned") = cred.clone();
            cred
        };

        self.signer
            .sign_request(&self.ctx, req, cred.as_ref())
            .await
    }
}
