use crate::{Context, Result};
use std::fmt::Debug;
use std::sync::Arc;

/// SigningCredential is the trait used by signer as the signing key.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is valid.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential is the trait used by the signer to load credentials from
/// the environment.
///
/// Different services may require different credentials, for example, a static
/// access key pair, or values read from environment variables.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + 'static {
    /// Credential returned by this provider.
    type Credential: SigningCredential;

    /// Load credential from the current environment.
    ///
    /// Returns `None` if this provider has nothing to offer; the caller may
    /// then fall through to the next provider.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// ProvideCredentialChain tries a sequence of providers in order and returns
/// the first credential found.
pub struct ProvideCredentialChain<K: SigningCredential> {
    providers: Vec<Arc<dyn ProvideCredential<Credential = K>>>,
}

impl<K: SigningCredential> Debug for ProvideCredentialChain<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvideCredentialChain")
            .field("providers", &self.providers.len())
            .finish()
    }
}

impl<K: SigningCredential> Default for ProvideCredentialChain<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SigningCredential> ProvideCredentialChain<K> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Append a provider to the end of the chain.
    pub fn push(mut self, provider: impl ProvideCredential<Credential = K> + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Insert a provider at the front of the chain.
    pub fn push_front(
        mut self,
        provider: impl ProvideCredential<Credential = K> + 'static,
    ) -> Self {
        self.providers.insert(0, Arc::new(provider));
        self
    }
}

#[async_trait::async_trait]
impl<K: SigningCredential> ProvideCredential for ProvideCredentialChain<K> {
    type Credential = K;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        for provider in &self.providers {
            if let Some(cred) = provider.provide_credential(ctx).await? {
                return Ok(Some(cred));
            }

            log::debug!("credential provider {provider:?} returned nothing, trying next");
        }

        Ok(None)
    }
}

/// SignRequest is the trait used by the signer to stamp authentication onto a
/// pending request.
#[async_trait::async_trait]
pub trait SignRequest: Debug + Send + Sync + 'static {
    /// Credential used by this request signer.
    type Credential: SigningCredential;

    /// Sign the request in place.
    ///
    /// ## Credential
    ///
    /// When `credential` is `None` the implementation decides whether to pass
    /// the request through unsigned (anonymous access) or to fail.
    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()>;
}
