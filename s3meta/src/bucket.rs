use crate::constants::X_AMZ_META_PREFIX;
use crate::{Credential, ListBucketResult, RequestSigner};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode, Uri};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use s3meta_core::{Context, Error, ProvideCredential, Result, RetryPolicy, Signer};
use std::collections::HashMap;

/// A handle to one S3 bucket.
///
/// Every operation builds a pending request, signs it through the configured
/// credential provider and dispatches it under the bucket's [`RetryPolicy`].
/// A `Bucket` holds no mutable state, so independent calls may run
/// concurrently from as many tasks as the caller likes.
#[derive(Debug, Clone)]
pub struct Bucket {
    /// The bucket name, e.g. `com-awesome-dev-bucket`.
    name: String,
    /// The URL base for the region, appended to the bucket name to form the
    /// host, e.g. `.s3.amazonaws.com`.
    base: String,
    scheme: String,

    ctx: Context,
    signer: Signer<Credential>,
    retry: RetryPolicy,
}

impl Bucket {
    /// Create a bucket handle.
    ///
    /// `base` is the region's URL base; requests target
    /// `{scheme}://{name}{base}/{key}`. The scheme defaults to `http`, see
    /// [`Bucket::with_scheme`].
    pub fn new(
        ctx: Context,
        name: &str,
        base: &str,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        let signer = Signer::new(ctx.clone(), provider, RequestSigner::new(name));

        Self {
            name: name.to_string(),
            base: base.to_string(),
            scheme: "http".to_string(),
            ctx,
            signer,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the default retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the URL scheme, e.g. `https`.
    pub fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    /// Check whether an object exists.
    ///
    /// A 404 from the service means the object is absent and is not an error.
    pub async fn head_object(&self, key: &str) -> Result<bool> {
        Ok(self.head(key).await?.is_some())
    }

    /// Check whether an object exists and fetch its user-defined metadata.
    ///
    /// Returns `None` when the object is absent.
    pub async fn head_object_with_metadata(
        &self,
        key: &str,
    ) -> Result<Option<HashMap<String, String>>> {
        Ok(self.head(key).await?.map(|h| extract_metadata(&h)))
    }

    /// Fetch an object's content.
    ///
    /// Returns `None` when the object is absent.
    pub async fn get_object(&self, key: &str) -> Result<Option<Bytes>> {
        Ok(self.get(key).await?.map(|(body, _)| body))
    }

    /// Fetch an object's content together with its user-defined metadata.
    ///
    /// Returns `None` when the object is absent.
    pub async fn get_object_with_metadata(
        &self,
        key: &str,
    ) -> Result<Option<(Bytes, HashMap<String, String>)>> {
        Ok(self
            .get(key)
            .await?
            .map(|(body, headers)| (body, extract_metadata(&headers))))
    }

    /// Store an object.
    pub async fn put_object(&self, key: &str, body: impl Into<Bytes>) -> Result<()> {
        self.put(key, body.into(), None).await
    }

    /// Store an object with user-defined metadata.
    ///
    /// Each metadata entry is sent as an `x-amz-meta-{key}` header and
    /// participates in the request signature.
    pub async fn put_object_with_metadata(
        &self,
        key: &str,
        body: impl Into<Bytes>,
        metadata: &HashMap<String, String>,
    ) -> Result<()> {
        self.put(key, body.into(), Some(metadata)).await
    }

    /// List the bucket's objects under the given key prefix.
    pub async fn list_objects(&self, prefix: &str) -> Result<ListBucketResult> {
        let uri = self.list_uri(prefix)?;
        let req = http::Request::get(uri).body(Bytes::new())?;

        let (parts, body) = self.dispatch(req).await?.into_parts();
        if parts.status != StatusCode::OK {
            return Err(service_error("list", prefix, parts.status, &body));
        }

        quick_xml::de::from_str(&String::from_utf8_lossy(&body))
            .map_err(|e| Error::response_invalid("malformed listing document").with_source(e))
    }

    async fn head(&self, key: &str) -> Result<Option<HeaderMap>> {
        let req = http::Request::head(self.object_uri(key)?).body(Bytes::new())?;

        let (parts, body) = self.dispatch(req).await?.into_parts();
        match parts.status {
            StatusCode::OK => Ok(Some(parts.headers)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(service_error("HEAD", key, status, &body)),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<(Bytes, HeaderMap)>> {
        let req = http::Request::get(self.object_uri(key)?).body(Bytes::new())?;

        let (parts, body) = self.dispatch(req).await?.into_parts();
        match parts.status {
            StatusCode::OK => Ok(Some((body, parts.headers))),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(service_error("GET", key, status, &body)),
        }
    }

    async fn put(
        &self,
        key: &str,
        body: Bytes,
        metadata: Option<&HashMap<String, String>>,
    ) -> Result<()> {
        let mut builder =
            http::Request::put(self.object_uri(key)?).header(CONTENT_TYPE, "text/plain");
        for (name, value) in metadata.into_iter().flatten() {
            builder = builder.header(
                format!("{X_AMZ_META_PREFIX}{name}").as_str(),
                value.as_str(),
            );
        }
        let req = builder.body(body)?;

        let (parts, body) = self.dispatch(req).await?.into_parts();
        if parts.status != StatusCode::OK {
            return Err(service_error("PUT", key, parts.status, &body));
        }

        Ok(())
    }

    /// Sign the pending request, then hand it to the retrying executor.
    async fn dispatch(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (mut parts, body) = req.into_parts();
        self.signer.sign(&mut parts).await?;
        log::debug!("dispatching {} {}", parts.method, parts.uri);

        self.retry
            .dispatch(&self.ctx, http::Request::from_parts(parts, body))
            .await
    }

    fn object_uri(&self, key: &str) -> Result<Uri> {
        let uri = format!("{}://{}{}/{}", self.scheme, self.name, self.base, key);
        Ok(uri.parse()?)
    }

    fn list_uri(&self, prefix: &str) -> Result<Uri> {
        let uri = format!(
            "{}://{}{}/?prefix={}",
            self.scheme,
            self.name,
            self.base,
            utf8_percent_encode(prefix, NON_ALPHANUMERIC)
        );
        Ok(uri.parse()?)
    }
}

fn service_error(op: &str, key: &str, status: StatusCode, body: &Bytes) -> Error {
    Error::service_failed(format!(
        "{op} {key} returned {status}: {}",
        String::from_utf8_lossy(body)
    ))
}

/// Collect user-defined metadata from response headers.
///
/// Headers whose lowercase name starts with `x-amz-meta-` are gathered into a
/// map keyed by the suffix after that prefix; repeated values are
/// comma-joined.
pub fn extract_metadata(headers: &HeaderMap) -> HashMap<String, String> {
    let mut data = HashMap::new();

    for name in headers.keys() {
        let name_lower = name.as_str().to_lowercase();
        let Some(meta_key) = name_lower.strip_prefix(X_AMZ_META_PREFIX) else {
            continue;
        };

        let value = headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join(",");
        data.insert(meta_key.to_string(), value);
    }

    data
}
