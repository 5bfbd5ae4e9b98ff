use s3meta_core::time::DateTime;
use serde::Deserialize;

/// The parsed body of a bucket listing response.
///
/// Unknown elements in the document (owner, etag, size, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ListBucketResult {
    /// The listed objects, in the order the service returned them.
    pub contents: Vec<BucketItem>,
}

/// One object entry in a bucket listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketItem {
    /// The object key.
    pub key: String,
    /// When the object was last modified.
    pub last_modified: DateTime,
    /// Inline object content, when the service returns it.
    #[serde(default)]
    pub body: Option<String>,
}
