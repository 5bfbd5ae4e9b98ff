// Env values used by the credential providers.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

// Vendor-metadata header prefixes. Headers under `X_AMZ_PREFIX` participate
// in the signature; headers under `X_AMZ_META_PREFIX` carry user-defined
// object metadata.
pub const X_AMZ_PREFIX: &str = "x-amz-";
pub const X_AMZ_META_PREFIX: &str = "x-amz-meta-";
