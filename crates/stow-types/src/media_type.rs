//! Well-known OCI media types and annotation keys.
//!
//! Media types are opaque to lookup; these constants exist so callers and
//! tests do not retype the strings.

pub const IMAGE_CONFIG: &str = "application/vnd.oci.image.config.v1+json";
pub const IMAGE_MANIFEST: &str = "application/vnd.oci.image.manifest.v1+json";
pub const IMAGE_INDEX: &str = "application/vnd.oci.image.index.v1+json";
pub const IMAGE_LAYER: &str = "application/vnd.oci.image.layer.v1.tar";
pub const IMAGE_LAYER_GZIP: &str = "application/vnd.oci.image.layer.v1.tar+gzip";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Annotation carrying the human-readable name of a piece of content.
pub const ANNOTATION_TITLE: &str = "org.opencontainers.image.title";
