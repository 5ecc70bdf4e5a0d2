//! # Attachment Value Object

use serde::{Deserialize, Serialize};

/// A file reference attached to an RFQ.
///
/// Upload and storage of the underlying file are handled outside this
/// core; the RFQ only carries the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Location of the stored file.
    pub url: String,
    /// Display name.
    pub name: String,
    /// MIME type or coarse kind reported by the uploader.
    pub kind: String,
}

impl Attachment {
    /// Creates an attachment reference.
    #[must_use]
    pub fn new(url: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            kind: kind.into(),
        }
    }
}
