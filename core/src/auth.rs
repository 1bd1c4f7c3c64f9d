//! Request signing for the catalog API.
//!
//! Server-side applications authenticate every call with three query
//! parameters: a timestamp `ts`, the public key `apikey`, and
//! `hash = md5(ts + private_key + public_key)` as lowercase hex.

use md5::{Digest, Md5};

/// Public/private key pair issued by the catalog's developer portal.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub public_key: String,
    pub private_key: String,
}

// Keep the private key out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    pub fn hash(&self, ts: &str) -> String {
        signature(ts, &self.private_key, &self.public_key)
    }

    /// The `ts`, `apikey` and `hash` query pairs for one request.
    pub fn query(&self, ts: &str) -> Vec<(String, String)> {
        vec![
            ("ts".to_string(), ts.to_string()),
            ("apikey".to_string(), self.public_key.clone()),
            ("hash".to_string(), self.hash(ts)),
        ]
    }
}

/// `md5(ts + private_key + public_key)` as lowercase hex.
pub fn signature(ts: &str, private_key: &str, public_key: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(ts.as_bytes());
    hasher.update(private_key.as_bytes());
    hasher.update(public_key.as_bytes());
    hex::encode(hasher.finalize())
}
