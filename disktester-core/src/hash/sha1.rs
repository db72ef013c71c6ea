use sha1::{Digest, Sha1};

/// Streaming SHA-1 accumulator.
///
/// `update` may be called any number of times; the result depends only on
/// the byte sequence, not on how it was split across calls. Finalizing
/// consumes the accumulator, so finalize-twice and update-after-finalize
/// cannot be expressed.
pub struct Sha1Digest {
    inner: Sha1,
}

impl Sha1Digest {
    pub fn new() -> Self {
        Self { inner: Sha1::new() }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// Lowercase hexadecimal digest of everything fed in so far.
    pub fn finalize_hex(self) -> String {
        hex::encode(self.inner.finalize())
    }
}

impl Default for Sha1Digest {
    fn default() -> Self {
        Self::new()
    }
}
