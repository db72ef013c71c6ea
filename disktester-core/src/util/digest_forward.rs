use std::io::{Result, Write};

use crate::hash::sha1::Sha1Digest;

/// Write adapter that folds bytes into a digest on their way to `inner`.
///
/// Only bytes the inner writer actually accepted are hashed, so the digest
/// always matches what reached `inner`.
pub struct DigestForward<'a, W: Write> {
    inner: W,
    digest: &'a mut Sha1Digest,
    /// Total bytes that passed through.
    pub counted: u64,
}

impl<'a, W: Write> DigestForward<'a, W> {
    pub fn new(inner: W, digest: &'a mut Sha1Digest) -> Self {
        Self {
            inner,
            digest,
            counted: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<'a, W: Write> Write for DigestForward<'a, W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let k = self.inner.write(buf)?;
        self.digest.update(&buf[..k]);
        self.counted += k as u64;
        Ok(k)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_bytes_match_direct_hash() {
        let mut sink = Vec::new();
        let mut digest = Sha1Digest::new();
        {
            let mut w = DigestForward::new(&mut sink, &mut digest);
            w.write_all(b"some bytes ").unwrap();
            w.write_all(b"in two writes").unwrap();
            assert_eq!(w.counted, 24);
        }
        let forwarded = digest.finalize_hex();

        let mut direct = Sha1Digest::new();
        direct.update(b"some bytes in two writes");
        assert_eq!(forwarded, direct.finalize_hex());
        assert_eq!(sink, b"some bytes in two writes");
    }
}
