//! # Canonical Bytes — RDFC-1.0 N-Quads Output
//!
//! `CanonicalBytes` is the byte sequence a data-integrity proof signs: the
//! UTF-8 encoding of an RDFC-1.0 canonical N-Quads document.
//!
//! ## Security Invariant
//!
//! The inner buffer is private. The constructor
//! [`CanonicalBytes::from_nquads()`] takes the finished N-Quads text, and the
//! only producer of that text in the stack is the canonicalizer in
//! `credkit-jsonld`. Digest functions accept `&CanonicalBytes` rather than
//! raw slices, so a signature over non-canonical JSON cannot be passed off as
//! a data-integrity signature.

/// UTF-8 bytes of a canonical N-Quads document.
///
/// # Invariants
///
/// - Every quad line is terminated by `\n`.
/// - Lines are in code-point order.
/// - Blank nodes carry canonical `_:c14nN` labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(String);

impl CanonicalBytes {
    /// Wrap canonical N-Quads text.
    pub fn from_nquads(nquads: String) -> Self {
        Self(nquads)
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// View the bytes as the N-Quads text they were built from.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of quads (lines) in the document.
    pub fn quad_count(&self) -> usize {
        self.0.bytes().filter(|b| *b == b'\n').count()
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the document has no quads.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the wrapper, returning the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}
