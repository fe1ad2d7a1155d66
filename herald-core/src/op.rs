//! Operation identity.

use std::fmt;

/// Identifies one operation of the observed interface, by name.
///
/// An `OpId` plays the role a method selector plays in a dynamic delegate
/// system: it is the key a forwarded invocation carries and the key
/// observers declare support for. Comparison and hashing are by name.
///
/// # Example
///
/// ```rust,ignore
/// const DID_CONNECT: OpId = OpId::new("did_connect");
///
/// delegate.notify(DID_CONNECT, peer_addr);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OpId(&'static str);

impl OpId {
    /// Create an operation identifier from its name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The operation name.
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl From<&'static str> for OpId {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
