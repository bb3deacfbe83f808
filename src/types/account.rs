//! Sending account types
//!
//! The account is the one identity that pays for every transfer in a session.
//! Its signing material lives in `Credentials`, which cannot be cloned or
//! serialized and never prints its contents.

use std::fmt;

/// Secret signing material (a hex private key for the Ethereum client)
pub struct Credentials(String);

impl Credentials {
    pub fn new(secret: impl Into<String>) -> Self {
        Credentials(secret.into())
    }

    /// Borrow the raw secret
    ///
    /// Only network clients should call this, and only to build a signer.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Fresh copy for the next session's account
    ///
    /// `Credentials` is not `Clone`; this is the only way to copy it.
    pub fn reissue(&self) -> Credentials {
        Credentials(self.0.clone())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials(<redacted>)")
    }
}

/// The sending identity
///
/// Created by `NetworkClient::open_account` once per session and moved into
/// the orchestrator, which holds it exclusively until the session ends.
#[derive(Debug)]
pub struct Account {
    address: String,
    credentials: Credentials,
}

impl Account {
    /// Create an account; the address is stored lowercase
    pub fn new(address: impl Into<String>, credentials: Credentials) -> Self {
        Account {
            address: address.into().to_lowercase(),
            credentials,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}
