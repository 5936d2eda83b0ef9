//! Remote sign-in handshake: challenge issuance and callback processing.
//!
//! [`AppwriteScheme`] owns the shared [`HandshakeOptions`] and an [`AccountConnector`]. Each
//! callback builds its own provider client through the connector, so no handshake state is
//! shared between requests.

pub mod callback;
pub mod challenge;
pub mod options;
pub mod outcome;

pub use callback::*;
pub use challenge::*;
pub use options::*;
pub use outcome::*;

// self
use crate::{_prelude::*, provider::AccountConnector};
#[cfg(feature = "reqwest")] use crate::provider::ReqwestConnector;

#[cfg(feature = "reqwest")]
/// Scheme specialized for the crate's default reqwest connector.
pub type ReqwestScheme = AppwriteScheme<ReqwestConnector>;

/// Authentication scheme driving the remote sign-in handshake.
pub struct AppwriteScheme<K>
where
	K: AccountConnector,
{
	options: Arc<HandshakeOptions>,
	connector: Arc<K>,
}
impl<K> AppwriteScheme<K>
where
	K: AccountConnector,
{
	/// Creates a scheme with a caller-provided connector.
	pub fn with_connector(options: impl Into<Arc<HandshakeOptions>>, connector: K) -> Self {
		Self { options: options.into(), connector: Arc::new(connector) }
	}

	/// Shared scheme options.
	pub fn options(&self) -> &Arc<HandshakeOptions> {
		&self.options
	}

	/// Connector used to build per-callback provider clients.
	pub fn connector(&self) -> &K {
		&self.connector
	}

	/// Returns true when a request path should be routed to [`AppwriteScheme::handle_callback`].
	pub fn is_callback_path(&self, path: &str) -> bool {
		self.options.matches_callback(path)
	}
}
#[cfg(feature = "reqwest")]
impl AppwriteScheme<ReqwestConnector> {
	/// Creates a scheme backed by reqwest clients with default HTTP settings.
	pub fn new(options: impl Into<Arc<HandshakeOptions>>) -> Self {
		Self::with_connector(options, ReqwestConnector::default())
	}
}
impl<K> Clone for AppwriteScheme<K>
where
	K: AccountConnector,
{
	fn clone(&self) -> Self {
		Self { options: self.options.clone(), connector: self.connector.clone() }
	}
}
impl<K> Debug for AppwriteScheme<K>
where
	K: AccountConnector,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AppwriteScheme")
			.field("scheme", self.options.scheme())
			.field("endpoint", self.options.endpoint())
			.field("project", self.options.project())
			.field("callback_path", &self.options.callback_path())
			.finish()
	}
}
