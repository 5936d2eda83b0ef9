//! Auth-domain identifiers, scope lists, claims, and token models.

pub mod claims;
pub mod id;
pub mod scope;
pub mod token;

pub use claims::*;
pub use id::*;
pub use scope::*;
pub use token::{bag::*, jwt::*, secret::*};
