//! Provider-issued token material and the bag that carries it to the session layer.

pub mod bag;
pub mod jwt;
pub mod secret;
