//! Everything between a [`Config`] and a logged-in [`Session`].
//!
//! [`connect`] opens the socket, [`FramedStream`] cuts it into responses,
//! [`Client`] tracks the protocol state in its type, and [`Session`] wraps
//! the client behind `&mut self` methods with timeouts.

mod client;
mod config;
mod framed;
mod session;
mod stream;

pub use client::{Authenticated, Client, LoggedIn, NotAuthenticated, SelectRefused, Selected};
pub use config::{Config, Security};
pub use framed::{FramedStream, ResponseAccumulator};
pub use session::{HeaderField, Session};
pub use stream::{ImapStream, connect, create_tls_connector};
