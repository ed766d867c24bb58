//! Fire-and-forget side effects for the NeoMovies API.
//!
//! - [`Dispatcher`]: bounded worker pool for background jobs.
//! - [`Mailer`]: verification-code email over SMTP.
//! - [`ReactionMirror`]: pushes reaction changes to the public counter.

pub mod dispatcher;
pub mod mail;
pub mod reactions;

pub use dispatcher::Dispatcher;
pub use mail::{EmailConfig, EmailError, Mailer};
pub use reactions::ReactionMirror;
