//! Response types for HTTP handlers.
//!
//! Every response is serialized in camelCase. Reads embed related objects
//! while foreign keys stay available as `…Id` fields.

mod accounts;
mod authentications;
mod errors;
mod health;
mod invitations;
mod members;
mod milestones;
mod profiles;
mod projects;
mod templates;

pub use accounts::*;
pub use authentications::*;
pub use errors::*;
pub use health::*;
pub use invitations::*;
pub use members::*;
pub use milestones::*;
pub use profiles::*;
pub use projects::*;
pub use templates::*;
