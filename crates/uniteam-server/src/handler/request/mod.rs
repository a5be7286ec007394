//! Request types for HTTP handlers.

mod accounts;
mod authentications;
mod invitations;
mod members;
mod milestones;
mod paginations;
mod paths;
mod profiles;
mod projects;
mod templates;
mod validations;

pub use accounts::*;
pub use authentications::*;
pub use invitations::*;
pub use members::*;
pub use milestones::*;
pub use paginations::*;
pub use paths::*;
pub use profiles::*;
pub use projects::*;
pub use templates::*;
pub use validations::*;
