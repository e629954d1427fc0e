//! Request and upstream body types the gateway inspects.
//!
//! Job and applicant records themselves are owned by the upstream API and
//! relayed as JSON; only inputs the gateway validates are typed here.

pub mod applicant;
pub mod job;
pub mod user;

pub use applicant::{ApplicantStatus, StatusChange, StatusUpdate};
pub use job::{JobCreationInput, NewJob};
pub use user::{Credentials, LoginRequest, NewAccount, Role, SignupProblem, SignupRequest};
