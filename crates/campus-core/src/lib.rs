// Campus domain types
//
// DB-agnostic entity types shared by the API server and tooling:
// - Role: the closed access-level enumeration gating every protected route
// - Account: the public view of a credential record (never carries the hash)
// - StudentProfile / TeacherProfile: academic profile records linked to accounts

pub mod account;
pub mod profile;
pub mod role;

pub use account::Account;
pub use profile::{StudentProfile, TeacherProfile};
pub use role::Role;
