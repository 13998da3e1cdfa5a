//! Domain engine of the group expense-splitting service.
//!
//! The [`Engine`] owns the database pool and exposes one async method per
//! operation. Every method runs in a single unit of work ([`work::Work`]),
//! so a failing step leaves no partial writes behind.

pub use error::EngineError;
pub use groups::{Group, GroupWithCreator};
pub use invitations::{Invitation, InvitationDetails, InvitationStatus, INVITATION_TTL_DAYS};
pub use memberships::{BalanceSummary, GroupMember, Membership, UserMembership};
pub use ops::{
    Engine, EngineBuilder, GroupChanges, InvitationFilter, MAX_GROUPS_PER_USER,
    MAX_MEMBERS_PER_GROUP, Pagination, UserFilter,
};
pub use transactions::{NetBalance, NewTransaction, Transaction};
pub use users::User;

mod error;
mod groups;
mod invitations;
mod memberships;
mod ops;
mod transactions;
mod users;
mod util;
pub mod work;

type ResultEngine<T> = Result<T, EngineError>;
