//! Mapping from engine values to API bodies.

use api_types::{
    PageQuery,
    group::Group,
    invitation::Invitation,
    membership::{Membership, Summary},
    transaction::{NetBalance, Transaction},
    user::User,
};
use engine::Pagination;

const DEFAULT_LIMIT: u64 = 10;
/// Used when `limit` is present but not a number.
const FALLBACK_LIMIT: u64 = 30;

pub(crate) fn pagination(query: &PageQuery) -> Pagination {
    let limit = match query.limit.as_deref() {
        None | Some("") => DEFAULT_LIMIT,
        Some(raw) => raw.parse().unwrap_or(FALLBACK_LIMIT),
    };
    let offset = query
        .offset
        .as_deref()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0);
    Pagination { limit, offset }
}

pub(crate) fn user(user: engine::User) -> User {
    User {
        id: user.id,
        name: user.name,
        email: user.email,
        created_at: user.created_at,
    }
}

pub(crate) fn group(group: engine::Group, creator: Option<engine::User>) -> Group {
    Group {
        id: group.id,
        name: group.name,
        tag: group.tag,
        total_spent: group.total_spent,
        created_by: group.created_by,
        created_at: group.created_at,
        creator: creator.map(user),
    }
}

pub(crate) fn summary(summary: engine::BalanceSummary) -> Summary {
    Summary {
        user_id: summary.user_id,
        outgoing_amount: summary.outgoing_amount,
        incoming_amount: summary.incoming_amount,
    }
}

pub(crate) fn membership(membership: engine::Membership) -> Membership {
    Membership {
        id: membership.id,
        user_id: membership.user_id,
        group_id: membership.group_id,
        outgoing_amount: membership.outgoing_amount,
        incoming_amount: membership.incoming_amount,
        created_at: membership.created_at,
        user: None,
        group: None,
        summary: None,
    }
}

pub(crate) fn group_member(member: engine::GroupMember) -> Membership {
    Membership {
        user: Some(user(member.user)),
        summary: Some(summary(member.summary)),
        ..membership(member.membership)
    }
}

pub(crate) fn user_membership(entry: engine::UserMembership) -> Membership {
    Membership {
        group: Some(group(entry.group, None)),
        summary: Some(summary(entry.summary)),
        ..membership(entry.membership)
    }
}

pub(crate) fn invitation(invitation: engine::Invitation) -> Invitation {
    Invitation {
        id: invitation.id,
        user_id: invitation.user_id,
        invited_by: invitation.invited_by,
        group_id: invitation.group_id,
        is_accepted: invitation.is_accepted,
        expires_on: invitation.expires_on,
        created_at: invitation.created_at,
        user: None,
        inviter: None,
        group: None,
    }
}

pub(crate) fn invitation_details(details: engine::InvitationDetails) -> Invitation {
    Invitation {
        user: details.user.map(user),
        inviter: details.invited_by.map(user),
        group: details.group.map(|g| group(g, None)),
        ..invitation(details.invitation)
    }
}

pub(crate) fn transaction(tx: engine::Transaction) -> Transaction {
    Transaction {
        id: tx.id,
        group_id: tx.group_id,
        payer_id: tx.payer_id,
        payee_id: tx.payee_id,
        amount: tx.amount,
        description: tx.description,
        is_paid: tx.is_paid,
        is_adjusted: tx.is_adjusted,
        created_at: tx.created_at,
    }
}

pub(crate) fn net_balance(balance: engine::NetBalance) -> NetBalance {
    NetBalance {
        counterparty_id: balance.counterparty_id,
        amount: balance.amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, offset: Option<&str>) -> PageQuery {
        PageQuery {
            limit: limit.map(str::to_string),
            offset: offset.map(str::to_string),
        }
    }

    #[test]
    fn pagination_defaults() {
        assert_eq!(
            pagination(&query(None, None)),
            Pagination {
                limit: 10,
                offset: 0
            }
        );
    }

    #[test]
    fn pagination_parses_numbers() {
        assert_eq!(
            pagination(&query(Some("5"), Some("15"))),
            Pagination {
                limit: 5,
                offset: 15
            }
        );
    }

    #[test]
    fn unparsable_values_fall_back() {
        assert_eq!(
            pagination(&query(Some("lots"), Some("-1"))),
            Pagination {
                limit: 30,
                offset: 0
            }
        );
    }
}
