use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One document per participant in the social graph.
///
/// `friends` is symmetric across documents: `b` appears in `a`'s list exactly
/// when `a` appears in `b`'s. `outgoing_requests` is directional. A pair is
/// never in both lists at once, in either direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub user_id: UserId,
    pub friends: Vec<UserId>,
    pub outgoing_requests: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl RelationshipRecord {
    pub fn new(user_id: UserId) -> Self {
        RelationshipRecord {
            user_id,
            friends: Vec::new(),
            outgoing_requests: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_friend(&self, other: UserId) -> bool {
        self.friends.contains(&other)
    }

    pub fn has_outgoing(&self, other: UserId) -> bool {
        self.outgoing_requests.contains(&other)
    }

    /// Guarded push: no-op when `other` is already listed.
    pub fn add_friend(&mut self, other: UserId) {
        if !self.friends.contains(&other) {
            self.friends.push(other);
        }
    }

    pub fn remove_friend(&mut self, other: UserId) -> bool {
        let before = self.friends.len();
        self.friends.retain(|u| *u != other);
        self.friends.len() != before
    }

    /// Guarded push: no-op when a request to `other` is already pending.
    pub fn add_outgoing(&mut self, other: UserId) {
        if !self.outgoing_requests.contains(&other) {
            self.outgoing_requests.push(other);
        }
    }

    pub fn remove_outgoing(&mut self, other: UserId) -> bool {
        let before = self.outgoing_requests.len();
        self.outgoing_requests.retain(|u| *u != other);
        self.outgoing_requests.len() != before
    }
}
