use crate::models::PredictionMatrix;
use crate::services::artifacts::ArtifactStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error};

/// Where the directory reads known usernames from.
pub trait UserSource: Send + Sync {
    fn usernames(&self) -> Result<Vec<String>>;
}

impl UserSource for PredictionMatrix {
    fn usernames(&self) -> Result<Vec<String>> {
        Ok(self.users().to_vec())
    }
}

impl UserSource for ArtifactStore {
    fn usernames(&self) -> Result<Vec<String>> {
        self.predictions().usernames()
    }
}

pub struct UserDirectory {
    source: Arc<dyn UserSource>,
}

impl UserDirectory {
    pub fn new(source: Arc<dyn UserSource>) -> Self {
        Self { source }
    }

    /// Known usernames, sorted ascending without duplicates. A non-empty
    /// `filter` keeps only names containing it, ignoring case.
    ///
    /// Never fails: a source error is logged and yields an empty list.
    pub fn list_users(&self, filter: Option<&str>) -> Vec<String> {
        let mut users = match self.source.usernames() {
            Ok(users) => users,
            Err(e) => {
                error!("Username retrieval failed: {:#}", e);
                return Vec::new();
            }
        };

        if let Some(needle) = filter.filter(|f| !f.is_empty()) {
            let needle = needle.to_lowercase();
            users.retain(|user| user.to_lowercase().contains(&needle));
        }

        users.sort();
        users.dedup();
        debug!("Listed {} users (filter: {:?})", users.len(), filter);
        users
    }
}
