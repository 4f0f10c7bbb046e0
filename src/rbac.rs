//! Role-based access decisions

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::token::Role;

/// Closed set of gated platform actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Create, suspend, or remove tenant accounts
    ManageTenants,
    /// View cross-tenant usage analytics
    ViewAnalytics,
    /// Change a tenant's widget configuration
    ConfigureWidget,
    /// Browse a tenant's conversation history
    ViewConversations,
    /// Post a message into a conversation
    SendMessage,
    /// Edit own account settings
    ManageAccount,
}

/// Immutable action-to-roles decision table
///
/// Built once at startup; `check_permission` has no hidden state and is
/// safe to call from any request task.
pub struct PermissionTable {
    rules: HashMap<Action, HashSet<Role>>,
}

impl PermissionTable {
    /// Build a table from explicit rules
    pub fn new(rules: HashMap<Action, HashSet<Role>>) -> Self {
        Self { rules }
    }

    /// Check whether `role` may perform `action`
    ///
    /// An action absent from the table is a configuration error, distinct
    /// from a permission denial.
    pub fn check_permission(&self, role: Role, action: Action) -> Result<(), AuthError> {
        let allowed = self.rules.get(&action).ok_or_else(|| {
            AuthError::Configuration(format!("no permission rule for action {:?}", action))
        })?;

        if allowed.contains(&role) {
            Ok(())
        } else {
            Err(AuthError::Authorization(format!(
                "role {:?} may not perform {:?}",
                role, action
            )))
        }
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        use Action::*;
        let mut rules = HashMap::new();
        rules.insert(ManageTenants, HashSet::from([Role::Admin]));
        rules.insert(ViewAnalytics, HashSet::from([Role::Admin]));
        rules.insert(ConfigureWidget, HashSet::from([Role::Admin, Role::Client]));
        rules.insert(ViewConversations, HashSet::from([Role::Admin, Role::Client]));
        rules.insert(SendMessage, HashSet::from([Role::Admin, Role::Client]));
        rules.insert(ManageAccount, HashSet::from([Role::Admin, Role::Client]));
        Self { rules }
    }
}
