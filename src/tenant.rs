//! Tenant directory and usage counters
//!
//! Resolves tenant ids to records and enforces activation state at time of
//! use. Usage counters are atomic so concurrent requests for the same
//! tenant never lose increments.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Point-in-time view of a tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRecord {
    /// Tenant id
    pub id: String,
    /// Whether the account may be served
    pub is_active: bool,
    /// Lifetime message count
    pub total_messages: u64,
    /// Lifetime conversation count
    pub total_conversations: u64,
}

impl TenantRecord {
    /// New active tenant with zeroed counters
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_active: true,
            total_messages: 0,
            total_conversations: 0,
        }
    }
}

struct TenantEntry {
    is_active: bool,
    total_messages: AtomicU64,
    total_conversations: AtomicU64,
}

/// In-memory tenant directory
///
/// Activation state is read on every call; nothing is cached across
/// requests.
pub struct TenantDirectory {
    tenants: DashMap<String, TenantEntry>,
}

impl TenantDirectory {
    /// Empty directory
    pub fn new() -> Self {
        Self {
            tenants: DashMap::new(),
        }
    }

    /// Register or replace a tenant; administrative entry point
    pub fn insert(&self, record: TenantRecord) {
        self.tenants.insert(
            record.id,
            TenantEntry {
                is_active: record.is_active,
                total_messages: AtomicU64::new(record.total_messages),
                total_conversations: AtomicU64::new(record.total_conversations),
            },
        );
    }

    /// Toggle activation state; administrative entry point
    pub fn set_active(&self, tenant_id: &str, active: bool) -> Result<(), AuthError> {
        let mut entry = self
            .tenants
            .get_mut(tenant_id)
            .ok_or_else(|| AuthError::NotFound(format!("tenant {} not found", tenant_id)))?;
        entry.is_active = active;
        Ok(())
    }

    /// Resolve a tenant and enforce its activation state
    ///
    /// Missing id fails validation, unknown id fails not-found, inactive
    /// tenant fails forbidden.
    pub fn verify_client(&self, tenant_id: Option<&str>) -> Result<TenantRecord, AuthError> {
        let id = match tenant_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(AuthError::Validation("tenant id is required".into())),
        };

        let entry = self
            .tenants
            .get(id)
            .ok_or_else(|| AuthError::NotFound(format!("tenant {} not found", id)))?;

        if !entry.is_active {
            tracing::debug!(tenant_id = id, "inactive tenant rejected");
            return Err(AuthError::Authorization(format!(
                "tenant {} is inactive",
                id
            )));
        }

        Ok(TenantRecord {
            id: id.to_string(),
            is_active: true,
            total_messages: entry.total_messages.load(Ordering::Relaxed),
            total_conversations: entry.total_conversations.load(Ordering::Relaxed),
        })
    }

    /// Add usage deltas to the tenant's running counters
    ///
    /// Zero deltas are valid no-ops. Increments are atomic; concurrent
    /// callers for the same tenant sum exactly.
    pub fn increment_stats(
        &self,
        tenant_id: &str,
        messages: u64,
        conversations: u64,
    ) -> Result<(), AuthError> {
        if tenant_id.is_empty() {
            return Err(AuthError::Validation("tenant id is required".into()));
        }

        let entry = self
            .tenants
            .get(tenant_id)
            .ok_or_else(|| AuthError::NotFound(format!("tenant {} not found", tenant_id)))?;

        if messages > 0 {
            entry.total_messages.fetch_add(messages, Ordering::Relaxed);
        }
        if conversations > 0 {
            entry
                .total_conversations
                .fetch_add(conversations, Ordering::Relaxed);
        }
        Ok(())
    }
}

impl Default for TenantDirectory {
    fn default() -> Self {
        Self::new()
    }
}
