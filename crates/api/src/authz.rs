//! Request-level authorization: subject resolution plus the policy decision.

use std::sync::Arc;

use hearth_auth::{Action, UserDirectory, UserRecord};
use hearth_policy::Enforcer;

/// Decides whether a verified subject may perform an action on a resource.
///
/// Holds the two collaborators the decision needs: the user directory (for
/// the subject's current role) and the policy enforcer. Every deny path is
/// uniform for callers; the reason only surfaces in logs.
#[derive(Clone)]
pub struct RequestAuthorizer {
    directory: Arc<dyn UserDirectory>,
    enforcer: Enforcer,
}

impl RequestAuthorizer {
    pub fn new(directory: Arc<dyn UserDirectory>, enforcer: Enforcer) -> Self {
        Self {
            directory,
            enforcer,
        }
    }

    /// Authorize `email` for `action` on `resource`.
    ///
    /// Returns the resolved user record when allowed, `None` on any denial:
    /// unknown method (no action), unknown subject, store failure, or no
    /// matching policy rule. Store failures are infrastructure alerts and are
    /// logged as errors; ordinary denials are not.
    pub async fn authorize(
        &self,
        email: &str,
        resource: &str,
        action: Option<Action>,
    ) -> Option<UserRecord> {
        // An unknown method derives no action, and no action matches no rule.
        let action = action?;

        let user = match self.directory.find_by_email(email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::info!(email, "denied: subject not found");
                return None;
            }
            Err(e) => {
                tracing::error!(error = %e, "user lookup failed during authorization");
                return None;
            }
        };

        match self
            .enforcer
            .check(&user.role, resource, action.as_str())
            .await
        {
            Ok(true) => Some(user),
            Ok(false) => {
                tracing::info!(
                    email,
                    role = %user.role,
                    resource,
                    action = %action,
                    "denied: no matching policy rule"
                );
                None
            }
            Err(e) => {
                // Infrastructure failure, not a bad actor: deny the request
                // but alert loudly so health checks can catch a persistent
                // outage.
                tracing::error!(error = %e, resource, action = %action, "policy store unavailable");
                None
            }
        }
    }
}
