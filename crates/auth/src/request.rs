//! Mapping from an HTTP request line to an enforcement (resource, action) pair.
//!
//! Kept free of any HTTP framework types so the mapping is trivially testable
//! and reusable outside the server.

/// Policy action, derived 1:1 from the HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    /// `None` for any method outside the CRUD set; an absent action can never
    /// match a policy rule, so unknown methods are always denied.
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "POST" => Some(Action::Create),
            "GET" => Some(Action::Read),
            "PUT" => Some(Action::Update),
            "DELETE" => Some(Action::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the enforcement resource and action for a request.
///
/// The resource is the path with a trailing numeric segment stripped, so
/// per-item routes (`/api/contacts/7`) enforce under the same rule as their
/// collection route (`/api/contacts`) instead of requiring one rule per id.
pub fn derive_resource_and_action(path: &str, method: &str) -> (String, Option<Action>) {
    (normalize_resource(path), Action::from_method(method))
}

fn normalize_resource(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    match segments.split_last() {
        Some((last, rest)) if last.parse::<u64>().is_ok() => rest.join("/"),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_map_one_to_one() {
        assert_eq!(Action::from_method("GET"), Some(Action::Read));
        assert_eq!(Action::from_method("POST"), Some(Action::Create));
        assert_eq!(Action::from_method("PUT"), Some(Action::Update));
        assert_eq!(Action::from_method("DELETE"), Some(Action::Delete));
    }

    #[test]
    fn unknown_methods_derive_no_action() {
        assert_eq!(Action::from_method("PATCH"), None);
        assert_eq!(Action::from_method("OPTIONS"), None);
        assert_eq!(Action::from_method("get"), None);
    }

    #[test]
    fn item_and_collection_routes_share_a_resource() {
        let (item, act) = derive_resource_and_action("/api/contacts/123", "GET");
        let (collection, _) = derive_resource_and_action("/api/contacts", "GET");

        assert_eq!(item, "/api/contacts");
        assert_eq!(item, collection);
        assert_eq!(act, Some(Action::Read));
    }

    #[test]
    fn only_trailing_non_negative_integers_are_stripped() {
        let (r, _) = derive_resource_and_action("/api/users/42", "DELETE");
        assert_eq!(r, "/api/users");

        // Non-numeric and negative trailing segments stay put.
        let (r, _) = derive_resource_and_action("/api/users/me", "GET");
        assert_eq!(r, "/api/users/me");
        let (r, _) = derive_resource_and_action("/api/items/-1", "GET");
        assert_eq!(r, "/api/items/-1");

        // Only the final segment is considered.
        let (r, _) = derive_resource_and_action("/api/properties/7/tasks", "GET");
        assert_eq!(r, "/api/properties/7/tasks");
    }

    #[test]
    fn normalization_is_idempotent() {
        let (once, _) = derive_resource_and_action("/api/contacts/123", "GET");
        let (twice, _) = derive_resource_and_action(&once, "GET");
        assert_eq!(once, twice);
    }
}
