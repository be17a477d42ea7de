/// An allowed (role, resource, action) triple.
///
/// The policy relation is a set: inserting an existing triple is a no-op at
/// every store implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PolicyRule {
    pub role: String,
    pub resource: String,
    pub action: String,
}

impl PolicyRule {
    pub fn new(
        role: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            resource: resource.into(),
            action: action.into(),
        }
    }
}

impl core::fmt::Display for PolicyRule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.role, self.resource, self.action)
    }
}
