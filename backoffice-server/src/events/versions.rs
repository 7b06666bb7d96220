use dashmap::DashMap;

/// Resource version manager
///
/// Lock-free concurrent version numbering built on DashMap. Each entity
/// kind keeps an independent counter with atomic increment.
///
/// # Usage
///
/// Used by `publish_status_change` to stamp outgoing events with an
/// increasing version, so consumers can tell fresh data from stale.
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    /// Create an empty version manager
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// Increment the version for a resource and return the new value
    ///
    /// Unknown resources start at 0 (first increment returns 1)
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version for a resource, 0 if never incremented
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}
