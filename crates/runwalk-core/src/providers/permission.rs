use super::traits::PermissionProvider;

/// Always answers the same way. Handy for headless replays and tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticPermission {
    granted: bool,
}

impl StaticPermission {
    pub fn granted() -> Self {
        Self { granted: true }
    }

    pub fn denied() -> Self {
        Self { granted: false }
    }
}

impl PermissionProvider for StaticPermission {
    async fn request_location_permission(&self) -> bool {
        self.granted
    }
}
