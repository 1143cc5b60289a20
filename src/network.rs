//! Network URL and endpoint constants for the BuyGreen SDK.

use std::time::Duration;

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default deadline for every request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Order creation is heavier than a typical request.
pub const ORDER_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client-side safety timer around order placement.
pub const ORDER_WATCHDOG: Duration = Duration::from_secs(90);

/// Endpoints that never receive a bearer token, and whose 401s never clear
/// the session.
pub const PUBLIC_ENDPOINTS: &[&str] = &[
    "/login",
    "/signup",
    "/auth/google",
    "/forgot-password",
    "/reset-password",
];

/// Whether `path` targets one of the [`PUBLIC_ENDPOINTS`].
pub fn is_public_endpoint(path: &str) -> bool {
    PUBLIC_ENDPOINTS.iter().any(|endpoint| path.contains(endpoint))
}
