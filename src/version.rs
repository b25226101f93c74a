/// The current version of the application.
/// This should match the version in Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the application
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// The description of the application
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Sent as the `User-Agent` of API requests.
pub fn user_agent() -> String {
    format!("{}/{}", APP_NAME, VERSION)
}
