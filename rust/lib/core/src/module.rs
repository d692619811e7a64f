use axum::Router;

/// A unit of the server that contributes HTTP routes.
///
/// `catalogd` nests each module's router under `/{name}`.
pub trait Module: Send + Sync {
    /// Route prefix and log label.
    fn name(&self) -> &str;

    /// Routes relative to the module prefix.
    fn routes(&self) -> Router;
}
