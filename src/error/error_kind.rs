/// Describes a key manager specific error types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Error caused by the error on the client side.
    ClientError,
    /// Error caused by the lack of privileges to perform an action.
    AccessForbidden,
    /// Requested resource doesn't exist or isn't visible to the caller.
    NotFound,
    /// Requested change collides with an existing resource.
    Conflict,
    /// Required configuration is missing or disabled.
    NotConfigured,
    /// Downstream dependency (e.g. LiteLLM gateway) cannot serve the request.
    DependencyUnavailable,
    /// Unknown error.
    Unknown,
}
