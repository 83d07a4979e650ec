use waypoint_remote::RemoteError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The persistence mutation failed; the optimistic local edit has
    /// been rolled back before this error is returned.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
