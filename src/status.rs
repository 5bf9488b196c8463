use std::fmt;

/// HTTP status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct StatusCode(u16);

impl StatusCode {
    /// Create a new status code.
    #[inline]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the status code as a u16 value.
    #[inline]
    pub const fn code(self) -> u16 {
        self.0
    }

    /// Check if status is within 200-299.
    #[inline]
    pub const fn is_successful(&self) -> bool {
        200 <= self.0 && self.0 < 300
    }

    /// Check if status is within 400-499.
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        400 <= self.0 && self.0 < 500
    }

    /// Check if status is within 500-599.
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        500 <= self.0 && self.0 < 600
    }
}

impl From<u16> for StatusCode {
    #[inline]
    fn from(code: u16) -> Self {
        Self::new(code)
    }
}

impl From<StatusCode> for u16 {
    #[inline]
    fn from(code: StatusCode) -> Self {
        code.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq<u16> for StatusCode {
    #[inline]
    fn eq(&self, other: &u16) -> bool {
        self.code() == *other
    }
}

impl PartialEq<StatusCode> for u16 {
    #[inline]
    fn eq(&self, other: &StatusCode) -> bool {
        *self == other.code()
    }
}

/// The set of response statuses a loader treats as success.
///
/// Anything outside the set is surfaced as
/// [`Error::Status`](crate::Error::Status) carrying the numeric code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedStatuses(Vec<StatusCode>);

impl AcceptedStatuses {
    /// Builds an accepted set from the given codes.
    pub fn new(codes: impl IntoIterator<Item = u16>) -> Self {
        Self(codes.into_iter().map(StatusCode::new).collect())
    }

    /// Whether `status` belongs to the set.
    pub fn contains(&self, status: StatusCode) -> bool {
        self.0.contains(&status)
    }
}

impl Default for AcceptedStatuses {
    /// Exactly `{200, 204}`.
    fn default() -> Self {
        Self::new([200, 204])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let status = StatusCode::new(200);
        assert_eq!(status.code(), 200);
        assert!(status.is_successful());
        assert!(!status.is_client_error());
        assert!(!status.is_server_error());

        let status = StatusCode::from(404);
        assert!(!status.is_successful());
        assert!(status.is_client_error());

        let status = StatusCode::new(500);
        assert!(status.is_server_error());
    }

    #[test]
    fn test_status_code_display() {
        assert_eq!(StatusCode::new(200).to_string(), "200");
    }

    #[test]
    fn test_status_code_partial_eq() {
        let status = StatusCode::new(404);
        assert_eq!(status, 404);
        assert_eq!(404, status);
    }

    #[test]
    fn default_accepted_set_is_200_and_204() {
        let accepted = AcceptedStatuses::default();
        assert!(accepted.contains(StatusCode::new(200)));
        assert!(accepted.contains(StatusCode::new(204)));
        assert!(!accepted.contains(StatusCode::new(201)));
        assert!(!accepted.contains(StatusCode::new(404)));
    }
}
