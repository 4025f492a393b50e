//! Client-side session state: request-id counter and captured session id.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};

use crate::SESSION_HEADER;

/// Accept header value: the server may answer plain JSON or SSE-framed.
const ACCEPT_BOTH: &str = "application/json, text/event-stream";

/// One logical connection's worth of client state.
///
/// Owned by a single caller; the id counter is a plain integer because the
/// client issues requests strictly one at a time (`&mut self` on every
/// transport call enforces this at compile time). Nothing is persisted; the
/// session dies with the value.
#[derive(Debug, Default)]
pub struct Session {
    session_id: Option<String>,
    next_id: i64,
}

impl Session {
    /// Fresh session: no server id yet, counter starting at 1.
    pub fn new() -> Self {
        Self {
            session_id: None,
            next_id: 1,
        }
    }

    /// Return the current request id and advance the counter.
    pub fn next_request_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Store the server-issued session id, first writer wins.
    ///
    /// Once captured the id is immutable for the life of the session.
    pub fn capture_session_id(&mut self, headers: &HeaderMap) {
        if self.session_id.is_some() {
            return;
        }
        if let Some(id) = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok()) {
            self.session_id = Some(id.to_string());
        }
    }

    /// The captured session id, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Headers for the next outgoing request.
    pub fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_BOTH));
        if let Some(id) = &self.session_id {
            if let Ok(value) = HeaderValue::from_str(id) {
                headers.insert(SESSION_HEADER, value);
            }
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_headers(session_id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_str(session_id).unwrap());
        headers
    }

    #[test]
    fn test_request_ids_increase_from_one() {
        let mut session = Session::new();
        assert_eq!(session.next_request_id(), 1);
        assert_eq!(session.next_request_id(), 2);
        assert_eq!(session.next_request_id(), 3);
    }

    #[test]
    fn test_counter_advances_regardless_of_outcome() {
        // The caller burns an id even when the request fails; ids are never
        // reused.
        let mut session = Session::new();
        let _failed = session.next_request_id();
        assert_eq!(session.next_request_id(), 2);
    }

    #[test]
    fn test_capture_session_id_once() {
        let mut session = Session::new();
        assert_eq!(session.session_id(), None);

        session.capture_session_id(&response_headers("abc-123"));
        assert_eq!(session.session_id(), Some("abc-123"));

        // Later responses cannot overwrite it.
        session.capture_session_id(&response_headers("other-id"));
        assert_eq!(session.session_id(), Some("abc-123"));
    }

    #[test]
    fn test_capture_ignores_missing_header() {
        let mut session = Session::new();
        session.capture_session_id(&HeaderMap::new());
        assert_eq!(session.session_id(), None);
    }

    #[test]
    fn test_headers_without_session() {
        let session = Session::new();
        let headers = session.build_headers();

        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(
            headers.get(ACCEPT).unwrap(),
            "application/json, text/event-stream"
        );
        assert!(headers.get(SESSION_HEADER).is_none());
    }

    #[test]
    fn test_headers_with_session() {
        let mut session = Session::new();
        session.capture_session_id(&response_headers("abc-123"));

        let headers = session.build_headers();
        assert_eq!(headers.get(SESSION_HEADER).unwrap(), "abc-123");
    }
}
