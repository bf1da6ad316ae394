// Session-scoped holder for the implicit-grant bearer token. The token
// is acquired out-of-band (browser redirect flow) and handed to us via
// flag/env; it lives exactly as long as the process and is cleared as
// soon as Spotify rejects it.
#[derive(Debug)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new(token: String) -> Self {
        let token = if token.is_empty() { None } else { Some(token) };

        Session { token }
    }

    pub fn current(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn clear(&mut self) {
        self.token = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_means_absent() {
        let session = Session::new("".to_string());
        assert!(session.current().is_none());
    }

    #[test]
    fn clear_drops_the_token() {
        let mut session = Session::new("BQabc123".to_string());
        assert_eq!(session.current(), Some("BQabc123"));

        session.clear();
        assert!(session.current().is_none());
    }
}
