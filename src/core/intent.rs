use std::fmt;

/// Prefix the classifier must put before an intent token.
pub const FUNCTION_CALL_MARKER: &str = "FUNCTION_CALL:";

/// The only device-control actions the bot will ever execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    PowerOn,
    PowerOff,
    QueryStatus,
}

impl Intent {
    pub const ALL: [Intent; 3] = [Intent::PowerOn, Intent::PowerOff, Intent::QueryStatus];

    /// Canonical token used in the classifier protocol.
    pub fn token(self) -> &'static str {
        match self {
            Intent::PowerOn => "turn_on_pc",
            Intent::PowerOff => "turn_off_pc",
            Intent::QueryStatus => "check_pc_status",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.token() == token)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationResult {
    Intent(Intent),
    Conversational(String),
}

/// Outcome of reading one raw classifier reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerParse {
    /// No marker: the reply is ordinary text (already trimmed).
    Unmarked(String),
    Intent(Intent),
    /// Marker present but the token is outside the closed set.
    Unparseable(String),
}

pub fn parse_classifier_reply(raw: &str) -> MarkerParse {
    let reply = raw.trim();
    match reply.strip_prefix(FUNCTION_CALL_MARKER) {
        Some(rest) => {
            let token = rest.trim();
            match Intent::from_token(token) {
                Some(intent) => MarkerParse::Intent(intent),
                None => MarkerParse::Unparseable(token.to_string()),
            }
        }
        None => MarkerParse::Unmarked(reply.to_string()),
    }
}
