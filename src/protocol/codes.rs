//! DICT status codes
//!
//! Reply codes from RFC 2229 section 3 and their framing rules. The parser
//! only needs to know two things about a code: whether a text body follows
//! the status line, and whether more status lines follow for the same
//! command. Everything else is left to the caller.

// 1xx - Preliminary
/// n databases present - text follows
pub const DATABASES_PRESENT: u16 = 110;
/// n strategies available - text follows
pub const STRATEGIES_AVAILABLE: u16 = 111;
/// database information follows
pub const DATABASE_INFO: u16 = 112;
/// help text follows
pub const HELP_TEXT: u16 = 113;
/// server information follows
pub const SERVER_INFO: u16 = 114;
/// n definitions retrieved - definitions follow
pub const DEFINITIONS_RETRIEVED: u16 = 150;
/// word database name - text follows
pub const DEFINITION: u16 = 151;
/// n matches found - text follows
pub const MATCHES_FOUND: u16 = 152;

// 2xx - Completion
/// connection banner
pub const BANNER: u16 = 220;
/// closing connection
pub const CLOSING: u16 = 221;
/// authentication successful
pub const AUTH_OK: u16 = 230;
/// ok
pub const OK: u16 = 250;

// 4xx - Transient failure
pub const TEMPORARILY_UNAVAILABLE: u16 = 420;
pub const SHUTTING_DOWN: u16 = 421;

// 5xx - Permanent failure
pub const SYNTAX_ERROR: u16 = 500;
pub const ILLEGAL_PARAMETERS: u16 = 501;
pub const NOT_IMPLEMENTED: u16 = 502;
pub const PARAMETER_NOT_IMPLEMENTED: u16 = 503;
pub const ACCESS_DENIED: u16 = 530;
pub const AUTH_DENIED: u16 = 531;
pub const UNKNOWN_MECHANISM: u16 = 532;
pub const INVALID_DATABASE: u16 = 550;
pub const INVALID_STRATEGY: u16 = 551;
pub const NO_MATCH: u16 = 552;
pub const NO_DATABASES: u16 = 554;
pub const NO_STRATEGIES: u16 = 555;

/// Reply class, from the first digit of the code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 1yz: more is coming for this command
    Preliminary,
    /// 2yz: command finished
    Completion,
    /// 3yz: server waits for more client input
    Continuation,
    /// 4yz: try again later
    TransientFailure,
    /// 5yz: command failed
    PermanentFailure,
    /// anything outside 100..=599
    Unknown,
}

impl StatusClass {
    pub fn of(code: u16) -> Self {
        match code {
            100..=199 => Self::Preliminary,
            200..=299 => Self::Completion,
            300..=399 => Self::Continuation,
            400..=499 => Self::TransientFailure,
            500..=599 => Self::PermanentFailure,
            _ => Self::Unknown,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Preliminary | Self::Completion | Self::Continuation)
    }
}

/// Whether a text body (terminated by a lone `.`) follows this status line
#[inline]
pub fn carries_text(code: u16) -> bool {
    matches!(
        code,
        DATABASES_PRESENT
            | STRATEGIES_AVAILABLE
            | DATABASE_INFO
            | HELP_TEXT
            | SERVER_INFO
            | DEFINITION
            | MATCHES_FOUND
    )
}

/// Whether another status line follows this one without a body in between
#[inline]
pub fn is_preliminary(code: u16) -> bool {
    code == DEFINITIONS_RETRIEVED
}
