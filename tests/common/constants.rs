//! Shared constants for end-to-end tests
//!
//! When test data changes (song names, lyrics served by the fake details
//! service, timeouts), update only this file.

// ============================================================================
// Test Songs
// ============================================================================

pub const TEST_ARTIST: &str = "Muse";

pub const TEST_TITLE: &str = "Supermassive Black Hole";

pub const OTHER_ARTIST: &str = "Pink Floyd";

pub const OTHER_TITLE: &str = "Time";

// ============================================================================
// Fake Song Details Service
// ============================================================================

/// Release date served by the fake details service, in wire format
pub const DETAILS_RELEASE_DATE: &str = "16.07.2006";

/// Lyrics served by the fake details service. Three couplets.
pub const DETAILS_TEXT: &str = "Ooh baby, don't you know I suffer?\nOoh baby, can you hear me moan?\n\nYou caught me under false pretenses\nHow long before you let me go?\n\nOoh\nYou set my soul alight";

pub const DETAILS_LINK: &str = "https://www.youtube.com/watch?v=Xsp3_a-PMTw";

/// A URL nothing listens on
pub const UNREACHABLE_DETAILS_URL: &str = "http://127.0.0.1:1";

// ============================================================================
// Pagination
// ============================================================================

/// Page size the test server falls back to
pub const DEFAULT_PAGINATION_LIMIT: i32 = 10;

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for a test server to answer its first request
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout of requests made by the test client
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Delay between readiness probes
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Timeout of the server's song details client
pub const DETAILS_TIMEOUT_SECS: u64 = 2;
