//! Constants used by the access gate.

use crate::Section;

/// Section every redirect lands on. Every role must be allowed here.
pub const DEFAULT_SECTION: Section = Section::Dashboard;

/// Unauthenticated login page.
pub const LOGIN_PATH: &str = "login";

/// Unauthenticated public queue display (waiting-room screen).
pub const QUEUE_DISPLAY_PATH: &str = "queue-display";
