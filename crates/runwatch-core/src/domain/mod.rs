//! Domain model (records, verdicts, poller state, errors).

pub mod errors;
pub mod record;
pub mod state;
pub mod verdict;

pub use self::errors::{ErrorKind, PollerError, QueryError};
pub use self::record::StatusRecord;
pub use self::state::{PollerState, TerminalOutcome};
pub use self::verdict::{NEUTRAL_CONCLUSIONS, RUNNING_STATUSES, Verdict, classify};
