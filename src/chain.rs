// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Bounded logging of failure cause chains.

use anyhow::Error;

use crate::correlation::CorrelationId;
use crate::policy::LogLevel;
use crate::record::{InvocationEvent, LogRecord};
use crate::sink::LogSink;

/// Deepest cause that still gets logged; entries beyond depth 4 are cut
/// so malformed or cyclic chains cannot run away.
pub const MAX_CHAIN_DEPTH: usize = 4;

/// Log every cause of `failure` at error severity, root first.
///
/// Each link carries a 0-based depth counter. Before descending to the
/// next cause a one-line inner-cause marker is emitted, so the stream
/// stays intelligible if it is truncated mid-chain. Traversal stops when
/// the chain is exhausted or [`MAX_CHAIN_DEPTH`] is reached, so at most
/// five links are logged. This path never fails.
pub fn log_failure_chain(
    sink: &dyn LogSink,
    correlation: CorrelationId,
    method: &str,
    failure: &Error,
) {
    let mut causes = failure.chain().enumerate().peekable();

    while let Some((depth, cause)) = causes.next() {
        sink.emit(&LogRecord::new(
            LogLevel::Error,
            correlation,
            method,
            InvocationEvent::ChainLink {
                depth,
                message: cause.to_string(),
            },
        ));

        if let Some((_, next)) = causes.peek() {
            sink.emit(&LogRecord::new(
                LogLevel::Error,
                correlation,
                method,
                InvocationEvent::InnerCause {
                    message: next.to_string(),
                },
            ));
        }

        if depth == MAX_CHAIN_DEPTH {
            break;
        }
    }
}
