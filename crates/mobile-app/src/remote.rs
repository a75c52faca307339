// SPDX-FileCopyrightText: Copyright (C) 2025-2026 ludoteka contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Identifies one remote mutation round trip.
///
/// Tokens are issued in monotonically increasing order per item and
/// compared at completion time to detect and ignore stale completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Guards a remote-backed item against overlapping mutations and
/// against stale or replayed completions.
///
/// At most one round trip may be outstanding at a time. A completion
/// settles the gate only if it carries the token of the outstanding
/// round trip; replaying a completed token has no further effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationGate {
    last_issued: u64,
    pending: Option<RequestToken>,
}

impl MutationGate {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Issue the token for the next round trip.
    ///
    /// Rejected while another round trip is still outstanding.
    #[must_use]
    pub fn try_start(&mut self) -> Option<RequestToken> {
        if self.pending.is_some() {
            return None;
        }
        self.last_issued += 1;
        let token = RequestToken(self.last_issued);
        self.pending = Some(token);
        Some(token)
    }

    /// Settle the outstanding round trip.
    ///
    /// Returns `false` for stale completions, which must be ignored by
    /// the caller.
    pub fn finish(&mut self, token: RequestToken) -> bool {
        if self.pending != Some(token) {
            log::debug!(
                "Ignoring stale completion: {token:?} (pending: {pending:?})",
                pending = self.pending
            );
            return false;
        }
        self.pending = None;
        true
    }

    /// Abandon the outstanding round trip, if any.
    pub fn reset(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_outstanding_round_trip() {
        let mut gate = MutationGate::default();
        assert!(!gate.is_pending());
        let first = gate.try_start().expect("idle");
        assert!(gate.is_pending());
        // A second start is rejected until the first one settles.
        assert_eq!(gate.try_start(), None);
        assert!(gate.finish(first));
        let second = gate.try_start().expect("idle again");
        assert_ne!(first, second);
    }

    #[test]
    fn tokens_increase_monotonically() {
        let mut gate = MutationGate::default();
        let first = gate.try_start().unwrap();
        gate.finish(first);
        let second = gate.try_start().unwrap();
        assert!(first < second);
    }

    #[test]
    fn replayed_completion_has_no_effect() {
        let mut gate = MutationGate::default();
        let token = gate.try_start().unwrap();
        assert!(gate.finish(token));
        assert!(!gate.finish(token));
        assert!(!gate.is_pending());
    }

    #[test]
    fn stale_completion_after_reset_is_ignored() {
        let mut gate = MutationGate::default();
        let stale = gate.try_start().unwrap();
        gate.reset();
        let fresh = gate.try_start().unwrap();
        assert!(!gate.finish(stale));
        assert!(gate.is_pending());
        assert!(gate.finish(fresh));
    }
}
