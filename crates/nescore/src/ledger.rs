//! VBlank/NMI ledger.
//!
//! The VBlank status flag and the CPU's NMI line are not independent pieces
//! of stored state — they are *derived* from the timestamps of four events:
//! when VBlank was last set, when it was last cleared, when $2002 was last
//! read, and when the CPU last acknowledged (serviced) an NMI. Storing those
//! timestamps and computing the flag/line as pure functions of "what cycle
//! is it now" is what lets the well-known VBlank/NMI race conditions (a
//! $2002 read landing on the exact cycle VBlank is set suppresses that
//! frame's NMI without hiding the flag; a read one cycle early both hides
//! the flag and suppresses the NMI) fall out of the model instead of needing
//! special-cased branches at every call site.
//!
//! `EmulationState::tick` is the only caller that mutates a `VBlankLedger`;
//! the PPU and CPU crates never see it.

/// Timestamped record of VBlank/NMI events, in PPU-cycle units
/// ([`crate::clock::MasterClock::ppu_cycles`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VBlankLedger {
    last_vblank_set_cycle: Option<u64>,
    last_vblank_clear_cycle: Option<u64>,
    last_status_read_cycle: Option<u64>,
    last_nmi_ack_cycle: Option<u64>,
    /// Sticky bit: set when a $2002 read lands on the exact cycle VBlank is
    /// set, so that an immediately-following read still observes VBlank=1.
    race_hold: bool,
}

impl VBlankLedger {
    /// A ledger with no events recorded.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_vblank_set_cycle: None,
            last_vblank_clear_cycle: None,
            last_status_read_cycle: None,
            last_nmi_ack_cycle: None,
            race_hold: false,
        }
    }

    /// Clear all recorded events (power-on / reset).
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Record that the VBlank flag was set at `cycle` (scanline 241, dot 1).
    pub fn record_vblank_set(&mut self, cycle: u64) {
        self.last_vblank_set_cycle = Some(cycle);
        self.race_hold = false;
    }

    /// Record that the VBlank flag was cleared at `cycle` (pre-render
    /// scanline, dot 1).
    pub fn record_vblank_clear(&mut self, cycle: u64) {
        self.last_vblank_clear_cycle = Some(cycle);
        self.race_hold = false;
    }

    /// Record that the CPU's NMI handler acknowledged the interrupt at
    /// `cycle` (the CPU's edge-detector consumed it).
    pub fn record_nmi_ack(&mut self, cycle: u64) {
        self.last_nmi_ack_cycle = Some(cycle);
    }

    /// Record a $2002 read at `cycle` and return the VBlank bit value the
    /// CPU should observe.
    pub fn record_status_read(&mut self, cycle: u64) -> bool {
        let value = self.vblank_active_for_status_read(cycle);
        if self.last_vblank_set_cycle == Some(cycle) && self.is_live() {
            // Reading on the exact set cycle still observes the flag, and
            // every read for the rest of this VBlank span must too, per
            // `buildStatusByte`'s `race_hold` term — not just the very next
            // read. Cleared only at the next `vblank_clear`/`vblank_set`.
            self.race_hold = true;
        }
        self.last_status_read_cycle = Some(cycle);
        value
    }

    /// Whether a VBlank set is currently live: `last_vblank_set_cycle >
    /// last_vblank_clear_cycle` (treating an absent set/clear as the time
    /// before everything else).
    fn is_live(&self) -> bool {
        match (self.last_vblank_set_cycle, self.last_vblank_clear_cycle) {
            (Some(set), Some(clear)) => set > clear,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Pure: whether $2002 would currently read VBlank=1 at `cycle`,
    /// without mutating any bookkeeping.
    ///
    /// Implements `buildStatusByte`'s formula directly: `is_live() AND
    /// (race_hold OR last_vblank_set_cycle > last_status_read_cycle)`.
    /// `race_hold` is sticky for the remainder of the live span once a read
    /// has raced the set cycle, so a third (or later) read during the same
    /// VBlank still observes the flag, not just the read immediately after
    /// the race.
    #[must_use]
    pub fn vblank_active_for_status_read(&self, cycle: u64) -> bool {
        let Some(set) = self.last_vblank_set_cycle else {
            return false;
        };
        if cycle < set {
            return false;
        }
        if !self.is_live() {
            return false;
        }
        if self.race_hold {
            return true;
        }
        match self.last_status_read_cycle {
            Some(read) => set > read,
            None => true,
        }
    }

    /// Pure: whether the NMI line should be asserted at `cycle`, given
    /// whether $2000 bit 7 (NMI generation) is currently enabled.
    #[must_use]
    pub fn should_assert_nmi(&self, nmi_enabled: bool, cycle: u64) -> bool {
        if !nmi_enabled {
            return false;
        }
        let Some(set) = self.last_vblank_set_cycle else {
            return false;
        };
        if cycle < set {
            return false;
        }
        if let Some(clear) = self.last_vblank_clear_cycle
            && clear > set
            && cycle >= clear
        {
            return false;
        }
        if let Some(read) = self.last_status_read_cycle {
            // A read on or after the set cycle suppresses the NMI: either it
            // raced the set (race_hold, suppressed outright) or it happened
            // afterward and already serviced/cleared the flag.
            if read >= set && read <= cycle {
                return false;
            }
        }
        if let Some(ack) = self.last_nmi_ack_cycle
            && ack >= set
            && ack <= cycle
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nmi_asserted_after_vblank_set_when_enabled() {
        let mut ledger = VBlankLedger::new();
        ledger.record_vblank_set(100);
        assert!(ledger.should_assert_nmi(true, 101));
        assert!(!ledger.should_assert_nmi(false, 101));
    }

    #[test]
    fn status_read_on_set_cycle_still_shows_vblank_but_suppresses_nmi() {
        let mut ledger = VBlankLedger::new();
        ledger.record_vblank_set(100);
        let observed = ledger.record_status_read(100);
        assert!(observed, "read on the set cycle still observes VBlank=1");
        assert!(!ledger.should_assert_nmi(true, 101));
    }

    #[test]
    fn status_read_after_set_clears_flag_for_later_cycles() {
        let mut ledger = VBlankLedger::new();
        ledger.record_vblank_set(100);
        assert!(ledger.vblank_active_for_status_read(105));
        ledger.record_status_read(105);
        assert!(!ledger.vblank_active_for_status_read(110));
        assert!(!ledger.should_assert_nmi(true, 110));
    }

    #[test]
    fn vblank_clear_resets_both_flag_and_nmi() {
        let mut ledger = VBlankLedger::new();
        ledger.record_vblank_set(100);
        ledger.record_vblank_clear(89_000);
        assert!(!ledger.vblank_active_for_status_read(89_001));
        assert!(!ledger.should_assert_nmi(true, 89_001));
    }

    #[test]
    fn race_hold_stays_sticky_for_every_read_in_the_same_vblank() {
        let mut ledger = VBlankLedger::new();
        ledger.record_vblank_set(100);
        assert!(
            ledger.record_status_read(100),
            "read racing the set cycle observes VBlank=1"
        );
        assert!(
            ledger.record_status_read(150),
            "a second read later in the same VBlank must still observe VBlank=1"
        );
        assert!(
            ledger.record_status_read(200),
            "a third read, long after the race, must still observe VBlank=1"
        );
        ledger.record_vblank_clear(300);
        assert!(!ledger.vblank_active_for_status_read(301));
    }
}
