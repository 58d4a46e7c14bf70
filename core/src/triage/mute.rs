use memchr::memmem;

use super::rules::CompiledRules;

/// Suppression sub-state of one log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MuteState {
    #[default]
    Open,
    /// Inside a region opened by mute pair `pair`; closes on its end token.
    Muted { pair: usize },
}

impl MuteState {
    pub fn is_muted(self) -> bool {
        matches!(self, Self::Muted { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteDecision {
    Pass,
    /// Matched a single-line mute phrase.
    Phrase,
    /// Opened a muted region; the opening line is dropped.
    RegionStart,
    /// Inside a muted region.
    InRegion,
    /// Closed a muted region; the closing line is dropped too.
    RegionEnd,
}

impl MuteDecision {
    pub fn is_dropped(self) -> bool {
        !matches!(self, Self::Pass)
    }
}

/// Decide the fate of a non-empty content line and update `state`.
pub fn decide(state: &mut MuteState, line: &[u8], rules: &CompiledRules) -> MuteDecision {
    if let MuteState::Muted { pair } = *state {
        let closes = match rules.mute_pairs.get(pair) {
            Some(p) => memmem::find(line, &p.end).is_some(),
            // unknown pair index, treat the region as closed
            None => true,
        };
        if closes {
            *state = MuteState::Open;
            return MuteDecision::RegionEnd;
        }
        return MuteDecision::InRegion;
    }

    if rules
        .mute_lines
        .iter()
        .any(|phrase| memmem::find(line, phrase).is_some())
    {
        return MuteDecision::Phrase;
    }

    if let Some(pair) = rules
        .mute_pairs
        .iter()
        .position(|p| memmem::find(line, &p.start).is_some())
    {
        *state = MuteState::Muted { pair };
        return MuteDecision::RegionStart;
    }

    MuteDecision::Pass
}
