use core::fmt;

/// Closed set of teaching triggers. The engine never invents a kind
/// outside this list, and the suppression book-keeping is keyed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintKind {
    FollowSuitViolation,
    TrumpBeatsPlain,
    SaveHighTrump,
    ProtectFox,
    DiscardValue,
    AssistTeammate,
    KarlchenChance,
    FoxCaptured,
    ExpensiveTrickLost,
}

impl HintKind {
    pub const ALL: [HintKind; 9] = [
        HintKind::FollowSuitViolation,
        HintKind::TrumpBeatsPlain,
        HintKind::SaveHighTrump,
        HintKind::ProtectFox,
        HintKind::DiscardValue,
        HintKind::AssistTeammate,
        HintKind::KarlchenChance,
        HintKind::FoxCaptured,
        HintKind::ExpensiveTrickLost,
    ];

    /// Rule-violation feedback bypasses every suppression limit.
    pub const fn is_rule_violation(self) -> bool {
        matches!(self, HintKind::FollowSuitViolation)
    }

    pub const fn severity(self) -> Severity {
        match self {
            HintKind::FollowSuitViolation | HintKind::ProtectFox => Severity::Warning,
            HintKind::TrumpBeatsPlain
            | HintKind::SaveHighTrump
            | HintKind::DiscardValue => Severity::Tip,
            HintKind::AssistTeammate
            | HintKind::KarlchenChance
            | HintKind::FoxCaptured
            | HintKind::ExpensiveTrickLost => Severity::Info,
        }
    }

    /// Key into the static tutorial content shipped by the app shell.
    pub const fn learn_more_key(self) -> Option<&'static str> {
        match self {
            HintKind::FollowSuitViolation => Some("rules/bedienzwang"),
            HintKind::TrumpBeatsPlain => Some("rules/trumpf"),
            HintKind::SaveHighTrump => Some("tactics/trump-economy"),
            HintKind::ProtectFox | HintKind::FoxCaptured => Some("bonus/fuchs"),
            HintKind::DiscardValue => Some("tactics/abwerfen"),
            HintKind::AssistTeammate => Some("tactics/schmieren"),
            HintKind::KarlchenChance => Some("bonus/karlchen"),
            HintKind::ExpensiveTrickLost => Some("bonus/doppelkopf"),
        }
    }
}

impl fmt::Display for HintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HintKind::FollowSuitViolation => "follow-suit-violation",
            HintKind::TrumpBeatsPlain => "trump-beats-plain",
            HintKind::SaveHighTrump => "save-high-trump",
            HintKind::ProtectFox => "protect-fox",
            HintKind::DiscardValue => "discard-value",
            HintKind::AssistTeammate => "assist-teammate",
            HintKind::KarlchenChance => "karlchen-chance",
            HintKind::FoxCaptured => "fox-captured",
            HintKind::ExpensiveTrickLost => "expensive-trick-lost",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Tip,
    Warning,
}

/// One educational message. At most one is emitted per evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub kind: HintKind,
    pub title: &'static str,
    pub message: String,
    pub severity: Severity,
    pub learn_more_key: Option<&'static str>,
}

impl Hint {
    pub fn new(kind: HintKind, title: &'static str, message: String) -> Self {
        Self {
            kind,
            title,
            message,
            severity: kind.severity(),
            learn_more_key: kind.learn_more_key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Hint, HintKind, Severity};

    #[test]
    fn only_the_rule_hint_is_exempt() {
        for kind in HintKind::ALL {
            assert_eq!(
                kind.is_rule_violation(),
                kind == HintKind::FollowSuitViolation
            );
        }
    }

    #[test]
    fn hints_inherit_kind_metadata() {
        let hint = Hint::new(
            HintKind::ProtectFox,
            "Watch the Fox",
            "message".to_string(),
        );
        assert_eq!(hint.severity, Severity::Warning);
        assert_eq!(hint.learn_more_key, Some("bonus/fuchs"));
    }
}
