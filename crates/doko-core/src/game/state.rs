use crate::game::score::{Achievement, GameResult, TeamScores, detect_achievements};
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::player::Player;
use crate::model::rank::RankSet;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use crate::model::team::Team;
use crate::model::trick::Trick;
use crate::rules::legal::legal_moves;
use crate::rules::trump::TrumpOrder;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rank_set: RankSet,
    pub trump_suit: Suit,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rank_set: RankSet::WithNines,
            trump_suit: Suit::Diamonds,
        }
    }
}

/// Lifecycle of one game. Dealing and Announcements complete inside the
/// constructor (announcements carry no blocking logic in this contract),
/// so an observed state is Playing, Scoring or Finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Dealing,
    Announcements,
    Playing,
    Scoring,
    Finished,
}

#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    order: TrumpOrder,
    players: [Player; 4],
    current_trick: Trick,
    trick_history: Vec<Trick>,
    scores: TeamScores,
    achievements: Vec<Achievement>,
    phase: Phase,
    result: Option<GameResult>,
    seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played,
    TrickCompleted { winner: Seat, points: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    NotInPlayPhase,
    TrickFull,
    CardNotInHand(Card),
    MustFollowSuit(Suit),
    MustPlayTrump,
    Trick(crate::model::trick::TrickError),
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::NotInPlayPhase => write!(f, "no card play is accepted in this phase"),
            PlayError::TrickFull => write!(f, "the current trick already holds four cards"),
            PlayError::CardNotInHand(card) => {
                write!(f, "{card} is not in the acting player's hand")
            }
            PlayError::MustFollowSuit(suit) => {
                write!(f, "a plain {suit} card must be served")
            }
            PlayError::MustPlayTrump => write!(f, "trump was led and must be served"),
            PlayError::Trick(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for PlayError {}

impl PlayError {
    /// Optional teaching text alongside the bare reason.
    pub fn explanation(&self) -> Option<&'static str> {
        match self {
            PlayError::MustFollowSuit(_) => Some(
                "Whoever holds a plain card of the led suit has to play one. \
                 Trump cards of the same printed suit do not count.",
            ),
            PlayError::MustPlayTrump => Some(
                "When a trump card leads the trick, every player holding \
                 trump has to answer with one.",
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnounceError {
    NotInPlayPhase,
    AlreadyAnnounced(Seat),
    WrongTeam { seat: Seat, claimed: Team },
}

impl fmt::Display for AnnounceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnounceError::NotInPlayPhase => write!(f, "announcements are only taken during play"),
            AnnounceError::AlreadyAnnounced(seat) => {
                write!(f, "{seat} has already announced")
            }
            AnnounceError::WrongTeam { seat, claimed } => {
                write!(f, "{seat} cannot announce {claimed}")
            }
        }
    }
}

impl std::error::Error for AnnounceError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeError {
    NotInScoringPhase(Phase),
}

impl fmt::Display for FinalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalizeError::NotInScoringPhase(phase) => {
                write!(f, "final tally requested in phase {phase:?}")
            }
        }
    }
}

impl std::error::Error for FinalizeError {}

/// Re is whoever holds a Queen of Clubs. `None` when both marker queens
/// sit in one hand -- that deal belongs to the unsupported marriage
/// contract and must not reach play.
pub fn assign_teams(hands: &[Hand; 4]) -> Option<[Team; 4]> {
    let mut teams = [Team::Kontra; 4];
    let mut re_count = 0;
    for (index, hand) in hands.iter().enumerate() {
        if hand
            .iter()
            .any(|card| card.is_queen_of_clubs())
        {
            teams[index] = Team::Re;
            re_count += 1;
        }
    }
    (re_count == 2).then_some(teams)
}

impl GameState {
    const MAX_DEAL_ATTEMPTS: usize = 256;

    pub fn new(names: [String; 4], config: GameConfig) -> Self {
        Self::with_seed(names, config, Seat::North, rand::random())
    }

    /// Deal a game deterministically. Deals that do not split the marker
    /// queens 2-vs-2 are thrown back and the RNG advances to the next
    /// shuffle, so every seed still yields a standard-contract game.
    pub fn with_seed(names: [String; 4], config: GameConfig, first_leader: Seat, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut attempts = 0;
        let (hands, teams) = loop {
            attempts += 1;
            assert!(
                attempts <= Self::MAX_DEAL_ATTEMPTS,
                "no 2-vs-2 deal within {} shuffles of seed {seed}",
                Self::MAX_DEAL_ATTEMPTS
            );
            let deck = Deck::shuffled(config.rank_set, &mut rng);
            let hands = deck.deal();
            if let Some(teams) = assign_teams(&hands) {
                break (hands, teams);
            }
        };

        debug_assert!(Deck::validate_deal(config.rank_set, &hands).is_ok());

        let mut name_iter = names.into_iter();
        let mut hand_iter = hands.into_iter();
        let mut team_iter = teams.into_iter();
        let players: [Player; 4] = std::array::from_fn(|_| {
            Player::new(
                name_iter.next().expect("four names"),
                hand_iter.next().expect("four hands"),
                team_iter.next().expect("four teams"),
            )
        });

        // Dealing and the announcement pass-through are complete; the
        // game opens directly in the play phase.
        Self {
            config,
            order: TrumpOrder::new(config.trump_suit),
            players,
            current_trick: Trick::new(first_leader),
            trick_history: Vec::new(),
            scores: TeamScores::new(),
            achievements: Vec::new(),
            phase: Phase::Playing,
            result: None,
            seed,
        }
    }

    /// Reassemble a state from snapshot parts. The caller is responsible
    /// for integrity checks; this constructor only wires the pieces and,
    /// for a finished game, re-derives the result from the archive.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        config: GameConfig,
        seed: u64,
        players: [Player; 4],
        current_trick: Trick,
        trick_history: Vec<Trick>,
        scores: TeamScores,
        achievements: Vec<Achievement>,
        phase: Phase,
    ) -> Self {
        let mut state = Self {
            config,
            order: TrumpOrder::new(config.trump_suit),
            players,
            current_trick,
            trick_history,
            scores,
            achievements,
            phase,
            result: None,
            seed,
        };
        if matches!(state.phase, Phase::Finished) {
            let teams = state.teams();
            state.result = Some(GameResult::tally(
                &state.trick_history,
                &teams,
                &state.achievements,
                &state.order,
            ));
        }
        state
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn trump_order(&self) -> &TrumpOrder {
        &self.order
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[Player; 4] {
        &self.players
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        self.players[seat.index()].hand()
    }

    pub fn teams(&self) -> [Team; 4] {
        std::array::from_fn(|index| self.players[index].team())
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn trick_history(&self) -> &[Trick] {
        &self.trick_history
    }

    pub fn tricks_completed(&self) -> usize {
        self.trick_history.len()
    }

    pub fn total_tricks(&self) -> usize {
        self.config.rank_set.tricks_per_game()
    }

    pub fn scores(&self) -> &TeamScores {
        &self.scores
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    /// The seat expected to act next.
    pub fn current_seat(&self) -> Seat {
        self.current_trick.expected_seat()
    }

    pub fn legal_moves(&self) -> Vec<Card> {
        self.legal_moves_for(self.current_seat())
    }

    pub fn legal_moves_for(&self, seat: Seat) -> Vec<Card> {
        let hand = self.players[seat.index()].hand();
        if hand.is_empty() {
            return Vec::new();
        }
        legal_moves(hand, &self.current_trick, &self.order)
    }

    /// The single mutating entry point during play. The acting seat is
    /// implicit in the turn order. Rejections leave the state untouched.
    pub fn play_card(&mut self, card: Card) -> Result<PlayOutcome, PlayError> {
        if !matches!(self.phase, Phase::Playing) {
            return Err(PlayError::NotInPlayPhase);
        }
        if self.current_trick.is_complete() {
            return Err(PlayError::TrickFull);
        }

        let seat = self.current_trick.expected_seat();
        if !self.players[seat.index()].hand().contains(card) {
            return Err(PlayError::CardNotInHand(card));
        }

        let legal = self.legal_moves_for(seat);
        if !legal.contains(&card) {
            let lead = self
                .current_trick
                .lead()
                .expect("an obligation implies a lead card");
            return Err(if self.order.is_trump(lead) {
                PlayError::MustPlayTrump
            } else {
                PlayError::MustFollowSuit(lead.suit)
            });
        }

        let removed = self.players[seat.index()].hand_mut().remove(card);
        debug_assert!(removed, "validated card vanished from the hand");
        self.current_trick
            .play(seat, card)
            .map_err(PlayError::Trick)?;

        if self.current_trick.is_complete() {
            Ok(self.complete_current_trick())
        } else {
            Ok(PlayOutcome::Played)
        }
    }

    fn complete_current_trick(&mut self) -> PlayOutcome {
        let winner = self
            .current_trick
            .winner(&self.order)
            .expect("complete trick resolves to a winner");
        let points = self.current_trick.points();
        let teams = self.teams();
        let trick_index = self.trick_history.len();

        self.players[winner.index()].record_trick_win();
        self.scores.add_trick(teams[winner.index()], points);
        self.achievements.extend(detect_achievements(
            &self.current_trick,
            trick_index,
            self.total_tricks(),
            &teams,
            &self.order,
        ));

        let finished = std::mem::replace(&mut self.current_trick, Trick::new(winner));
        self.trick_history.push(finished);
        debug_assert!(self.trick_history.len() <= self.total_tricks());

        if self.trick_history.len() == self.total_tricks() {
            self.phase = Phase::Scoring;
        }

        PlayOutcome::TrickCompleted { winner, points }
    }

    /// Final tally; only valid once all tricks are archived. Moves the
    /// game to Finished and cross-checks the running totals.
    pub fn finalize(&mut self) -> Result<GameResult, FinalizeError> {
        if !matches!(self.phase, Phase::Scoring) {
            return Err(FinalizeError::NotInScoringPhase(self.phase));
        }

        let teams = self.teams();
        let result = GameResult::tally(
            &self.trick_history,
            &teams,
            &self.achievements,
            &self.order,
        );
        assert_eq!(
            result.re_points,
            self.scores.points(Team::Re),
            "final tally diverged from the running score"
        );
        assert_eq!(result.kontra_points, self.scores.points(Team::Kontra));

        self.phase = Phase::Finished;
        self.result = Some(result.clone());
        Ok(result)
    }

    /// A player may declare their own party, making the hidden team
    /// public. The claim has to match the actual membership.
    pub fn announce(&mut self, seat: Seat, team: Team) -> Result<(), AnnounceError> {
        if !matches!(self.phase, Phase::Playing) {
            return Err(AnnounceError::NotInPlayPhase);
        }
        let player = &self.players[seat.index()];
        if player.has_announced() {
            return Err(AnnounceError::AlreadyAnnounced(seat));
        }
        if player.team() != team {
            return Err(AnnounceError::WrongTeam {
                seat,
                claimed: team,
            });
        }
        self.players[seat.index()].set_announced();
        Ok(())
    }

    /// Team membership as publicly inferable: an announcement, or a
    /// marker queen played face-up. Everything else stays `None` --
    /// deliberately conservative, even about the viewer's own partner.
    pub fn public_team(&self, seat: Seat) -> Option<Team> {
        let player = &self.players[seat.index()];
        if player.has_announced() {
            return Some(player.team());
        }

        let played_marker = self
            .trick_history
            .iter()
            .chain(std::iter::once(&self.current_trick))
            .flat_map(|trick| trick.plays())
            .any(|play| play.seat == seat && play.card.is_queen_of_clubs());
        played_marker.then_some(Team::Re)
    }

    /// True only when both memberships are public and equal.
    pub fn is_known_teammate(&self, seat: Seat, other: Seat) -> bool {
        if seat == other {
            return true;
        }
        match (self.public_team(seat), self.public_team(other)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AnnounceError, GameConfig, GameState, Phase, PlayError, PlayOutcome, assign_teams,
    };
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::hand::Hand;
    use crate::model::rank::{Rank, RankSet};
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;
    use crate::model::team::Team;

    fn names() -> [String; 4] {
        ["Anna", "Ben", "Clara", "David"].map(String::from)
    }

    fn fresh_game(seed: u64) -> GameState {
        GameState::with_seed(names(), GameConfig::default(), Seat::North, seed)
    }

    /// Drive a whole game with first-legal-card plays.
    fn autoplay(state: &mut GameState) {
        while matches!(state.phase(), Phase::Playing) {
            let card = state.legal_moves()[0];
            state.play_card(card).unwrap();
        }
    }

    #[test]
    fn dealing_yields_equal_hands_and_two_vs_two() {
        let state = fresh_game(11);
        for seat in Seat::LOOP {
            assert_eq!(state.hand(seat).len(), 12);
        }
        let re = state
            .teams()
            .iter()
            .filter(|&&team| team == Team::Re)
            .count();
        assert_eq!(re, 2);
        assert_eq!(state.phase(), Phase::Playing);
    }

    #[test]
    fn every_seed_deals_a_standard_contract() {
        for seed in 0..40 {
            let state = fresh_game(seed);
            let teams = state.teams();
            let re = teams.iter().filter(|&&team| team == Team::Re).count();
            assert_eq!(re, 2, "seed {seed}");
            let hands: [Hand; 4] = std::array::from_fn(|i| {
                state.hand(Seat::from_index(i).unwrap()).clone()
            });
            Deck::validate_deal(RankSet::WithNines, &hands).unwrap();
        }
    }

    #[test]
    fn assign_teams_rejects_a_marriage_deal() {
        let mut hands: [Hand; 4] = std::array::from_fn(|_| Hand::new());
        hands[0].add(Card::new(Rank::Queen, Suit::Clubs, 0));
        hands[0].add(Card::new(Rank::Queen, Suit::Clubs, 1));
        assert!(assign_teams(&hands).is_none());

        hands[0].remove(Card::new(Rank::Queen, Suit::Clubs, 1));
        hands[2].add(Card::new(Rank::Queen, Suit::Clubs, 1));
        let teams = assign_teams(&hands).unwrap();
        assert_eq!(teams[0], Team::Re);
        assert_eq!(teams[2], Team::Re);
        assert_eq!(teams[1], Team::Kontra);
    }

    #[test]
    fn play_rejects_cards_outside_the_hand() {
        let mut state = fresh_game(5);
        let foreign = {
            let mut candidate = None;
            for suit in Suit::ALL {
                for rank in RankSet::WithNines.ranks().iter().copied() {
                    for copy in 0..2 {
                        let card = Card::new(rank, suit, copy);
                        if !state.hand(Seat::North).contains(card) {
                            candidate = Some(card);
                        }
                    }
                }
            }
            candidate.unwrap()
        };
        assert!(matches!(
            state.play_card(foreign),
            Err(PlayError::CardNotInHand(_))
        ));
        // Rejection mutated nothing.
        assert_eq!(state.hand(Seat::North).len(), 12);
        assert!(state.current_trick().is_empty());
    }

    #[test]
    fn play_rejects_obligation_violations_without_mutating() {
        let mut state = fresh_game(5);
        let lead = state.legal_moves()[0];
        state.play_card(lead).unwrap();

        let seat = state.current_seat();
        let legal = state.legal_moves();
        let hand_size = state.hand(seat).len();
        if let Some(&illegal) = state
            .hand(seat)
            .cards()
            .iter()
            .find(|card| !legal.contains(card))
        {
            assert!(matches!(
                state.play_card(illegal),
                Err(PlayError::MustFollowSuit(_)) | Err(PlayError::MustPlayTrump)
            ));
            assert_eq!(state.hand(seat).len(), hand_size);
        }
    }

    #[test]
    fn trick_winner_leads_the_next_trick() {
        let mut state = fresh_game(23);
        let mut outcome = PlayOutcome::Played;
        for _ in 0..4 {
            let card = state.legal_moves()[0];
            outcome = state.play_card(card).unwrap();
        }
        let PlayOutcome::TrickCompleted { winner, .. } = outcome else {
            panic!("four plays complete a trick");
        };
        assert_eq!(state.tricks_completed(), 1);
        assert_eq!(state.current_trick().leader(), winner);
        assert_eq!(state.player(winner).tricks_won(), 1);
    }

    #[test]
    fn full_game_reaches_finished_with_agreeing_scores() {
        let mut state = fresh_game(77);
        autoplay(&mut state);
        assert_eq!(state.phase(), Phase::Scoring);
        assert_eq!(state.tricks_completed(), state.total_tricks());

        let running_re = state.scores().points(Team::Re);
        let running_kontra = state.scores().points(Team::Kontra);
        assert_eq!(running_re + running_kontra, 240);

        let result = state.finalize().unwrap();
        assert_eq!(state.phase(), Phase::Finished);
        assert_eq!(result.re_points, running_re);
        assert_eq!(result.kontra_points, running_kontra);
        assert!(result.game_value >= 1);

        // Plays after the end are rejected.
        let leftover = Card::new(Rank::Ace, Suit::Clubs, 0);
        assert!(matches!(
            state.play_card(leftover),
            Err(PlayError::NotInPlayPhase)
        ));
    }

    #[test]
    fn obligation_errors_carry_teaching_text() {
        let err = PlayError::MustFollowSuit(Suit::Hearts);
        assert!(err.to_string().contains("Hearts") || err.to_string().contains('H'));
        assert!(err.explanation().is_some());
        assert!(PlayError::TrickFull.explanation().is_none());
    }

    #[test]
    fn finalize_requires_the_scoring_phase() {
        let mut state = fresh_game(3);
        assert!(state.finalize().is_err());
    }

    #[test]
    fn announcement_reveals_the_team() {
        let mut state = fresh_game(9);
        let seat = Seat::East;
        let team = state.player(seat).team();

        assert_eq!(state.public_team(seat), None);
        assert!(matches!(
            state.announce(seat, team.opponent()),
            Err(AnnounceError::WrongTeam { .. })
        ));
        state.announce(seat, team).unwrap();
        assert_eq!(state.public_team(seat), Some(team));
        assert!(matches!(
            state.announce(seat, team),
            Err(AnnounceError::AlreadyAnnounced(_))
        ));
    }

    #[test]
    fn played_marker_queen_is_public_evidence() {
        let mut state = fresh_game(13);
        // Walk until someone legally plays a marker queen.
        while matches!(state.phase(), Phase::Playing) {
            let seat = state.current_seat();
            let legal = state.legal_moves();
            if let Some(&queen) = legal.iter().find(|card| card.is_queen_of_clubs()) {
                state.play_card(queen).unwrap();
                assert_eq!(state.public_team(seat), Some(Team::Re));
                return;
            }
            state.play_card(legal[0]).unwrap();
        }
        panic!("a marker queen is always played before the game ends");
    }

    #[test]
    fn teammate_knowledge_is_conservative() {
        let mut state = fresh_game(31);
        let re_seats: Vec<Seat> = Seat::LOOP
            .iter()
            .copied()
            .filter(|&seat| state.player(seat).team() == Team::Re)
            .collect();
        let (a, b) = (re_seats[0], re_seats[1]);

        // Actual teammates, but not publicly.
        assert!(!state.is_known_teammate(a, b));

        state.announce(a, Team::Re).unwrap();
        assert!(!state.is_known_teammate(a, b));

        state.announce(b, Team::Re).unwrap();
        assert!(state.is_known_teammate(a, b));
    }
}
