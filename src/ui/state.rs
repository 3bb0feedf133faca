use gtk4::glib;
use libadwaita as adw;
use rand::Rng;
use rand::seq::SliceRandom;

use super::board::CardArt;
use super::config::GameSettings;
use super::controls::CardButton;
use super::records::HighScoreStore;
use super::sound::SoundPlayer;

pub const GRID_SIZE: usize = 4;
pub const CARD_COUNT: usize = GRID_SIZE * GRID_SIZE;
pub const PAIR_COUNT: usize = CARD_COUNT / 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CardFace {
    #[default]
    Down,
    Up,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pair_id: u8,
    face: CardFace,
    matched: bool,
}

impl Card {
    pub fn new(pair_id: u8) -> Self {
        Card {
            pair_id,
            face: CardFace::Down,
            matched: false,
        }
    }

    pub fn face_up(pair_id: u8) -> Self {
        Card {
            face: CardFace::Up,
            ..Card::new(pair_id)
        }
    }

    pub fn pair_id(&self) -> u8 {
        self.pair_id
    }

    pub fn face(&self) -> CardFace {
        self.face
    }

    pub fn is_face_up(&self) -> bool {
        self.face == CardFace::Up
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Matched cards no longer react to clicks.
    pub fn is_interactive(&self) -> bool {
        !self.matched
    }

    pub fn flip(&mut self) {
        self.face = match self.face {
            CardFace::Down => CardFace::Up,
            CardFace::Up => CardFace::Down,
        };
    }

    pub fn set_matched(&mut self, matched: bool) {
        self.matched = matched;
    }

    pub fn reset(&mut self) {
        self.face = CardFace::Down;
        self.matched = false;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    OneSelected {
        pending: usize,
    },
    /// Two face-up cards that did not match, waiting for the flip-back delay.
    Resolving {
        pending: usize,
        other: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    FirstPick,
    Matched,
    Mismatched,
    Won { attempts: u32 },
}

/// Rules of one memory-match session: the deck, whose turn it is and the score.
#[derive(Clone, Debug)]
pub struct MemoryGame {
    cards: Vec<Card>,
    turn: TurnState,
    attempts: u32,
    pairs_found: usize,
    generation: u64,
}

fn deal_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(CARD_COUNT);
    for pair_id in 1..=PAIR_COUNT as u8 {
        cards.push(Card::new(pair_id));
        cards.push(Card::new(pair_id));
    }
    cards
}

impl MemoryGame {
    pub fn new() -> Self {
        Self::with_rng(&mut rand::rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards = deal_deck();
        cards.shuffle(rng);
        MemoryGame {
            cards,
            turn: TurnState::Idle,
            attempts: 0,
            pairs_found: 0,
            generation: 0,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn pending_selection(&self) -> Option<usize> {
        match self.turn {
            TurnState::Idle => None,
            TurnState::OneSelected { pending } | TurnState::Resolving { pending, .. } => {
                Some(pending)
            }
        }
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.turn, TurnState::Resolving { .. })
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn pairs_found(&self) -> usize {
        self.pairs_found
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_won(&self) -> bool {
        self.pairs_found == PAIR_COUNT
    }

    pub fn click(&mut self, index: usize) -> ClickOutcome {
        let Some(card) = self.cards.get(index) else {
            return ClickOutcome::Ignored;
        };
        if card.is_matched() {
            return ClickOutcome::Ignored;
        }

        match self.turn {
            TurnState::Resolving { .. } => ClickOutcome::Ignored,
            TurnState::OneSelected { pending } if pending == index => ClickOutcome::Ignored,
            TurnState::Idle => {
                self.cards[index].flip();
                self.turn = TurnState::OneSelected { pending: index };
                ClickOutcome::FirstPick
            }
            TurnState::OneSelected { pending } => {
                self.cards[index].flip();
                self.attempts = self.attempts.saturating_add(1);

                if self.cards[pending].pair_id() != self.cards[index].pair_id() {
                    self.turn = TurnState::Resolving {
                        pending,
                        other: index,
                    };
                    return ClickOutcome::Mismatched;
                }

                self.cards[pending].set_matched(true);
                self.cards[index].set_matched(true);
                self.pairs_found += 1;
                self.turn = TurnState::Idle;
                if self.is_won() {
                    ClickOutcome::Won {
                        attempts: self.attempts,
                    }
                } else {
                    ClickOutcome::Matched
                }
            }
        }
    }

    /// Turns a mismatched pair back face-down. Returns the affected indices, or
    /// `None` when `generation` belongs to a game that has since been reset.
    pub fn resolve_mismatch(&mut self, generation: u64) -> Option<(usize, usize)> {
        if generation != self.generation {
            return None;
        }
        let TurnState::Resolving { pending, other } = self.turn else {
            return None;
        };

        for idx in [pending, other] {
            let card = &mut self.cards[idx];
            if card.is_face_up() && !card.is_matched() {
                card.flip();
            }
        }
        self.turn = TurnState::Idle;
        Some((pending, other))
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.generation = self.generation.wrapping_add(1);
        self.turn = TurnState::Idle;
        self.attempts = 0;
        self.pairs_found = 0;
        self.cards.shuffle(rng);
        for card in &mut self.cards {
            card.reset();
        }
    }
}

impl Default for MemoryGame {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancellation hook for the pending mismatch flip-back.
#[derive(Default)]
pub struct MismatchTimer {
    handle: Option<glib::SourceId>,
}

impl MismatchTimer {
    pub fn arm(&mut self, handle: glib::SourceId) {
        self.cancel();
        self.handle = Some(handle);
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.remove();
        }
    }

    /// Called from the callback itself: the source is already gone, so it must
    /// not be removed again.
    pub fn fired(&mut self) {
        self.handle = None;
    }
}

pub struct AppState {
    pub window: Option<adw::ApplicationWindow>,
    pub status_label: Option<gtk4::Label>,
    pub card_buttons: Vec<CardButton>,

    // Game state
    pub game: MemoryGame,
    pub mismatch_timer: MismatchTimer,
    pub settings: GameSettings,
    pub art: CardArt,
    pub sounds: SoundPlayer,
    pub high_scores: HighScoreStore,
}

impl AppState {
    pub fn new(settings: GameSettings) -> Self {
        AppState {
            window: None,
            status_label: None,
            card_buttons: Vec::new(),
            game: MemoryGame::new(),
            mismatch_timer: MismatchTimer::default(),
            art: CardArt::load(&settings.assets_dir),
            sounds: SoundPlayer::new(settings.sound_enabled),
            high_scores: HighScoreStore::new(settings.high_score_path.clone()),
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded_game() -> MemoryGame {
        MemoryGame::with_rng(&mut StdRng::seed_from_u64(7))
    }

    fn indices_of(game: &MemoryGame, pair_id: u8) -> (usize, usize) {
        let found: Vec<usize> = game
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, card)| card.pair_id() == pair_id)
            .map(|(idx, _)| idx)
            .collect();
        (found[0], found[1])
    }

    fn assert_valid_deck(game: &MemoryGame) {
        assert_eq!(game.cards().len(), CARD_COUNT);
        for pair_id in 1..=PAIR_COUNT as u8 {
            let count = game
                .cards()
                .iter()
                .filter(|card| card.pair_id() == pair_id)
                .count();
            assert_eq!(count, 2, "pair {pair_id} should appear twice");
        }
    }

    #[test]
    fn card_flip_and_reset() {
        let mut card = Card::new(4);
        assert_eq!(card.face(), CardFace::Down);
        card.flip();
        assert!(card.is_face_up());
        card.set_matched(true);
        assert!(!card.is_interactive());
        card.reset();
        assert_eq!(card, Card::new(4));
        assert!(Card::face_up(4).is_face_up());
    }

    #[test]
    fn new_game_deals_eight_pairs() {
        let game = seeded_game();
        assert_valid_deck(&game);
        assert_eq!(game.turn(), TurnState::Idle);
        assert_eq!(game.attempts(), 0);
        assert!(game.cards().iter().all(|card| !card.is_face_up()));
    }

    #[test]
    fn first_pick_selects_without_counting_an_attempt() {
        let mut game = seeded_game();
        assert_eq!(game.click(0), ClickOutcome::FirstPick);
        assert_eq!(game.pending_selection(), Some(0));
        assert!(game.cards()[0].is_face_up());
        assert_eq!(game.attempts(), 0);
    }

    #[test]
    fn clicking_pending_card_again_is_ignored() {
        let mut game = seeded_game();
        game.click(3);
        assert_eq!(game.click(3), ClickOutcome::Ignored);
        assert_eq!(game.attempts(), 0);
        assert!(game.cards()[3].is_face_up());
        assert_eq!(game.turn(), TurnState::OneSelected { pending: 3 });
    }

    #[test]
    fn matching_pair_is_locked_in() {
        let mut game = seeded_game();
        let (a, b) = indices_of(&game, 3);
        game.click(a);
        assert_eq!(game.click(b), ClickOutcome::Matched);
        assert_eq!(game.attempts(), 1);
        assert_eq!(game.pairs_found(), 1);
        assert_eq!(game.turn(), TurnState::Idle);
        assert!(game.cards()[a].is_matched() && game.cards()[b].is_matched());

        assert_eq!(game.click(a), ClickOutcome::Ignored);
        assert_eq!(game.pending_selection(), None);
    }

    #[test]
    fn mismatch_blocks_input_until_resolved() {
        let mut game = seeded_game();
        let (c, _) = indices_of(&game, 5);
        let (d, _) = indices_of(&game, 7);
        let (e, _) = indices_of(&game, 1);

        game.click(c);
        assert_eq!(game.click(d), ClickOutcome::Mismatched);
        assert_eq!(game.attempts(), 1);
        assert!(game.is_resolving());
        assert_eq!(game.click(e), ClickOutcome::Ignored);
        assert!(!game.cards()[e].is_face_up());

        assert_eq!(game.resolve_mismatch(game.generation()), Some((c, d)));
        assert!(!game.cards()[c].is_face_up());
        assert!(!game.cards()[d].is_face_up());
        assert_eq!(game.turn(), TurnState::Idle);
        assert_eq!(game.resolve_mismatch(game.generation()), None);
    }

    #[test]
    fn walkthrough_match_then_mismatch() {
        let mut game = seeded_game();
        let (a, b) = indices_of(&game, 3);
        let (c, _) = indices_of(&game, 5);
        let (d, _) = indices_of(&game, 7);

        game.click(a);
        assert_eq!(game.turn(), TurnState::OneSelected { pending: a });
        assert_eq!(game.attempts(), 0);
        game.click(b);
        assert_eq!((game.attempts(), game.pairs_found()), (1, 1));
        assert_eq!(game.turn(), TurnState::Idle);

        game.click(c);
        assert_eq!(game.turn(), TurnState::OneSelected { pending: c });
        game.click(d);
        assert_eq!(game.attempts(), 2);
        assert_eq!(game.turn(), TurnState::Resolving { pending: c, other: d });

        game.resolve_mismatch(game.generation());
        assert!(!game.cards()[c].is_face_up() && !game.cards()[d].is_face_up());
        assert!(game.cards()[a].is_face_up() && game.cards()[a].is_matched());
        assert_eq!(game.turn(), TurnState::Idle);
    }

    #[test]
    fn second_distinct_pick_counts_exactly_once() {
        let mut game = seeded_game();
        let (a, _) = indices_of(&game, 2);
        let (b, _) = indices_of(&game, 6);
        game.click(a);
        game.click(b);
        game.click(b);
        assert_eq!(game.attempts(), 1);
    }

    #[test]
    fn win_is_declared_once() {
        let mut game = seeded_game();
        let mut wins = 0;
        for pair_id in 1..=PAIR_COUNT as u8 {
            let (a, b) = indices_of(&game, pair_id);
            game.click(a);
            if let ClickOutcome::Won { attempts } = game.click(b) {
                assert_eq!(attempts, PAIR_COUNT as u32);
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert!(game.is_won());
        assert_eq!(game.pairs_found(), PAIR_COUNT);
        for idx in 0..CARD_COUNT {
            assert_eq!(game.click(idx), ClickOutcome::Ignored);
        }
    }

    #[test]
    fn matched_cards_survive_mismatch_recovery() {
        let mut game = seeded_game();
        let (a, b) = indices_of(&game, 1);
        let (c, _) = indices_of(&game, 2);
        let (d, _) = indices_of(&game, 3);
        game.click(a);
        game.click(b);
        game.click(c);
        game.click(d);
        game.resolve_mismatch(game.generation());
        assert!(game.cards()[a].is_face_up() && game.cards()[b].is_face_up());
        assert!(game.cards()[a].is_matched() && game.cards()[b].is_matched());
    }

    #[test]
    fn reset_clears_progress_and_reshuffles() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut game = MemoryGame::with_rng(&mut rng);
        let (a, b) = indices_of(&game, 4);
        game.click(a);
        game.click(b);
        let (c, _) = indices_of(&game, 5);
        let (d, _) = indices_of(&game, 6);
        game.click(c);
        game.click(d);

        let before: Vec<u8> = game.cards().iter().map(Card::pair_id).collect();
        let mut reshuffled = false;
        for _ in 0..4 {
            game.reset(&mut rng);
            assert_valid_deck(&game);
            let after: Vec<u8> = game.cards().iter().map(Card::pair_id).collect();
            reshuffled |= after != before;
        }
        assert!(reshuffled);
        assert_eq!(game.attempts(), 0);
        assert_eq!(game.pairs_found(), 0);
        assert_eq!(game.turn(), TurnState::Idle);
        assert!(
            game.cards()
                .iter()
                .all(|card| !card.is_face_up() && !card.is_matched())
        );
    }

    #[test]
    fn stale_mismatch_callback_is_ignored_after_reset() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = MemoryGame::with_rng(&mut rng);
        let (c, _) = indices_of(&game, 1);
        let (d, _) = indices_of(&game, 2);
        game.click(c);
        game.click(d);
        let stale = game.generation();

        game.reset(&mut rng);
        let first = 0;
        game.click(first);
        assert_eq!(game.resolve_mismatch(stale), None);
        assert!(game.cards()[first].is_face_up());
        assert_eq!(game.pending_selection(), Some(first));
    }

    #[test]
    fn out_of_range_click_is_ignored() {
        let mut game = seeded_game();
        assert_eq!(game.click(CARD_COUNT), ClickOutcome::Ignored);
        assert_eq!(game.turn(), TurnState::Idle);
    }
}
