//! Timed turn flow: `Idle → Drawing → Revealing → Resolved → Idle`.
//!
//! The sequencer owns the [`Session`] and a [`Scheduler`]. A guess draws a
//! card immediately and schedules the reveal; every later step is a timer
//! event processed by [`Sequencer::pump`]. While a guess is in progress the
//! session's turn lock rejects further guesses.

use crate::cards::Card;
use crate::game::{GameError, GuessReport, Notice, Session};
use crate::rules::Guess;
use crate::scheduler::{ManualScheduler, Scheduler, TimerEvent};
use std::time::Duration;
use tracing::{debug, warn};

/// Presentation delays. None of them affect the outcome of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Draw to face-up.
    pub reveal: Duration,
    /// Face-up to judgement.
    pub resolve: Duration,
    /// Judgement to turn hand-off, when the turn ended.
    pub turn_end: Duration,
    /// How long a notice stays up.
    pub notice: Duration,
}

impl Timings {
    /// Zero delays: one `pump` runs a guess to completion.
    pub const fn instant() -> Self {
        Self {
            reveal: Duration::ZERO,
            resolve: Duration::ZERO,
            turn_end: Duration::ZERO,
            notice: Duration::ZERO,
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            reveal: Duration::from_millis(50),
            resolve: Duration::from_millis(850),
            turn_end: Duration::from_millis(900),
            notice: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Phase {
    /// Waiting for a guess.
    Idle,
    /// Card drawn, still face down.
    Drawing,
    /// Card face up, not yet judged.
    Revealing,
    /// Turn ended; waiting to clear the row and pass play.
    Resolved,
}

/// Transitions observed by one [`Sequencer::pump`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SequencerEvent {
    Revealed(Card),
    Resolved(GuessReport),
    TurnEnded { next_player: usize },
    NoticeCleared,
    /// A timer could not be applied; the guess in progress was dropped.
    Failed(GameError),
}

#[derive(Debug)]
pub struct Sequencer<S: Scheduler> {
    session: Session,
    scheduler: S,
    timings: Timings,
    phase: Phase,
    notice: Option<(u64, Notice)>,
    notice_seq: u64,
    last_report: Option<GuessReport>,
}

impl<S: Scheduler> Sequencer<S> {
    pub fn new(session: Session, scheduler: S, timings: Timings) -> Self {
        Self {
            session,
            scheduler,
            timings,
            phase: Phase::Idle,
            notice: None,
            notice_seq: 0,
            last_report: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref().map(|(_, n)| n)
    }

    pub fn last_report(&self) -> Option<&GuessReport> {
        self.last_report.as_ref()
    }

    /// The drawn card and whether it is face up, while one is on the table
    /// outside the revealed row.
    pub fn active_card(&self) -> Option<(Card, bool)> {
        let card = self.session.in_flight()?.card;
        Some((card, self.phase != Phase::Drawing))
    }

    /// Start resolving `guess`. Only accepted in [`Phase::Idle`]; anything
    /// else is rejected without touching the session.
    pub fn submit_guess(&mut self, guess: Guess) -> Result<(), GameError> {
        if self.phase != Phase::Idle || self.session.turn_locked() {
            debug!(%guess, phase = ?self.phase, "guess ignored while resolving");
            return Err(GameError::ConcurrentGuessRejected);
        }
        self.session.begin_guess(guess)?;
        self.phase = Phase::Drawing;
        self.scheduler.schedule(self.timings.reveal, TimerEvent::Reveal);
        Ok(())
    }

    /// Fire every timer that is due, in order.
    ///
    /// A timer that fails drops the guess in progress and returns the
    /// sequencer to [`Phase::Idle`], so play can always continue.
    pub fn pump(&mut self) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        while let Some(ev) = self.scheduler.next_due() {
            match self.fire(ev) {
                Ok(Some(out)) => events.push(out),
                Ok(None) => {}
                Err(err) => {
                    warn!(?ev, phase = ?self.phase, %err, "timer failed, guess dropped");
                    self.session.abandon_guess();
                    self.phase = Phase::Idle;
                    events.push(SequencerEvent::Failed(err));
                }
            }
        }
        events
    }

    fn fire(&mut self, ev: TimerEvent) -> Result<Option<SequencerEvent>, GameError> {
        debug!(?ev, phase = ?self.phase, "timer fired");
        match (ev, self.phase) {
            (TimerEvent::Reveal, Phase::Drawing) => {
                self.phase = Phase::Revealing;
                self.scheduler.schedule(self.timings.resolve, TimerEvent::Resolve);
                Ok(self.session.in_flight().map(|p| SequencerEvent::Revealed(p.card)))
            }
            (TimerEvent::Resolve, Phase::Revealing) => {
                let report = self.session.resolve_pending()?;
                self.show_notice(report.notice.clone());
                if report.outcome.ends_turn() {
                    self.phase = Phase::Resolved;
                    self.scheduler.schedule(self.timings.turn_end, TimerEvent::EndTurn);
                } else {
                    self.phase = Phase::Idle;
                }
                self.last_report = Some(report.clone());
                Ok(Some(SequencerEvent::Resolved(report)))
            }
            (TimerEvent::EndTurn, Phase::Resolved) => {
                self.session.finish_turn()?;
                self.phase = Phase::Idle;
                Ok(Some(SequencerEvent::TurnEnded { next_player: self.session.current() }))
            }
            (TimerEvent::DismissNotice(id), _) => match self.notice {
                Some((shown, _)) if shown == id => {
                    self.notice = None;
                    Ok(Some(SequencerEvent::NoticeCleared))
                }
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }

    fn show_notice(&mut self, notice: Notice) {
        self.notice_seq += 1;
        self.notice = Some((self.notice_seq, notice));
        self.scheduler.schedule(self.timings.notice, TimerEvent::DismissNotice(self.notice_seq));
    }
}

impl Sequencer<ManualScheduler> {
    /// Advance the virtual clock until the sequencer is idle again.
    pub fn run_until_idle(&mut self) -> Vec<SequencerEvent> {
        let mut events = self.pump();
        while self.phase != Phase::Idle && self.scheduler.advance_to_next() {
            events.extend(self.pump());
        }
        events
    }

    /// Guess and run the whole sequence on the virtual clock.
    pub fn play(&mut self, guess: Guess) -> Result<GuessReport, GameError> {
        self.submit_guess(guess)?;
        let mut report = None;
        for ev in self.run_until_idle() {
            match ev {
                SequencerEvent::Failed(err) => return Err(err),
                SequencerEvent::Resolved(r) => report = Some(r),
                _ => {}
            }
        }
        report.ok_or(GameError::NothingToResolve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{parse_cards, Color};
    use crate::deck::Deck;
    use crate::game::{NoticeKind, Outcome};
    use crate::rules::Stage;

    fn mk(cards: &str) -> Sequencer<ManualScheduler> {
        let deck = Deck::from_cards(parse_cards(cards).expect("valid cards"));
        let session = Session::with_deck(&["A", "B", "C"], 0, deck).expect("valid session");
        Sequencer::new(session, ManualScheduler::new(), Timings::default())
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn walks_through_phases_on_success() {
        let mut seq = mk("Qh 2c");
        seq.submit_guess(Guess::Color(Color::Red)).unwrap();
        assert_eq!(seq.phase(), Phase::Drawing);
        assert_eq!(seq.active_card().map(|(_, up)| up), Some(false));

        seq.scheduler_mut().advance(ms(50));
        let events = seq.pump();
        assert!(matches!(events.as_slice(), [SequencerEvent::Revealed(_)]));
        assert_eq!(seq.phase(), Phase::Revealing);
        assert_eq!(seq.active_card().map(|(_, up)| up), Some(true));

        seq.scheduler_mut().advance(ms(849));
        assert!(seq.pump().is_empty());
        seq.scheduler_mut().advance(ms(1));
        let events = seq.pump();
        assert!(matches!(events.as_slice(), [SequencerEvent::Resolved(_)]));
        assert_eq!(seq.phase(), Phase::Idle);
        assert_eq!(seq.session().stage(), Stage::HigherLower);
        assert_eq!(seq.notice().map(|n| n.kind), Some(NoticeKind::Success));
        assert!(seq.active_card().is_none());
    }

    #[test]
    fn second_guess_is_rejected_until_resolved() {
        let mut seq = mk("Qh 2c");
        seq.submit_guess(Guess::Color(Color::Red)).unwrap();
        let remaining = seq.session().deck_remaining();
        let err = seq.submit_guess(Guess::Color(Color::Black)).unwrap_err();
        assert_eq!(err, GameError::ConcurrentGuessRejected);
        assert_eq!(seq.session().deck_remaining(), remaining);
        assert_eq!(seq.phase(), Phase::Drawing);
    }

    #[test]
    fn failure_holds_turn_until_end_timer() {
        let mut seq = mk("Qh 2c");
        seq.submit_guess(Guess::Color(Color::Black)).unwrap();
        seq.scheduler_mut().advance(ms(50));
        seq.pump();
        seq.scheduler_mut().advance(ms(850));
        seq.pump();
        assert_eq!(seq.phase(), Phase::Resolved);
        assert!(seq.session().turn_locked());
        assert_eq!(seq.session().current(), 1);
        assert_eq!(
            seq.submit_guess(Guess::Color(Color::Red)).unwrap_err(),
            GameError::ConcurrentGuessRejected
        );

        seq.scheduler_mut().advance(ms(900));
        let events = seq.pump();
        assert!(events.contains(&SequencerEvent::TurnEnded { next_player: 2 }));
        assert_eq!(seq.phase(), Phase::Idle);
        assert!(!seq.session().turn_locked());
        assert_eq!(seq.session().discard().len(), 1);
    }

    #[test]
    fn notice_clears_on_its_own_timer() {
        let mut seq = mk("Qh 2c");
        let report = seq.play(Guess::Color(Color::Black)).unwrap();
        assert!(matches!(report.outcome, Outcome::Failure { .. }));
        assert!(seq.notice().is_some());
        seq.scheduler_mut().advance(ms(2000));
        let events = seq.pump();
        assert!(events.contains(&SequencerEvent::NoticeCleared));
        assert!(seq.notice().is_none());
    }

    #[test]
    fn stale_dismiss_keeps_newer_notice() {
        let mut seq = mk("Qh 2c 3d");
        seq.play(Guess::Color(Color::Red)).unwrap();
        let second = seq.play(Guess::Lower).unwrap();
        assert_eq!(seq.scheduler().now(), ms(1800));

        // first notice's timer fires while the second is showing
        seq.scheduler_mut().advance(ms(1100));
        let events = seq.pump();
        assert!(!events.contains(&SequencerEvent::NoticeCleared));
        assert_eq!(seq.notice(), Some(&second.notice));

        seq.scheduler_mut().advance(ms(900));
        assert!(seq.pump().contains(&SequencerEvent::NoticeCleared));
    }

    #[test]
    fn failed_timer_drops_guess_and_keeps_playing() {
        let mut seq = mk("Qh 2c 3d");
        seq.submit_guess(Guess::Color(Color::Red)).unwrap();
        seq.scheduler_mut().advance(ms(50));
        seq.pump();
        // nothing left to judge when the resolve timer fires
        seq.session.in_flight = None;
        seq.scheduler_mut().advance(ms(850));
        let events = seq.pump();
        assert!(events.contains(&SequencerEvent::Failed(GameError::NothingToResolve)));
        assert_eq!(seq.phase(), Phase::Idle);
        assert!(!seq.session().turn_locked());
        assert_eq!(seq.session().stage(), Stage::Color);

        let report = seq.play(Guess::Color(Color::Black)).unwrap();
        assert_eq!(report.card.to_string(), "2c");
    }

    #[test]
    fn instant_timings_finish_in_one_pump() {
        let deck = Deck::from_cards(parse_cards("Qh 2c").unwrap());
        let session = Session::with_deck(&["A", "B"], 0, deck).unwrap();
        let mut seq = Sequencer::new(session, ManualScheduler::new(), Timings::instant());
        seq.submit_guess(Guess::Color(Color::Black)).unwrap();
        let events = seq.pump();
        assert_eq!(seq.phase(), Phase::Idle);
        assert!(events.iter().any(|e| matches!(e, SequencerEvent::TurnEnded { .. })));
        assert!(events.contains(&SequencerEvent::NoticeCleared));
    }
}
