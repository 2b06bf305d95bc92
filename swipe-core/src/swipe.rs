use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::SwipeConfig;
use crate::ledger::{BalanceLedger, PortfolioLedger};
use crate::models::Token;
use crate::Result;

pub const MIN_SWIPE_AMOUNT: Decimal = dec!(1);
pub const MAX_SWIPE_AMOUNT: Decimal = dec!(100);
pub const COMMIT_ANIMATION: Duration = Duration::from_millis(250);
pub const RESET_ANIMATION: Duration = Duration::from_millis(200);
pub const MIN_THRESHOLD_FRACTION: f64 = 0.05;
pub const MAX_THRESHOLD_FRACTION: f64 = 0.95;
const DEFAULT_THRESHOLD_FRACTION: f64 = 0.25;
const MAX_TILT_DEGREES: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Buy,
    Skip,
}

impl SwipeDirection {
    fn sign(self) -> f64 {
        match self {
            SwipeDirection::Buy => 1.0,
            SwipeDirection::Skip => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Easing {
    Linear,
    EaseOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Animation {
    fn new(from: f64, to: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
            easing,
        }
    }

    fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn value(&self) -> f64 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let eased = match self.easing {
            Easing::Linear => t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
        };
        self.from + (self.to - self.from) * eased
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeState {
    Idle,
    Dragging { dx: f64, dy: f64 },
    Committing {
        direction: SwipeDirection,
        animation: Animation,
    },
    Resetting { animation: Animation },
}

/// What a release or button press resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum SwipeOutcome {
    Bought { token_id: String, amount: Decimal },
    Skipped { token_id: String },
    Reset,
    Ignored,
}

/// Drag-threshold-commit model for the token card.
///
/// `Idle -> Dragging -> {Committing(direction), Resetting} -> Idle`. The card
/// index only advances once the off-screen animation of a successful commit
/// has finished, so the index never runs ahead of the ledger.
#[derive(Debug, Clone)]
pub struct SwipeDeck {
    index: usize,
    state: SwipeState,
    viewport_width: f64,
    threshold_fraction: f64,
    amount: Decimal,
}

impl SwipeDeck {
    pub fn new(config: &SwipeConfig, viewport_width: f64) -> Self {
        Self {
            index: 0,
            state: SwipeState::Idle,
            viewport_width,
            threshold_fraction: clamp_threshold(config.threshold_fraction),
            amount: clamp_amount(config.amount),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> &SwipeState {
        &self.state
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Whole USDC between 1 and 100.
    pub fn set_amount(&mut self, amount: Decimal) {
        self.amount = clamp_amount(amount);
    }

    pub fn adjust_amount(&mut self, delta: i64) {
        self.set_amount(self.amount + Decimal::from(delta));
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width.max(1.0);
    }

    pub fn threshold(&self) -> f64 {
        self.viewport_width * self.threshold_fraction
    }

    pub fn current<'a>(&self, tokens: &'a [Token]) -> Option<&'a Token> {
        tokens.get(self.index)
    }

    pub fn is_exhausted(&self, len: usize) -> bool {
        self.index >= len
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.state,
            SwipeState::Committing { .. } | SwipeState::Resetting { .. }
        )
    }

    /// Back to the first card, used after the catalog is re-fetched.
    pub fn restart(&mut self) {
        self.index = 0;
        self.state = SwipeState::Idle;
    }

    /// Horizontal card displacement to render.
    pub fn offset(&self) -> f64 {
        match &self.state {
            SwipeState::Idle => 0.0,
            SwipeState::Dragging { dx, .. } => *dx,
            SwipeState::Committing { animation, .. } | SwipeState::Resetting { animation } => {
                animation.value()
            }
        }
    }

    /// Displacement as a share of the threshold, clamped to `-1.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let threshold = self.threshold();
        if threshold <= 0.0 {
            return 0.0;
        }
        (self.offset() / threshold).clamp(-1.0, 1.0)
    }

    /// Card rotation over half the viewport, clamped to ±10°.
    pub fn tilt_degrees(&self) -> f64 {
        let half = self.viewport_width / 2.0;
        if half <= 0.0 {
            return 0.0;
        }
        (self.offset() / half * MAX_TILT_DEGREES).clamp(-MAX_TILT_DEGREES, MAX_TILT_DEGREES)
    }

    pub fn begin_drag(&mut self) -> bool {
        if self.state != SwipeState::Idle {
            return false;
        }
        self.state = SwipeState::Dragging { dx: 0.0, dy: 0.0 };
        true
    }

    pub fn drag_to(&mut self, dx: f64, dy: f64) {
        if let SwipeState::Dragging { .. } = self.state {
            self.state = SwipeState::Dragging { dx, dy };
        }
    }

    /// Direction a release at `dx` commits to, if it crossed the threshold.
    pub fn classify(&self, dx: f64) -> Option<SwipeDirection> {
        let threshold = self.threshold();
        if dx > threshold {
            Some(SwipeDirection::Buy)
        } else if dx < -threshold {
            Some(SwipeDirection::Skip)
        } else {
            None
        }
    }

    /// Ends the active drag. A failed buy leaves the index where it was,
    /// animates the card back and returns the ledger error.
    pub fn release(
        &mut self,
        tokens: &[Token],
        portfolio: &mut PortfolioLedger,
        balance: &mut BalanceLedger,
    ) -> Result<SwipeOutcome> {
        let SwipeState::Dragging { dx, .. } = self.state else {
            return Ok(SwipeOutcome::Ignored);
        };
        match self.classify(dx) {
            Some(direction) => self.commit(direction, dx, tokens, portfolio, balance),
            None => {
                debug!("swipe released below threshold at dx {:.1}", dx);
                self.start_reset(dx);
                Ok(SwipeOutcome::Reset)
            }
        }
    }

    /// Button equivalent of a full swipe from the resting position.
    pub fn swipe(
        &mut self,
        direction: SwipeDirection,
        tokens: &[Token],
        portfolio: &mut PortfolioLedger,
        balance: &mut BalanceLedger,
    ) -> Result<SwipeOutcome> {
        if self.state != SwipeState::Idle {
            return Ok(SwipeOutcome::Ignored);
        }
        self.commit(direction, 0.0, tokens, portfolio, balance)
    }

    /// Advances the running animation. Returns the new index when a commit
    /// finished and the deck moved on to the next card.
    pub fn tick(&mut self, dt: Duration) -> Option<usize> {
        match &mut self.state {
            SwipeState::Committing { animation, .. } => {
                animation.advance(dt);
                if animation.is_finished() {
                    self.index += 1;
                    self.state = SwipeState::Idle;
                    return Some(self.index);
                }
            }
            SwipeState::Resetting { animation } => {
                animation.advance(dt);
                if animation.is_finished() {
                    self.state = SwipeState::Idle;
                }
            }
            SwipeState::Idle | SwipeState::Dragging { .. } => {}
        }
        None
    }

    fn commit(
        &mut self,
        direction: SwipeDirection,
        from: f64,
        tokens: &[Token],
        portfolio: &mut PortfolioLedger,
        balance: &mut BalanceLedger,
    ) -> Result<SwipeOutcome> {
        let Some(token) = tokens.get(self.index) else {
            self.start_reset(from);
            return Ok(SwipeOutcome::Ignored);
        };

        let outcome = match direction {
            SwipeDirection::Buy => match portfolio.buy(balance, token, self.amount) {
                Ok(amount) => SwipeOutcome::Bought {
                    token_id: token.id.clone(),
                    amount,
                },
                Err(e) => {
                    self.start_reset(from);
                    return Err(e);
                }
            },
            SwipeDirection::Skip => SwipeOutcome::Skipped {
                token_id: token.id.clone(),
            },
        };

        info!("swipe {:?} committed on {}", direction, token.id);
        self.state = SwipeState::Committing {
            direction,
            animation: Animation::new(
                from,
                direction.sign() * self.viewport_width,
                COMMIT_ANIMATION,
                Easing::Linear,
            ),
        };
        Ok(outcome)
    }

    fn start_reset(&mut self, from: f64) {
        self.state = if from == 0.0 {
            SwipeState::Idle
        } else {
            SwipeState::Resetting {
                animation: Animation::new(from, 0.0, RESET_ANIMATION, Easing::EaseOut),
            }
        };
    }
}

fn clamp_amount(amount: Decimal) -> Decimal {
    amount.round().clamp(MIN_SWIPE_AMOUNT, MAX_SWIPE_AMOUNT)
}

fn clamp_threshold(fraction: f64) -> f64 {
    if fraction.is_nan() {
        return DEFAULT_THRESHOLD_FRACTION;
    }
    fraction.clamp(MIN_THRESHOLD_FRACTION, MAX_THRESHOLD_FRACTION)
}
