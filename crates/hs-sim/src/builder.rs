//! Fluent builder for constructing a [`Sim`].

use hs_core::{Day, DayRange, SimClock, SimConfig};
use hs_pricing::PriceSource;

use crate::{MatchingStrategy, MultiSupplierMatcher, Sim, SimError, SimResult, SimSession, SingleSupplierMatcher};

/// Fluent builder for [`Sim<M>`].
///
/// # Required inputs
///
/// - [`SimSession`]: from [`SimSession::generate`] or [`SimSession::load`]
/// - `M: MatchingStrategy`: the operating mode, with supply in place
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                             |
/// |-------------------|-------------------------------------|
/// | `.window(s, e)`   | `Day::FIRST_SHOPPING..=Day::LAST`   |
///
/// # Example
///
/// ```rust,ignore
/// let session = SimSession::generate(params, &config)?;
/// let mut sim = SimBuilder::multi_supplier(session, config)?.build()?;
/// sim.run(&mut NoopObserver)?;
/// println!("{}", sim.statistics());
/// ```
pub struct SimBuilder<M: MatchingStrategy> {
    session: SimSession,
    matcher: M,
    window:  Option<(Day, Day)>,
}

impl<M: MatchingStrategy> SimBuilder<M> {
    /// Create a builder with all required inputs.
    pub fn new(session: SimSession, matcher: M) -> Self {
        Self { session, matcher, window: None }
    }

    /// Restrict the run to the inclusive day window `[start, end]`.
    pub fn window(mut self, start: Day, end: Day) -> Self {
        self.window = Some((start, end));
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<M>> {
        let clock = match self.window {
            Some((start, end)) => run_clock(start, end)?,
            None => SimClock::full_horizon(),
        };
        Ok(Sim { session: self.session, matcher: self.matcher, clock })
    }
}

/// A clock over `[start, end]`, which must be non-empty and inside the
/// horizon.
pub(crate) fn run_clock(start: Day, end: Day) -> SimResult<SimClock> {
    if end < start {
        return Err(SimError::Builder(format!("run window {start}..={end} is empty")));
    }
    if start < Day::FIRST_SHOPPING || end > Day::LAST {
        return Err(SimError::Builder(format!(
            "run window {start}..={end} leaves the horizon {}..={}",
            Day::FIRST_SHOPPING,
            Day::LAST
        )));
    }
    Ok(SimClock::new(start, end))
}

impl SimBuilder<MultiSupplierMatcher> {
    /// Multi-supplier builder with supply initialized from `config`.
    pub fn multi_supplier(session: SimSession, config: SimConfig) -> SimResult<Self> {
        let mut matcher = MultiSupplierMatcher::new(config)?;
        matcher.initialize(session.simulation_id());
        Ok(Self::new(session, matcher))
    }
}

impl<P: PriceSource> SimBuilder<SingleSupplierMatcher<P>> {
    /// Single-supplier builder: `rooms` on every day of `stays`, priced by
    /// `source`.  Pass `config.operational_days()` for the configured window.
    pub fn single_supplier(session: SimSession, source: P, rooms: u32, stays: DayRange) -> SimResult<Self> {
        if stays.is_empty() || stays.start < Day::FIRST_STAY || stays.end > Day::LAST {
            return Err(SimError::Builder(format!(
                "stay window {stays} must be non-empty and inside {}..={}",
                Day::FIRST_STAY,
                Day::LAST
            )));
        }
        Ok(Self::new(session, SingleSupplierMatcher::new(source, rooms, stays)))
    }
}
