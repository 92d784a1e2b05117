//! Registry of choreographies owned by the main loop.
//!
//! Choreographies are registered once during setup and ticked in
//! registration order on every pass. Mixing different performances is done
//! with an enum implementing [`Performance`], the same way effects are
//! collected into a slot enum.

use heapless::Vec;

use crate::choreography::{Choreography, Performance};
use crate::clock::ClockSource;

/// Handle of a registered choreography
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChoreographyId(usize);

impl ChoreographyId {
    /// Position in registration order
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Error returned when registering into a full ensemble.
///
/// Hands the rejected choreography back.
#[derive(Debug)]
pub struct EnsembleFull<P>(pub Choreography<P>);

/// Fixed-capacity set of choreographies
///
/// N is the maximum number of choreographies
pub struct Ensemble<P, const N: usize> {
    choreographies: Vec<Choreography<P>, N>,
}

impl<P: Performance, const N: usize> Ensemble<P, N> {
    pub const fn new() -> Self {
        Self {
            choreographies: Vec::new(),
        }
    }

    /// Add a choreography
    ///
    /// Returns the choreography back if the ensemble is full
    pub fn register(
        &mut self,
        choreography: Choreography<P>,
    ) -> Result<ChoreographyId, EnsembleFull<P>> {
        let id = ChoreographyId(self.choreographies.len());
        self.choreographies.push(choreography).map_err(EnsembleFull)?;
        Ok(id)
    }

    /// Tick every running choreography, in registration order
    pub fn tick<C: ClockSource>(&mut self, clock: &C) {
        let now = clock.now();
        for choreography in &mut self.choreographies {
            choreography.tick_at(now);
        }
    }

    /// Start a choreography
    ///
    /// Returns `None` for an unknown id
    pub fn start<C: ClockSource>(&mut self, id: ChoreographyId, clock: &C) -> Option<()> {
        self.get_mut(id)?.start(clock);
        Some(())
    }

    /// Stop a choreography
    ///
    /// Returns `None` for an unknown id
    pub fn stop(&mut self, id: ChoreographyId) -> Option<()> {
        self.get_mut(id)?.stop();
        Some(())
    }

    /// Start a choreography if idle, stop it otherwise
    ///
    /// Returns whether it is running afterwards, `None` for an unknown id
    pub fn toggle<C: ClockSource>(&mut self, id: ChoreographyId, clock: &C) -> Option<bool> {
        let choreography = self.get_mut(id)?;
        choreography.toggle(clock);
        Some(choreography.is_running())
    }

    /// Stop every running choreography
    pub fn stop_all(&mut self) {
        for choreography in &mut self.choreographies {
            if choreography.is_running() {
                choreography.stop();
            }
        }
    }

    pub fn is_running(&self, id: ChoreographyId) -> bool {
        self.get(id).is_some_and(Choreography::is_running)
    }

    pub fn running_count(&self) -> usize {
        self.choreographies
            .iter()
            .filter(|choreography| choreography.is_running())
            .count()
    }

    pub fn get(&self, id: ChoreographyId) -> Option<&Choreography<P>> {
        self.choreographies.get(id.0)
    }

    pub fn get_mut(&mut self, id: ChoreographyId) -> Option<&mut Choreography<P>> {
        self.choreographies.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Choreography<P>> {
        self.choreographies.iter()
    }

    pub fn len(&self) -> usize {
        self.choreographies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choreographies.is_empty()
    }
}

impl<P: Performance, const N: usize> Default for Ensemble<P, N> {
    fn default() -> Self {
        Self::new()
    }
}
