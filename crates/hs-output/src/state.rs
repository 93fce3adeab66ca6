//! Persisted simulation state.
//!
//! A saved state is one JSON document:
//!
//! ```text
//! {
//!   "simulation_parameters": { "simulation_id": ..., "total_travellers": ..., ... },
//!   "travellers": [
//!     { "traveller_id": "casual-001",
//!       "itineraries": [ { "trip_id": 1, "demands": [...], "is_booked": false, ... } ] }
//!   ]
//! }
//! ```
//!
//! Booked fields that are absent load as unbooked.  Unknown fields are
//! ignored.  A missing required field, or an itinerary whose demands
//! disagree on the stay window, fails with [`OutputError::MalformedState`].

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use hs_demand::Population;
use hs_sim::{SimSession, SimulationParameters};

use crate::{OutputError, OutputResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub simulation_parameters: SimulationParameters,
    pub travellers:            Population,
}

impl SimulationState {
    pub fn from_session(session: &SimSession) -> Self {
        Self { simulation_parameters: session.params.clone(), travellers: session.population.clone() }
    }

    pub fn into_session(self) -> SimSession {
        SimSession::load(self.simulation_parameters, self.travellers)
    }

    /// Structural checks serde cannot express.
    fn check(&self) -> OutputResult<()> {
        let mut seen = BTreeSet::new();
        for traveller in &self.travellers {
            if !seen.insert(traveller.traveller_id) {
                return Err(malformed(format!("traveller {} appears twice", traveller.traveller_id)));
            }
            let mut trips = BTreeSet::new();
            for itin in &traveller.itineraries {
                if !trips.insert(itin.trip_id) {
                    return Err(malformed(format!(
                        "traveller {} has trip {} twice",
                        traveller.traveller_id, itin.trip_id
                    )));
                }
                let stay = itin.stay();
                if itin.demands.iter().any(|d| Some(d.stay()) != stay) {
                    return Err(malformed(format!(
                        "traveller {} trip {} mixes stay windows",
                        traveller.traveller_id, itin.trip_id
                    )));
                }
            }
        }
        Ok(())
    }
}

fn malformed(msg: String) -> OutputError {
    OutputError::MalformedState(msg)
}

// ── Blob API ──────────────────────────────────────────────────────────────────

/// Serialize a session's parameters and population.
pub fn save_state(session: &SimSession) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(&SimulationState::from_session(session))?)
}

/// Restore a session from [`save_state`] output.
pub fn load_state(blob: &str) -> OutputResult<SimSession> {
    let state: SimulationState = serde_json::from_str(blob).map_err(|e| malformed(e.to_string()))?;
    state.check()?;
    Ok(state.into_session())
}

// ── File helpers ──────────────────────────────────────────────────────────────

pub fn save_state_file(session: &SimSession, path: &Path) -> OutputResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, save_state(session)?)?;
    tracing::info!(path = %path.display(), sim = %session.params.simulation_id, "state saved");
    Ok(())
}

pub fn load_state_file(path: &Path) -> OutputResult<SimSession> {
    let session = load_state(&fs::read_to_string(path)?)?;
    tracing::info!(
        path = %path.display(),
        sim = %session.params.simulation_id,
        travellers = session.population.len(),
        "state loaded"
    );
    Ok(session)
}
