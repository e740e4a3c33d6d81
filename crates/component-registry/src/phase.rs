//! # Lifecycle Phases
//!
//! This module defines the phases a component moves through and the steps the
//! registry runs to get it there.
//!
//! ```text
//! Created --assemble--> Assembled --setup--> SetUp --teardown--> TornDown
//! ```
//!
//! Phases are totally ordered, so "has this component reached setup yet" is a
//! plain comparison.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle phase of a single component, or of the registry as a whole.
///
/// A component's phase only moves forward. The registry never records an
/// intermediate "being resolved" state here; that lives in a separate
/// in-progress marker (see [`Registry`](crate::Registry)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The factory ran and the instance is stored under its name.
    Created,
    /// The assembly step ran; references to other components are wired.
    Assembled,
    /// The setup step ran (or was attempted from inside an ordering call).
    SetUp,
    /// The teardown step ran. Terminal.
    TornDown,
}

impl Phase {
    /// Get the phase name.
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Created => "created",
            Phase::Assembled => "assembled",
            Phase::SetUp => "set up",
            Phase::TornDown => "torn down",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the three component steps the registry drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Assemble,
    Setup,
    Teardown,
}

impl Step {
    /// The phase a component must be in for this step to run on it.
    pub fn from_phase(&self) -> Phase {
        match self {
            Step::Assemble => Phase::Created,
            Step::Setup => Phase::Assembled,
            Step::Teardown => Phase::SetUp,
        }
    }

    /// The phase a component is moved to once this step ran.
    pub fn to_phase(&self) -> Phase {
        match self {
            Step::Assemble => Phase::Assembled,
            Step::Setup => Phase::SetUp,
            Step::Teardown => Phase::TornDown,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Assemble => "assembly",
            Step::Setup => "setup",
            Step::Teardown => "teardown",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::Created < Phase::Assembled);
        assert!(Phase::Assembled < Phase::SetUp);
        assert!(Phase::SetUp < Phase::TornDown);
    }

    #[test]
    fn steps_chain_phases() {
        assert_eq!(Step::Assemble.to_phase(), Step::Setup.from_phase());
        assert_eq!(Step::Setup.to_phase(), Step::Teardown.from_phase());
        assert_eq!(Step::Teardown.to_phase(), Phase::TornDown);
    }

    #[test]
    fn display_names() {
        assert_eq!(Step::Assemble.to_string(), "assembly");
        assert_eq!(Phase::SetUp.to_string(), "set up");
    }
}
