use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// One of the lifecycle requests a controlling facility can make of a service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Initialize,
    Run,
    Pause,
    Resume,
    Stop,
    Shutdown,
}

impl ControlAction {
    /// Actions whose timeout may be changed by the service author.
    pub const CONFIGURABLE: [ControlAction; 4] = [
        ControlAction::Initialize,
        ControlAction::Pause,
        ControlAction::Resume,
        ControlAction::Stop,
    ];

    pub fn is_configurable(&self) -> bool {
        Self::CONFIGURABLE.contains(self)
    }

    /// Everything except `Run` goes through the control request dispatcher.
    pub fn is_dispatchable(&self) -> bool {
        !matches!(self, ControlAction::Run)
    }
}

/// Severity attached to an operator-visible event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[cfg(test)]
#[path = "./action_test.rs"]
mod action_test;
