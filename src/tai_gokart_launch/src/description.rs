//! Launch description data model
//!
//! A [`LaunchDescription`] is an ordered list of [`LaunchAction`]s. It only
//! describes what should be started; spawning is left to a process supervisor.

use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

/// Where a process' stdout/stderr is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Screen,
    Log,
    Both,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Screen => "screen",
            OutputMode::Log => "log",
            OutputMode::Both => "both",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "screen" => Ok(OutputMode::Screen),
            "log" => Ok(OutputMode::Log),
            "both" => Ok(OutputMode::Both),
            other => Err(format!(
                "Invalid output mode '{}' (expected screen, log or both)",
                other
            )),
        }
    }
}

/// One node process to be started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessLaunchSpec {
    pub package: String,
    pub executable: String,
    pub display_name: String,
    /// Later files override values from earlier ones
    pub parameter_files: Vec<PathBuf>,
    pub pseudo_tty: bool,
    pub output_mode: OutputMode,
}

/// A single entry of a launch description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum LaunchAction {
    Process(ProcessLaunchSpec),
}

impl LaunchAction {
    pub fn as_process(&self) -> Option<&ProcessLaunchSpec> {
        match self {
            LaunchAction::Process(spec) => Some(spec),
        }
    }
}

impl From<ProcessLaunchSpec> for LaunchAction {
    fn from(spec: ProcessLaunchSpec) -> Self {
        LaunchAction::Process(spec)
    }
}

/// Ordered, immutable list of launch actions
///
/// Insertion order is the intended start order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchDescription {
    actions: Vec<LaunchAction>,
}

impl LaunchDescription {
    pub fn new(actions: Vec<LaunchAction>) -> Self {
        Self { actions }
    }

    pub fn actions(&self) -> &[LaunchAction] {
        &self.actions
    }

    /// Iterate over the process actions, in start order
    pub fn processes(&self) -> impl Iterator<Item = &ProcessLaunchSpec> {
        self.actions.iter().filter_map(LaunchAction::as_process)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LaunchAction> {
        self.actions.iter()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<LaunchAction> for LaunchDescription {
    fn from_iter<I: IntoIterator<Item = LaunchAction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LaunchDescription {
    type Item = &'a LaunchAction;
    type IntoIter = std::slice::Iter<'a, LaunchAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn talker() -> ProcessLaunchSpec {
        ProcessLaunchSpec {
            package: "demo_nodes_cpp".to_string(),
            executable: "talker".to_string(),
            display_name: "talker".to_string(),
            parameter_files: vec![PathBuf::from("/tmp/talker.yaml")],
            pseudo_tty: false,
            output_mode: OutputMode::Log,
        }
    }

    #[test]
    fn test_output_mode_parse() {
        assert_eq!("screen".parse::<OutputMode>(), Ok(OutputMode::Screen));
        assert_eq!("log".parse::<OutputMode>(), Ok(OutputMode::Log));
        assert_eq!(" both ".parse::<OutputMode>(), Ok(OutputMode::Both));
        assert!("stdout".parse::<OutputMode>().is_err());
    }

    #[test]
    fn test_output_mode_display() {
        for mode in [OutputMode::Screen, OutputMode::Log, OutputMode::Both] {
            assert_eq!(mode.to_string().parse::<OutputMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_empty_description() {
        let description = LaunchDescription::default();
        assert!(description.is_empty());
        assert_eq!(description.processes().count(), 0);
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut listener = talker();
        listener.executable = "listener".to_string();
        listener.display_name = "listener".to_string();

        let description: LaunchDescription = vec![talker(), listener]
            .into_iter()
            .map(LaunchAction::from)
            .collect();

        let names: Vec<_> = description
            .processes()
            .map(|p| p.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["talker", "listener"]);
    }

    #[test]
    fn test_serialize_tagged_action() {
        let description = LaunchDescription::new(vec![talker().into()]);
        let json = description.to_json().unwrap();
        assert!(json.contains("\"type\": \"process\""));
        assert!(json.contains("\"output_mode\": \"log\""));
        assert!(json.contains("\"display_name\": \"talker\""));
    }
}
