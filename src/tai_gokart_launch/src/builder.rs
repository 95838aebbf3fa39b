//! Launch description for the go-kart controller node

use crate::{
    description::{LaunchAction, LaunchDescription, OutputMode, ProcessLaunchSpec},
    error::{ConfigError, Result},
    package::PackageLocator,
};
use std::path::{Component, Path, PathBuf};

pub const CONTROLLER_PACKAGE: &str = "tai_gokart_controller";
pub const CONTROLLER_EXECUTABLE: &str = "tai_gokart_controller_node";
pub const CONTROLLER_NODE_NAME: &str = "tai_gokart_controller_node";
pub const PARAM_DIR: &str = "param";
pub const PARAM_FILE: &str = "tai_gokart_controller_param.yaml";

/// What to launch, relative to a package's share directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLaunchConfig {
    package: String,
    executable: String,
    name: String,
    /// Parameter file path segments below the share directory
    param_file: Vec<String>,
    emulate_tty: bool,
    output: OutputMode,
}

impl NodeLaunchConfig {
    /// Validated config with `emulate_tty` on and screen output.
    ///
    /// Identifiers must be non-empty and every parameter path segment must be
    /// a plain relative name, so the file always stays below the share
    /// directory.
    pub fn new<I, S>(
        package: impl Into<String>,
        executable: impl Into<String>,
        name: impl Into<String>,
        param_file: I,
    ) -> std::result::Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let package = non_empty("package", package.into())?;
        let executable = non_empty("executable", executable.into())?;
        let name = non_empty("name", name.into())?;

        let param_file: Vec<String> = param_file.into_iter().map(Into::into).collect();
        if param_file.is_empty() {
            return Err(ConfigError::EmptyParamPath);
        }
        for segment in &param_file {
            let mut components = Path::new(segment).components().peekable();
            if components.peek().is_none()
                || !components.all(|c| matches!(c, Component::Normal(_)))
            {
                return Err(ConfigError::InvalidParamSegment(segment.clone()));
            }
        }

        Ok(Self {
            package,
            executable,
            name,
            param_file,
            emulate_tty: true,
            output: OutputMode::Screen,
        })
    }

    pub fn with_emulate_tty(mut self, emulate_tty: bool) -> Self {
        self.emulate_tty = emulate_tty;
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_file(&self) -> &[String] {
        &self.param_file
    }

    pub fn emulate_tty(&self) -> bool {
        self.emulate_tty
    }

    pub fn output(&self) -> OutputMode {
        self.output
    }
}

fn non_empty(field: &'static str, value: String) -> std::result::Result<String, ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::EmptyField(field))
    } else {
        Ok(value)
    }
}

impl Default for NodeLaunchConfig {
    fn default() -> Self {
        Self {
            package: CONTROLLER_PACKAGE.to_string(),
            executable: CONTROLLER_EXECUTABLE.to_string(),
            name: CONTROLLER_NODE_NAME.to_string(),
            param_file: vec![PARAM_DIR.to_string(), PARAM_FILE.to_string()],
            emulate_tty: true,
            output: OutputMode::Screen,
        }
    }
}

pub struct LaunchDescriptionBuilder<L> {
    locator: L,
    config: NodeLaunchConfig,
}

impl<L: PackageLocator> LaunchDescriptionBuilder<L> {
    pub fn new(locator: L) -> Self {
        Self {
            locator,
            config: NodeLaunchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: NodeLaunchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &NodeLaunchConfig {
        &self.config
    }

    /// Resolve the parameter file and describe the node to launch.
    ///
    /// A missing package is returned unchanged from the locator. The
    /// parameter file itself is not checked for existence here.
    pub fn build(&self) -> Result<LaunchDescription> {
        let share_dir = self.locator.resolve_share_directory(&self.config.package)?;
        let param_file = join_segments(&share_dir, &self.config.param_file);

        let node = ProcessLaunchSpec {
            package: self.config.package.clone(),
            executable: self.config.executable.clone(),
            display_name: self.config.name.clone(),
            parameter_files: vec![param_file],
            pseudo_tty: self.config.emulate_tty,
            output_mode: self.config.output,
        };

        Ok(LaunchDescription::new(vec![LaunchAction::Process(node)]))
    }
}

fn join_segments(base: &Path, segments: &[String]) -> PathBuf {
    segments
        .iter()
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

/// Build the go-kart controller launch description with the default setup
pub fn generate_launch_description(locator: &dyn PackageLocator) -> Result<LaunchDescription> {
    LaunchDescriptionBuilder::new(locator).build()
}
