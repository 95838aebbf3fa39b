//! tai_gokart_launch library
//!
//! Builds the launch description of the Triton AI go-kart controller node and
//! renders it into record.json for a process supervisor.

pub mod builder;
pub mod description;
pub mod error;
pub mod package;
pub mod params;
pub mod record;

pub use builder::{generate_launch_description, LaunchDescriptionBuilder, NodeLaunchConfig};
pub use description::{LaunchAction, LaunchDescription, OutputMode, ProcessLaunchSpec};
pub use error::{ConfigError, GenerationError, ParamError, ResolveError};
pub use package::{AmentIndexLocator, FixedLocator, PackageLocator};
pub use record::{RecordGenerator, RecordJson};

/// Build the controller launch description and its record in one go
pub fn generate_record(locator: &dyn PackageLocator) -> Result<RecordJson, GenerationError> {
    let description = generate_launch_description(locator)?;
    RecordGenerator::generate(&description, locator)
}
