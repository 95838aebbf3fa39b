//! Command-line and record generation

use crate::{
    description::{LaunchDescription, ProcessLaunchSpec},
    error::GenerationError,
    package::{executable_path, PackageLocator},
    params::{load_param_file, node_fqn, ParamFile},
    record::types::{NodeRecord, RecordJson},
};
use std::{collections::HashMap, path::Path};

const ROOT_NAMESPACE: &str = "/";

pub struct RecordGenerator;

impl RecordGenerator {
    /// Convert every process of a description into a node record
    pub fn generate(
        description: &LaunchDescription,
        locator: &dyn PackageLocator,
    ) -> Result<RecordJson, GenerationError> {
        let mut record = RecordJson::new();
        let mut exec_counts: HashMap<&str, usize> = HashMap::new();

        for spec in description.processes() {
            let count = exec_counts.entry(spec.display_name.as_str()).or_insert(0);
            *count += 1;
            let exec_name = format!("{}-{}", spec.display_name, count);

            let mut node = Self::generate_node_record(spec, locator)?;
            node.exec_name = Some(exec_name);

            let fqn = node_fqn(ROOT_NAMESPACE, &spec.display_name);
            for param_file in &spec.parameter_files {
                let Some(loaded) = Self::try_load_param_file(param_file, &fqn) else {
                    continue;
                };
                // Later files override earlier ones
                for (key, value) in loaded.params {
                    match node.params.iter_mut().find(|(k, _)| *k == key) {
                        Some(existing) => existing.1 = value,
                        None => node.params.push((key, value)),
                    }
                }
                record
                    .file_data
                    .insert(param_file.display().to_string(), loaded.content);
            }

            record.node.push(node);
        }

        log::debug!("Generated {} node records", record.node.len());
        Ok(record)
    }

    pub fn generate_node_record(
        spec: &ProcessLaunchSpec,
        locator: &dyn PackageLocator,
    ) -> Result<NodeRecord, GenerationError> {
        let cmd = Self::generate_node_command(spec, locator)?;

        Ok(NodeRecord {
            executable: spec.executable.clone(),
            package: Some(spec.package.clone()),
            name: Some(spec.display_name.clone()),
            namespace: Some(ROOT_NAMESPACE.to_string()),
            exec_name: None,
            params: Vec::new(),
            params_files: spec
                .parameter_files
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            remaps: Vec::new(),
            ros_args: None,
            args: None,
            cmd,
            env: None,
            respawn: Some(false),
            respawn_delay: None,
            global_params: None,
            output: Some(spec.output_mode.to_string()),
            emulate_tty: Some(spec.pseudo_tty),
        })
    }

    pub fn generate_node_command(
        spec: &ProcessLaunchSpec,
        locator: &dyn PackageLocator,
    ) -> Result<Vec<String>, GenerationError> {
        let mut cmd = Vec::new();

        // 1. Executable path
        let share_dir = locator.resolve_share_directory(&spec.package)?;
        let exec_path = executable_path(&share_dir, &spec.package, &spec.executable)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| spec.executable.clone());
        cmd.push(exec_path);

        // 2. ROS args delimiter
        cmd.push("--ros-args".to_string());

        // 3. Node name and namespace
        cmd.push("-r".to_string());
        cmd.push(format!("__node:={}", spec.display_name));
        cmd.push("-r".to_string());
        cmd.push(format!("__ns:={}", ROOT_NAMESPACE));

        // 4. Parameter files, in override order
        for param_file in &spec.parameter_files {
            cmd.push("--params-file".to_string());
            cmd.push(param_file.display().to_string());
        }

        Ok(cmd)
    }

    /// Missing or malformed files are reported by the supervisor at launch time
    fn try_load_param_file(path: &Path, fqn: &str) -> Option<ParamFile> {
        match load_param_file(path, fqn) {
            Ok(loaded) => Some(loaded),
            Err(e) => {
                log::warn!("Failed to load parameter file {}: {}", path.display(), e);
                None
            }
        }
    }
}
