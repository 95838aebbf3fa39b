//! record.json data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root structure for record.json
///
/// `container` and `load_node` stay empty: the go-kart description only holds
/// plain node processes. The keys are kept so record consumers see the
/// complete layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordJson {
    pub node: Vec<NodeRecord>,
    pub container: Vec<serde_json::Value>,
    pub load_node: Vec<serde_json::Value>,
    pub lifecycle_node: Vec<String>,
    /// Parameter file contents keyed by path
    pub file_data: BTreeMap<String, String>,
}

impl RecordJson {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Node record structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub executable: String,
    pub package: Option<String>,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub exec_name: Option<String>,
    pub params: Vec<(String, String)>,
    pub params_files: Vec<String>,
    pub remaps: Vec<(String, String)>,
    pub ros_args: Option<Vec<String>>,
    pub args: Option<Vec<String>>,
    pub cmd: Vec<String>,
    pub env: Option<Vec<(String, String)>>,
    pub respawn: Option<bool>,
    pub respawn_delay: Option<f64>,
    pub global_params: Option<Vec<(String, String)>>,
    pub output: Option<String>,
    pub emulate_tty: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_empty() {
        let record = RecordJson::new();
        let json = record.to_json().unwrap();
        assert!(json.contains("\"node\""));
        assert!(json.contains("\"container\""));
        assert!(json.contains("\"load_node\""));
        assert!(json.contains("\"lifecycle_node\""));
        assert!(json.contains("\"file_data\""));
    }

    #[test]
    fn test_tuple_serialization() {
        let node = NodeRecord {
            executable: "tai_gokart_controller_node".to_string(),
            package: Some("tai_gokart_controller".to_string()),
            name: Some("tai_gokart_controller_node".to_string()),
            namespace: Some("/".to_string()),
            exec_name: None,
            params: vec![
                ("comm_type".to_string(), "serial".to_string()),
                ("sensor_pub_hz".to_string(), "100".to_string()),
            ],
            params_files: vec![],
            remaps: vec![],
            ros_args: None,
            args: None,
            cmd: vec![],
            env: None,
            respawn: Some(false),
            respawn_delay: None,
            global_params: None,
            output: Some("screen".to_string()),
            emulate_tty: Some(true),
        };

        let json = serde_json::to_string(&node).unwrap();
        // Tuples should serialize as arrays
        assert!(json.contains("[\"comm_type\",\"serial\"]"));
        assert!(json.contains("\"output\":\"screen\""));
        assert!(json.contains("\"emulate_tty\":true"));
    }
}
