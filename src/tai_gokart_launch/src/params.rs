//! Parameter file loading

use crate::error::ParamError;
use serde_yaml::{Mapping, Value};
use std::{fs, path::Path};

const ROS_PARAMETERS_KEY: &str = "ros__parameters";

/// A parameter file as read from disk
#[derive(Debug, Clone, PartialEq)]
pub struct ParamFile {
    pub content: String,
    /// Flattened parameters that apply to the requested node, in file order
    pub params: Vec<(String, String)>,
}

/// Load a ROS 2 parameter file and keep the parameters applying to one node.
///
/// ```yaml
/// tai_gokart_controller_node:
///   ros__parameters:
///     comm_type: serial
///     serial:
///       port: /dev/ttyACM0
/// ```
///
/// yields `("comm_type", "serial")` and `("serial.port", "/dev/ttyACM0")` for
/// the node `/tai_gokart_controller_node`.
pub fn load_param_file(path: &Path, node_fqn: &str) -> Result<ParamFile, ParamError> {
    let content = fs::read_to_string(path)?;
    let params = parse_params(&content, node_fqn)?;
    Ok(ParamFile { content, params })
}

/// Parameters of every section whose key matches `node_fqn`.
///
/// Section keys follow the ROS 2 rules: relative keys are rooted at `/`,
/// nested mappings join into a namespace path, `*` matches one segment and
/// `**` any number of them. A key set by a later section overrides the
/// earlier value.
pub fn parse_params(content: &str, node_fqn: &str) -> Result<Vec<(String, String)>, ParamError> {
    let yaml: Value = serde_yaml::from_str(content)?;
    let mut params = Vec::new();

    if let Value::Mapping(root_map) = yaml {
        for (key, node_value) in root_map.iter() {
            if let Some(key_str) = key_to_string(key) {
                collect_node_params(&key_str, node_value, node_fqn, &mut params);
            }
        }
    }

    Ok(params)
}

/// Fully qualified node name, e.g. `/kart/tai_gokart_controller_node`
pub fn node_fqn(namespace: &str, name: &str) -> String {
    let namespace = namespace.trim_end_matches('/');
    if namespace.is_empty() {
        format!("/{}", name)
    } else if namespace.starts_with('/') {
        format!("{}/{}", namespace, name)
    } else {
        format!("/{}/{}", namespace, name)
    }
}

/// A node section holds `ros__parameters`, possibly below nested namespace keys
fn collect_node_params(
    section: &str,
    value: &Value,
    node_fqn: &str,
    output: &mut Vec<(String, String)>,
) {
    let Value::Mapping(map) = value else {
        return;
    };

    match map.get(ROS_PARAMETERS_KEY) {
        Some(Value::Mapping(params_map)) => {
            if section_matches(section, node_fqn) {
                flatten_params("", params_map, output);
            } else {
                log::debug!("Skipping parameter section {} for {}", section, node_fqn);
            }
        }
        Some(_) => {}
        None => {
            // e.g. `/namespace: { node: { ros__parameters: ... } }`
            for (key, nested) in map.iter() {
                if let Some(key_str) = key_to_string(key) {
                    let nested_section = format!("{}/{}", section.trim_end_matches('/'), key_str);
                    collect_node_params(&nested_section, nested, node_fqn, output);
                }
            }
        }
    }
}

fn section_matches(section: &str, node_fqn: &str) -> bool {
    let pattern: Vec<&str> = section.split('/').filter(|s| !s.is_empty()).collect();
    let name: Vec<&str> = node_fqn.split('/').filter(|s| !s.is_empty()).collect();
    glob_segments(&pattern, &name)
}

fn glob_segments(pattern: &[&str], name: &[&str]) -> bool {
    match pattern.split_first() {
        None => name.is_empty(),
        Some((&"**", rest)) => (0..=name.len()).any(|skip| glob_segments(rest, &name[skip..])),
        Some((segment, rest)) => match name.split_first() {
            Some((head, name_rest)) => {
                (*segment == "*" || segment == head) && glob_segments(rest, name_rest)
            }
            None => false,
        },
    }
}

/// Recursively flatten nested parameter maps
fn flatten_params(prefix: &str, map: &Mapping, output: &mut Vec<(String, String)>) {
    for (key, value) in map.iter() {
        let Some(key_str) = key_to_string(key) else {
            continue;
        };
        let full_key = if prefix.is_empty() {
            key_str
        } else {
            format!("{}.{}", prefix, key_str)
        };
        flatten_value(full_key, value, output);
    }
}

fn flatten_value(full_key: String, value: &Value, output: &mut Vec<(String, String)>) {
    let rendered = match value {
        Value::Mapping(nested_map) => return flatten_params(&full_key, nested_map, output),
        Value::Tagged(tagged) => return flatten_value(full_key, &tagged.value, output),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // Arrays get serialized as JSON
        Value::Sequence(seq) => {
            serde_json::to_string(seq).unwrap_or_else(|_| format!("{:?}", seq))
        }
        Value::Null => "null".to_string(),
    };

    match output.iter_mut().find(|(k, _)| *k == full_key) {
        Some(existing) => existing.1 = rendered,
        None => output.push((full_key, rendered)),
    }
}

fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const NODE: &str = "/tai_gokart_controller_node";

    fn find<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_load_controller_params() {
        let yaml = r#"
tai_gokart_controller_node:
  ros__parameters:
    comm_type: "serial"
    serial:
      port: "/dev/ttyACM0"
      baud_rate: 115200
    sensor_pub_hz: 100
    max_steering_left: 0.524
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file.flush().unwrap();

        let loaded = load_param_file(file.path(), NODE).unwrap();
        assert_eq!(loaded.content, yaml);

        let params = loaded.params;
        assert_eq!(params.len(), 5);
        assert_eq!(find(&params, "comm_type"), Some("serial"));
        assert_eq!(find(&params, "serial.port"), Some("/dev/ttyACM0"));
        assert_eq!(find(&params, "serial.baud_rate"), Some("115200"));
        assert_eq!(find(&params, "max_steering_left"), Some("0.524"));
    }

    #[test]
    fn test_other_node_sections_excluded() {
        let yaml = r#"
other_node:
  ros__parameters:
    timeout_ms: 1
tai_gokart_controller_node:
  ros__parameters:
    timeout_ms: 2
"#;
        let params = parse_params(yaml, NODE).unwrap();
        assert_eq!(params, vec![("timeout_ms".to_string(), "2".to_string())]);
    }

    #[test]
    fn test_later_section_overrides() {
        let yaml = r#"
/**:
  ros__parameters:
    use_sim_time: false
    max_throttle: 0.5
/tai_gokart_controller_node:
  ros__parameters:
    max_throttle: 1.0
"#;
        let params = parse_params(yaml, NODE).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(find(&params, "use_sim_time"), Some("false"));
        assert_eq!(find(&params, "max_throttle"), Some("1.0"));
    }

    #[test]
    fn test_namespaced_sections() {
        let yaml = r#"
/kart:
  tai_gokart_controller_node:
    ros__parameters:
      max_brake: 2000.0
/*/tai_gokart_controller_node:
  ros__parameters:
    min_brake: 200.0
"#;
        let root = parse_params(yaml, NODE).unwrap();
        assert!(root.is_empty());

        let namespaced = parse_params(yaml, "/kart/tai_gokart_controller_node").unwrap();
        assert_eq!(find(&namespaced, "max_brake"), Some("2000.0"));
        assert_eq!(find(&namespaced, "min_brake"), Some("200.0"));
    }

    #[test]
    fn test_node_fqn() {
        assert_eq!(node_fqn("/", "talker"), "/talker");
        assert_eq!(node_fqn("", "talker"), "/talker");
        assert_eq!(node_fqn("/kart/", "talker"), "/kart/talker");
        assert_eq!(node_fqn("kart", "talker"), "/kart/talker");
    }

    #[test]
    fn test_array_params() {
        let yaml = r#"
tai_gokart_controller_node:
  ros__parameters:
    gains: [1, 2, 3]
"#;
        let params = parse_params(yaml, NODE).unwrap();
        assert_eq!(find(&params, "gains"), Some("[1,2,3]"));
    }

    #[test]
    fn test_tagged_value_uses_inner_value() {
        let yaml = r#"
tai_gokart_controller_node:
  ros__parameters:
    comm_type: !custom serial
    limits: !custom
      max: 3
"#;
        let params = parse_params(yaml, NODE).unwrap();
        assert_eq!(find(&params, "comm_type"), Some("serial"));
        assert_eq!(find(&params, "limits.max"), Some("3"));
    }

    #[test]
    fn test_missing_file() {
        let result = load_param_file(Path::new("/nonexistent/param.yaml"), NODE);
        assert!(matches!(result, Err(ParamError::IoError(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        let result = parse_params("node: [unterminated", NODE);
        assert!(matches!(result, Err(ParamError::YamlError(_))));
    }
}
