use crate::error::OntoviewError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use toml::map::Map;
use toml::Value;
use url::Url;

static DEFAULT_CONFIG: &str = include_str!("resources/default_config.toml");
static USER_CONFIG: &str = "ontoview.toml";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Service {
    pub base_url: String,
    pub tenant: String,
    pub client_id: String,
    pub ontology_namespace: String,
    pub individual_namespace: String,
    pub graph: String,
    pub timeout: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub service: Service,
    pub prefixes: HashMap<String, String>,
}

impl Config {
    /// Load the configuration for the current directory:
    /// the embedded defaults, with an `ontoview.toml` merged on top
    /// when one exists.
    pub fn load() -> Result<Config, OntoviewError> {
        if Path::new(USER_CONFIG).exists() {
            Config::from_file(USER_CONFIG)
        } else {
            Ok(Config::default())
        }
    }

    /// Parse the given TOML file and merge it over the embedded defaults.
    /// Values from the file win; sections it omits keep their defaults.
    pub fn from_file(path: &str) -> Result<Config, OntoviewError> {
        let user_config = fs::read_to_string(path)?;
        let user_value = user_config.parse::<Value>()?;
        let default_value = DEFAULT_CONFIG.parse::<Value>()?;

        let config: Config = merge(&default_value, &user_value).try_into()?;
        Url::parse(&config.service.base_url)?;

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Config {
        DEFAULT_CONFIG
            .parse::<Value>()
            .and_then(Value::try_into)
            .expect("embedded default configuration should parse")
    }
}

/// Merge two toml::Values.
/// The second argument is given priority in case of conflicts.
/// So, given a default configuration d and a custom configuration c
/// deviating from d, merge(d,c) keeps the custom values specified in c
/// and includes default values from d not specified in c.
fn merge(v1: &Value, v2: &Value) -> Value {
    match (v1, v2) {
        (Value::Table(x), Value::Table(y)) => {
            let mut merge_table = Map::new();
            for (k, v) in x {
                match y.get(k) {
                    Some(yv) => {
                        merge_table.insert(k.clone(), merge(v, yv));
                    }
                    None => {
                        merge_table.insert(k.clone(), v.clone());
                    }
                }
            }
            for (k, v) in y {
                if !merge_table.contains_key(k) {
                    merge_table.insert(k.clone(), v.clone());
                }
            }
            Value::Table(merge_table)
        }
        (Value::Array(x), Value::Array(y)) => {
            let mut merged = [&x[..], &y[..]].concat();
            merged.dedup();
            Value::Array(merged)
        }
        (x, y) if std::mem::discriminant(x) == std::mem::discriminant(y) => y.clone(),
        _ => panic!("Cannot merge inconsistent types."),
    }
}

/// Write a starter `ontoview.toml` into the current directory.
pub fn init() -> Result<String, OntoviewError> {
    if Path::new(USER_CONFIG).exists() {
        Err(OntoviewError::General(String::from(
            "ontoview.toml file already exists.",
        )))
    } else {
        let toml = r#"[service]
base_url = "https://ebu-cdk.innotrade.com"
tenant = "Demo-UUID"
graph = "http://www.ebu.ch/metadata/ontologies/ebucore"
"#;
        fs::write(USER_CONFIG, toml)?;

        Ok(String::from("Initialized an ontoview project"))
    }
}
