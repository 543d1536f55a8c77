use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::geom::CentroidMode;
use crate::map::{AllowList, VillageFilter};

/// Names of the boundary properties the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyKeys {
    /// Village code, 3 or 4 digits.
    pub unit_code: String,
    /// Sub-district code the village belongs to.
    pub parent_code: String,
    /// Display-name keys, tried in order; the first non-empty string wins.
    pub names: Vec<String>,
}

impl Default for PropertyKeys {
    fn default() -> Self {
        Self {
            unit_code: "kd_kelurahan".into(),
            parent_code: "kd_kecamatan".into(),
            names: vec!["nm_kelurahan".into(), "NAMOBJ".into()],
        }
    }
}

/// Deployment configuration: which sub-district and villages to show and how
/// to read the boundary file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parent_code: String,
    pub allow_list: AllowList,
    pub keys: PropertyKeys,
    pub centroid: CentroidMode,
}

impl Default for Config {
    /// Kecamatan Pangatikan (code 041) and its eight villages.
    fn default() -> Self {
        Self {
            parent_code: "041".into(),
            allow_list: AllowList::new([
                ("001", "CITANGTU"),
                ("002", "CIMARAGAS"),
                ("003", "BABAKAN LOA"),
                ("004", "CIHUNI"),
                ("005", "SUKAMULYA"),
                ("006", "SUKAHURIP"),
                ("007", "SUKARASA"),
                ("008", "KARANGSARI"),
            ]),
            keys: PropertyKeys::default(),
            centroid: CentroidMode::default(),
        }
    }
}

impl Config {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Village filter for this deployment.
    pub fn village_filter(&self) -> VillageFilter<'_> {
        VillageFilter::new(&self.allow_list, &self.parent_code, &self.keys)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_is_the_pangatikan_deployment() {
        let config = Config::default();
        assert_eq!(config.parent_code, "041");
        assert_eq!(config.allow_list.len(), 8);
        assert_eq!(config.allow_list.get("1003"), Some("BABAKAN LOA"));
        assert_eq!(config.centroid, CentroidMode::VertexMean);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "parent_code": "040", "allow_list": {{ "1011": "X" }}, "centroid": "area_weighted" }}"#).unwrap();

        let config = Config::from_json_file(file.path()).unwrap();
        assert_eq!(config.parent_code, "040");
        assert_eq!(config.allow_list.get("011"), Some("X"));
        assert_eq!(config.keys, PropertyKeys::default());
        assert_eq!(config.centroid, CentroidMode::AreaWeighted);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Config::from_json_file(Path::new("/nonexistent/pangatikan.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
