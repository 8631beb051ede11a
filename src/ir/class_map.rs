//! Class-directory name to YOLO class id.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Oid2YoloError;

/// Id assigned to class directories the map does not know.
pub const DEFAULT_CLASS_ID: u32 = 0;

/// Built-in table used when no class map file is given.
const BUILTIN_CLASSES: [(&str, u32); 2] = [("Hammer", 0), ("Pipes", 1)];

/// Where a [`ClassMap`] came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassMapSource {
    Builtin,
    ClassesTxt,
    Yaml,
}

#[derive(Clone, Debug)]
pub struct ClassMap {
    ids: BTreeMap<String, u32>,
    source: ClassMapSource,
}

impl Default for ClassMap {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ClassMap {
    /// The fixed `Hammer`/`Pipes` table.
    pub fn builtin() -> Self {
        Self {
            ids: BUILTIN_CLASSES
                .iter()
                .map(|(name, id)| (name.to_string(), *id))
                .collect(),
            source: ClassMapSource::Builtin,
        }
    }

    /// Build a map from names in id order. The first occurrence of a
    /// duplicated name wins.
    pub fn from_names<I, S>(names: I, source: ClassMapSource) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids = BTreeMap::new();
        for (id, name) in names.into_iter().enumerate() {
            ids.entry(name.into()).or_insert(id as u32);
        }
        Self { ids, source }
    }

    /// Load a class map from `classes.txt` or a YOLO-style YAML file.
    ///
    /// The format is picked by extension: `.yaml`/`.yml` are YAML, anything
    /// else is one class name per line.
    pub fn load(path: &Path) -> Result<Self, Oid2YoloError> {
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let data = fs::read_to_string(path).map_err(|source| Oid2YoloError::ClassMapInvalid {
            path: path.to_path_buf(),
            message: format!("cannot read file: {source}"),
        })?;

        if is_yaml {
            parse_yaml_names(&data, path)
        } else {
            parse_classes_txt(&data, path)
        }
    }

    /// Class id for a class directory name. Callers fall back to
    /// [`DEFAULT_CLASS_ID`] when this returns `None`.
    pub fn get(&self, class_dir_name: &str) -> Option<u32> {
        self.ids.get(class_dir_name).copied()
    }

    pub fn source(&self) -> &ClassMapSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn parse_classes_txt(data: &str, path: &Path) -> Result<ClassMap, Oid2YoloError> {
    let mut names = Vec::new();
    for (line_idx, line) in data.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(Oid2YoloError::ClassMapInvalid {
                path: path.to_path_buf(),
                message: format!("line {} is empty", line_idx + 1),
            });
        }
        names.push(trimmed.to_string());
    }

    if names.is_empty() {
        return Err(Oid2YoloError::ClassMapInvalid {
            path: path.to_path_buf(),
            message: "no class names found".to_string(),
        });
    }

    Ok(ClassMap::from_names(names, ClassMapSource::ClassesTxt))
}

#[derive(Debug, Deserialize)]
struct DataYaml {
    names: DataYamlNames,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataYamlNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<u32, String>),
}

fn parse_yaml_names(data: &str, path: &Path) -> Result<ClassMap, Oid2YoloError> {
    let parsed: DataYaml =
        serde_yaml::from_str(data).map_err(|source| Oid2YoloError::ClassMapYamlParse {
            path: path.to_path_buf(),
            source,
        })?;

    match parsed.names {
        DataYamlNames::Sequence(names) => {
            Ok(ClassMap::from_names(names, ClassMapSource::Yaml))
        }
        DataYamlNames::Mapping(mapping) => {
            let mut ids = BTreeMap::new();
            for (id, name) in mapping {
                ids.entry(name).or_insert(id);
            }
            Ok(ClassMap {
                ids,
                source: ClassMapSource::Yaml,
            })
        }
    }
}
