//! Schema store construction and lookup.
//!
//! Construction is all-or-nothing: the first entry that fails to parse or
//! violates an invariant aborts the whole load with `InvalidSchema`, naming
//! the entry. A store that exists is therefore fully valid, and it is never
//! mutated afterwards, so it can be shared freely (`Arc<PriorSchemaStore>`)
//! between concurrent resolutions.

use std::collections::BTreeMap;
use std::io::Read;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::domain::{ParameterKey, PriorEntry, PriorSpec};
use crate::error::PriorError;

/// Prior schema bundled with the crate, covering the lensing mass profiles.
const BUNDLED_MASS_PROFILES: &str = include_str!("../../config/priors/mass_profiles.json");

const DOCUMENT: &str = "<document>";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriorSchemaStore {
    classes: BTreeMap<String, BTreeMap<String, PriorSpec>>,
}

impl PriorSchemaStore {
    /// Build a store from a parsed configuration document.
    pub fn from_document(document: Value) -> Result<Self, PriorError> {
        let Value::Object(classes) = document else {
            return Err(PriorError::invalid_schema(
                DOCUMENT,
                "top level must map model class names to parameter tables",
            ));
        };

        let mut out: BTreeMap<String, BTreeMap<String, PriorSpec>> = BTreeMap::new();
        for (model_class, parameters) in classes {
            let Value::Object(parameters) = parameters else {
                return Err(PriorError::invalid_schema(
                    &model_class,
                    "model class must map parameter names to prior entries",
                ));
            };

            let mut specs = BTreeMap::new();
            for (parameter, entry) in parameters {
                let key = ParameterKey::new(model_class.as_str(), parameter.as_str());
                let spec = parse_entry(&key, entry)?;
                specs.insert(parameter, spec);
            }
            out.insert(model_class, specs);
        }

        let store = Self { classes: out };
        info!(
            model_classes = store.classes.len(),
            entries = store.len(),
            "loaded prior schema"
        );
        Ok(store)
    }

    pub fn from_json_str(json: &str) -> Result<Self, PriorError> {
        let document: Value = serde_json::from_str(json)
            .map_err(|e| PriorError::invalid_schema(DOCUMENT, format!("not valid JSON: {e}")))?;
        Self::from_document(document)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PriorError> {
        let document: Value = serde_json::from_reader(reader)
            .map_err(|e| PriorError::invalid_schema(DOCUMENT, format!("not valid JSON: {e}")))?;
        Self::from_document(document)
    }

    /// The schema shipped with the crate.
    pub fn bundled() -> Result<Self, PriorError> {
        Self::from_json_str(BUNDLED_MASS_PROFILES)
    }

    pub fn lookup(&self, model_class: &str, parameter: &str) -> Result<PriorSpec, PriorError> {
        self.classes
            .get(model_class)
            .and_then(|params| params.get(parameter))
            .copied()
            .ok_or_else(|| PriorError::UnknownParameter {
                model_class: model_class.to_string(),
                parameter: parameter.to_string(),
            })
    }

    pub fn contains(&self, model_class: &str, parameter: &str) -> bool {
        self.classes
            .get(model_class)
            .is_some_and(|params| params.contains_key(parameter))
    }

    /// Model class names in sorted order.
    pub fn model_classes(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Parameter names of a class in sorted order, or `None` for an unknown class.
    pub fn parameters(&self, model_class: &str) -> Option<Vec<&str>> {
        self.classes
            .get(model_class)
            .map(|params| params.keys().map(String::as_str).collect())
    }

    /// Every entry, ordered by class then parameter.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterKey, &PriorSpec)> {
        self.classes.iter().flat_map(|(model_class, params)| {
            params
                .iter()
                .map(move |(parameter, spec)| (ParameterKey::new(model_class.as_str(), parameter.as_str()), spec))
        })
    }

    /// Total number of (class, parameter) entries.
    pub fn len(&self) -> usize {
        self.classes.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The canonical document form of the store.
    pub fn to_document(&self) -> Result<Value, PriorError> {
        serde_json::to_value(self)
            .map_err(|e| PriorError::invalid_schema(DOCUMENT, format!("failed to serialize: {e}")))
    }
}

fn parse_entry(key: &ParameterKey, entry: Value) -> Result<PriorSpec, PriorError> {
    let entry: PriorEntry = serde_json::from_value(entry)
        .map_err(|e| PriorError::invalid_schema(key.to_string(), e.to_string()))?;
    PriorSpec::try_from(entry).map_err(|v| PriorError::invalid_schema(key.to_string(), v.0))
}
