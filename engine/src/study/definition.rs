use std::fmt;

use corelib::{Bar, StudyOutput};
use serde_json::{Map, Value};

use super::{Indicator, StudyInstance};
use crate::error::StudyError;

/// Parameters in their erased form: a JSON object keyed by parameter name.
pub type StudyParams = Map<String, Value>;

type ComputeFn = dyn Fn(&[Bar], StudyParams) -> Result<Vec<StudyOutput>, StudyError> + Send + Sync;
type RenderFn<T> = dyn Fn(&mut T, Vec<StudyOutput>) -> Box<dyn StudyInstance> + Send + Sync;

/// A registered study: data (id, name, defaults) plus behavior (compute, render).
///
/// `T` is the render target. It is opaque here and passed to the render hook
/// untouched.
pub struct StudyDefinition<T> {
    id: String,
    name: String,
    defaults: StudyParams,
    aliases: &'static [(&'static str, &'static str)],
    compute: Box<ComputeFn>,
    render: Box<RenderFn<T>>,
}

impl<T> StudyDefinition<T> {
    /// Pairs an indicator with a render hook for target type `T`.
    ///
    /// Fails with `InvalidParams` if the indicator's defaults do not
    /// serialize to a JSON object.
    pub fn new<I, R>(indicator: I, render: R) -> Result<Self, StudyError>
    where
        I: Indicator,
        R: Fn(&mut T, Vec<StudyOutput>) -> Box<dyn StudyInstance> + Send + Sync + 'static,
    {
        let id = indicator.id().to_string();
        let name = indicator.name().to_string();
        let aliases = indicator.param_aliases();

        let defaults = match serde_json::to_value(indicator.defaults()) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(StudyError::InvalidParams {
                    study: id,
                    reason: format!("defaults must be an object, got {other}"),
                });
            }
            Err(e) => {
                return Err(StudyError::InvalidParams {
                    study: id,
                    reason: e.to_string(),
                });
            }
        };

        let study = id.clone();
        let compute =
            move |bars: &[Bar], merged: StudyParams| -> Result<Vec<StudyOutput>, StudyError> {
                let params: I::Params =
                    serde_json::from_value(Value::Object(merged)).map_err(|e| {
                        StudyError::InvalidParams {
                            study: study.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                Ok(indicator.compute(bars, &params))
            };

        Ok(Self {
            id,
            name,
            defaults,
            aliases,
            compute: Box::new(compute),
            render: Box::new(render),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn defaults(&self) -> &StudyParams {
        &self.defaults
    }

    /// Shallow merge: caller keys win, missing keys fall back to defaults.
    /// Nested objects are replaced wholesale, not merged. Aliased caller keys
    /// are renamed first; when both spellings are given the canonical one wins.
    pub fn merge_params(&self, overrides: Option<&Value>) -> Result<StudyParams, StudyError> {
        let mut merged = self.defaults.clone();

        match overrides {
            None | Some(Value::Null) => {}
            Some(Value::Object(map)) => {
                for (k, v) in map {
                    let key = self.canonical_key(k);
                    if key != k.as_str() && map.contains_key(key) {
                        continue;
                    }
                    merged.insert(key.to_string(), v.clone());
                }
            }
            Some(other) => {
                return Err(StudyError::InvalidParams {
                    study: self.id.clone(),
                    reason: format!("parameters must be an object, got {other}"),
                });
            }
        }

        Ok(merged)
    }

    fn canonical_key<'a>(&self, key: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(alias, _)| *alias == key)
            .map_or(key, |&(_, canonical)| canonical)
    }

    /// Runs the computation without rendering anything.
    pub fn compute(
        &self,
        bars: &[Bar],
        overrides: Option<&Value>,
    ) -> Result<Vec<StudyOutput>, StudyError> {
        let merged = self.merge_params(overrides)?;
        (self.compute)(bars, merged)
    }

    pub(crate) fn render(&self, target: &mut T, outputs: Vec<StudyOutput>) -> Box<dyn StudyInstance> {
        (self.render)(target, outputs)
    }
}

impl<T> fmt::Debug for StudyDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudyDefinition")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
