use std::sync::{Arc, Weak};

use corelib::Bar;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{StudyDefinition, StudyInstance};
use crate::error::StudyError;
use crate::registration::Registration;

type Definitions<T> = RwLock<Vec<Arc<StudyDefinition<T>>>>;

/// Maps stable study ids to definitions and turns
/// "bars + study id + optional params" into a rendered instance.
///
/// Cloning yields another handle onto the same table. The registry is
/// stateless between `attach` calls: no caching, no reference to the
/// instances it hands out.
pub struct StudyRegistry<T> {
    /// Registered definitions, in registration order.
    defs: Arc<Definitions<T>>,
}

impl<T> Clone for StudyRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            defs: Arc::clone(&self.defs),
        }
    }
}

impl<T> Default for StudyRegistry<T> {
    fn default() -> Self {
        Self {
            defs: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<T: 'static> StudyRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `def` under its id.
    ///
    /// Fails with `DuplicateId` if the id is taken; the existing entry is left
    /// untouched.
    pub fn register(&self, def: StudyDefinition<T>) -> Result<Registration, StudyError> {
        let mut defs = self.defs.write();

        if defs.iter().any(|d| d.id() == def.id()) {
            warn!(study_id = %def.id(), "duplicate study registration rejected");
            return Err(StudyError::DuplicateId(def.id().to_string()));
        }

        let entry = Arc::new(def);
        let id = entry.id().to_string();
        defs.push(Arc::clone(&entry));
        debug!(study_id = %id, total = defs.len(), "study registered");

        let table: Weak<Definitions<T>> = Arc::downgrade(&self.defs);
        let target: Weak<StudyDefinition<T>> = Arc::downgrade(&entry);

        Ok(Registration::new(id, move || {
            let Some(table) = table.upgrade() else {
                return false;
            };
            let mut defs = table.write();
            let before = defs.len();
            defs.retain(|d| !std::ptr::eq(Arc::as_ptr(d), target.as_ptr()));
            before != defs.len()
        }))
    }

    pub fn get(&self, id: &str) -> Option<Arc<StudyDefinition<T>>> {
        self.defs.read().iter().find(|d| d.id() == id).cloned()
    }

    /// All definitions, in registration order.
    pub fn list(&self) -> Vec<Arc<StudyDefinition<T>>> {
        self.defs.read().clone()
    }

    pub fn len(&self) -> usize {
        self.defs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.read().is_empty()
    }

    /// Computes `study_id` over `bars` and renders the outputs into `target`.
    ///
    /// Flow:
    /// 1) Resolve the definition (`UnknownStudy` if absent; nothing runs).
    /// 2) Shallow-merge `params` over the study defaults.
    /// 3) Compute outputs from scratch.
    /// 4) Hand the outputs to the render hook and return its instance.
    ///
    /// The caller owns the returned instance and must `remove()` it.
    #[instrument(skip(self, target, bars, params), target = "studies", fields(bars = bars.len()))]
    pub fn attach(
        &self,
        target: &mut T,
        bars: &[Bar],
        study_id: &str,
        params: Option<&Value>,
    ) -> Result<Box<dyn StudyInstance>, StudyError> {
        // Clone the Arc out so the lock is not held while user code runs.
        let def = self
            .get(study_id)
            .ok_or_else(|| StudyError::UnknownStudy(study_id.to_string()))?;

        let outputs = def.compute(bars, params)?;
        debug!(outputs = outputs.len(), "study computed");

        Ok(def.render(target, outputs))
    }
}
