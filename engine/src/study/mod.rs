pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{StudyDefinition, StudyParams};
pub use instance::{LineStudyInstance, StudyInstance};
pub use registry::StudyRegistry;

use corelib::{Bar, StudyOutput};
use serde::{Serialize, de::DeserializeOwned};

/// Core indicator trait.
///
/// An indicator:
/// - is stateless and reusable across attachments
/// - turns a bar slice plus typed parameters into zero or more named outputs
/// - recomputes from scratch on every call
pub trait Indicator: Send + Sync + 'static {
    /// Parameter shape. Must serialize to a JSON object so callers can
    /// override individual keys.
    type Params: Serialize + DeserializeOwned;

    /// Stable identifier the study is registered under.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    fn defaults(&self) -> Self::Params;

    /// Alternate caller-side parameter names, as `(alias, canonical)` pairs.
    /// Aliased keys are renamed before they are merged over the defaults.
    fn param_aliases(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    fn compute(&self, bars: &[Bar], params: &Self::Params) -> Vec<StudyOutput>;
}
