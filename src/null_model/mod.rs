//! Null model: surrogate realizations of the RSS statistic.
//!
//! Each trial produces one surrogate series, either by circularly shifting
//! every node of the observed series or by loading an externally generated
//! surrogate, and reduces it to an RSS vector. Trials share nothing mutable;
//! results are gathered by trial index and pooled into a single reference
//! distribution for empirical p-values.

mod distribution;
mod sampler;

pub use distribution::{NullDistribution, NullTrial};
pub use sampler::NullModelSampler;

use std::fmt;

use crate::source::SurrogateStore;

/// How surrogate series are produced.
#[derive(Clone, Copy)]
pub enum NullPolicy<'a> {
    /// Roll every node of the observed series by an independent random offset.
    CircularShift,
    /// Load trial `i` from an external store.
    Surrogates(&'a dyn SurrogateStore),
}

impl NullPolicy<'_> {
    /// Short name for logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            NullPolicy::CircularShift => "circular-shift",
            NullPolicy::Surrogates(_) => "surrogates",
        }
    }
}

impl fmt::Debug for NullPolicy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
