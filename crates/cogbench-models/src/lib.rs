//! Baseline cognitive models and syllogistic domain helpers.
//!
//! Registers into the core registries via [`register_builtins`]; the
//! plugins become addressable from benchmark manifests under the kinds
//! `uniform`, `mfa`, and `nvc`, and the syllogistic encoders under the
//! key `syllogistic`.

pub mod mfa;
pub mod nvc;
pub mod syllogistic;
pub mod uniform;

use std::sync::Arc;

use cogbench_core::{EncoderRegistry, ModelRegistry};

pub use mfa::MfaModel;
pub use nvc::NvcModel;
pub use syllogistic::{
    decode_response, encode_response, encode_task, SyllogisticResponseEncoder,
    SyllogisticTaskEncoder, RESPONSES, SYLLOGISMS,
};
pub use uniform::UniformModel;

/// Register the baseline model factories and syllogistic encoders.
pub fn register_builtins(models: &mut ModelRegistry, encoders: &mut EncoderRegistry) {
    models.register(Arc::new(uniform::UniformFactory));
    models.register(Arc::new(mfa::MfaFactory));
    models.register(Arc::new(nvc::NvcFactory));

    encoders.register_task("syllogistic", Arc::new(SyllogisticTaskEncoder));
    encoders.register_response("syllogistic", Arc::new(SyllogisticResponseEncoder));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_builtins() {
        let mut models = ModelRegistry::new();
        let mut encoders = EncoderRegistry::with_builtins();
        register_builtins(&mut models, &mut encoders);

        assert_eq!(models.kinds(), ["mfa", "nvc", "uniform"]);
        assert!(encoders.contains_task("syllogistic"));
        assert!(encoders.contains_response("syllogistic"));
    }
}
