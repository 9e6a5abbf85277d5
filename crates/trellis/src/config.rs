//! Engine settings, loadable from any serde format.

use serde::{Deserialize, Serialize};

use crate::{
    codec::{CodecOptions, Decoder},
    designer::Designer,
    registry::Registry,
    resize::ResizeLimits,
    tree::Form,
};

/// Tunable engine behaviour. Missing keys take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Resize floors and fallbacks.
    pub resize: ResizeLimits,
    /// Document decoding.
    pub codec: CodecOptions,
}

impl EngineConfig {
    /// A decoder over `registry` with these settings.
    pub fn decoder<'r>(&self, registry: &'r Registry) -> Decoder<'r> {
        Decoder::new(registry).with_options(self.codec)
    }

    /// A designer over `form` with these settings.
    pub fn designer(&self, form: Form) -> Designer {
        Designer::new(form).with_limits(self.resize)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::codec::Strictness;

    #[test]
    fn partial_config() {
        let c: EngineConfig = serde_json::from_value(json!({
            "resize": {"min_width": 80},
            "codec": {"strictness": "strict"},
        }))
        .unwrap();
        assert_eq!(c.resize.min_width, 80);
        assert_eq!(c.resize.min_height, 30);
        assert_eq!(c.codec.strictness, Strictness::Strict);
        assert_eq!(c.codec.legacy_column_percent, 8.33);
    }
}
