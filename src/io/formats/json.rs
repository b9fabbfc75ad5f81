use crate::{io::FormatHandler, model::FeatureModel, types::err};

/// Feature models as (pretty) JSON.
///
/// ```rust
/// # use fm_core::io::{FormatHandler, formats::JsonFormat};
/// let model = JsonFormat
///     .read(r#"{ "name": "Car", "features": [ { "name": "Car" }, { "name": "Radio", "parent": "Car" } ] }"#)
///     .unwrap();
/// assert_eq!(model.children("Car").count(), 1);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFormat;

impl FormatHandler<FeatureModel> for JsonFormat {
    fn suffix(&self) -> &str {
        "json"
    }

    fn read(&self, content: &str) -> Result<FeatureModel, err::FormatError> {
        Ok(serde_json::from_str(content)?)
    }

    fn write(&self, model: &FeatureModel) -> Result<String, err::FormatError> {
        Ok(serde_json::to_string_pretty(model)?)
    }
}
