//! JSON rendering.

use crate::error::OutputError;
use crate::release::Description;

pub fn render_json(description: &Description) -> Result<String, OutputError> {
    serde_json::to_string_pretty(description).map_err(OutputError::Serialize)
}
