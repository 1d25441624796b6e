//! JSON encoder: compact, non-ASCII kept literally

use super::EncodeError;
use crate::document::Document;

pub(super) fn encode(document: &Document) -> Result<String, EncodeError> {
    serde_json::to_string(document).map_err(|e| EncodeError(e.to_string()))
}
