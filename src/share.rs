//! URL-shareable state codec: JSON, then URL-safe base64 without padding, so
//! the payload can travel in a hash fragment untouched.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::{
    error::{MotionError, MotionResult},
    model::ShareableState,
};

pub fn encode_state(state: &ShareableState) -> MotionResult<String> {
    let json = serde_json::to_vec(state)
        .map_err(|e| MotionError::encode(format!("state serialization: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decodes a shared payload. Any failure collapses to `None`: callers treat
/// the absence of a valid payload as "use defaults", never as an error shown
/// to the user. A leading `#` from a hash fragment is tolerated.
pub fn decode_state(encoded: &str) -> Option<ShareableState> {
    let trimmed = encoded.trim().trim_start_matches('#');
    let bytes = match URL_SAFE_NO_PAD.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "discarding share payload: invalid base64");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::debug!(error = %e, "discarding share payload: invalid state document");
            None
        }
    }
}
