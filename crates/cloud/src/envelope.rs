//! The `{ code, message, data }` response envelope.

use serde::Deserialize;

use crate::error::{CloudError, CloudResult};

/// Envelope every cloud function answers with. `code == 200` is success;
/// any other code carries a failure `message` shown verbatim.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default = "none")]
    pub data: Option<T>,
}

fn none<T>() -> Option<T> {
    None
}

impl<T> Envelope<T> {
    /// Unwrap the payload, turning a non-200 code into [`CloudError::Api`].
    pub fn into_data(self) -> CloudResult<T> {
        if self.code != 200 {
            return Err(CloudError::Api {
                message: failure_message(self.code, self.message),
            });
        }
        self.data
            .ok_or_else(|| CloudError::Decode("missing data field in success envelope".to_string()))
    }

    /// For operations whose success carries no payload.
    pub fn into_ok(self) -> CloudResult<()> {
        if self.code != 200 {
            return Err(CloudError::Api {
                message: failure_message(self.code, self.message),
            });
        }
        Ok(())
    }
}

fn failure_message(code: i64, message: String) -> String {
    if message.is_empty() {
        format!("cloud function returned code {code}")
    } else {
        message
    }
}
