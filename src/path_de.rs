use serde::de::DeserializeOwned;

use crate::error::AnalyzeError;

/// Deserialize a typed document, naming the JSON path of the failing field.
pub fn from_str_with_path<T: DeserializeOwned>(origin: &str, src: &str) -> Result<T, AnalyzeError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(AnalyzeError::malformed(origin, format!("at JSON path {path} → {}", err.into_inner())))
        }
    }
}
