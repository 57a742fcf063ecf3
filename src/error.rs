/// Error taxonomy for Boxy
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoxyError {
    #[error("Enter a name")]
    EmptyName,
    #[error("Invalid folder name")]
    EmptyFolderName,
    #[error("Folder \"{0}\" already exists")]
    DuplicateFolder(String),
    #[error("The default folder cannot be deleted")]
    ProtectedFolder,
    #[error("item not found: {0}")]
    ItemNotFound(String),
    #[error("folder not found: {0}")]
    FolderNotFound(String),
    #[error("Storage could not be loaded, changes are not saved")]
    StorageUnavailable,
    #[error("platform call failed: {0}")]
    Platform(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl BoxyError {
    /// True for errors caused by user input, which are shown inline and leave state untouched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BoxyError::EmptyName
                | BoxyError::EmptyFolderName
                | BoxyError::DuplicateFolder(_)
                | BoxyError::ProtectedFolder
        )
    }
}

impl From<JsValue> for BoxyError {
    fn from(value: JsValue) -> Self {
        BoxyError::Platform(format!("{:?}", value))
    }
}

impl From<serde_wasm_bindgen::Error> for BoxyError {
    fn from(value: serde_wasm_bindgen::Error) -> Self {
        BoxyError::Serialization(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BoxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors() {
        assert!(BoxyError::EmptyName.is_validation());
        assert!(BoxyError::DuplicateFolder("Work".to_string()).is_validation());
        assert!(BoxyError::ProtectedFolder.is_validation());
        assert!(!BoxyError::Platform("boom".to_string()).is_validation());
        assert!(!BoxyError::ItemNotFound("1".to_string()).is_validation());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            BoxyError::DuplicateFolder("Work".to_string()).to_string(),
            "Folder \"Work\" already exists"
        );
        assert_eq!(BoxyError::EmptyName.to_string(), "Enter a name");
    }
}
