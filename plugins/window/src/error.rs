use perch_presence::SurfaceError;
use serde::{Serialize, Serializer};

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Tauri error: {0}")]
    Tauri(#[from] tauri::Error),

    #[error("No window found")]
    WindowNotFound,

    #[error("No monitor found for window")]
    MonitorNotFound,

    #[error("Window control failed: {0}")]
    Surface(#[from] SurfaceError),
}

impl Serialize for WindowError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WindowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_display_string() {
        let json = serde_json::to_value(WindowError::WindowNotFound).unwrap();
        assert_eq!(json, serde_json::json!("No window found"));
    }

    #[test]
    fn test_surface_error_converts() {
        let err: WindowError = SurfaceError::Unavailable("main".into()).into();
        assert!(matches!(err, WindowError::Surface(_)));
        assert!(err.to_string().starts_with("Window control failed"));
    }
}
