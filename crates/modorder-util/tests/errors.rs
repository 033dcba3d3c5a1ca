use modorder_util::errors::ModorderError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = ModorderError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_profile_error_display() {
    let err = ModorderError::Profile {
        message: "bad syntax".to_string(),
    };
    assert_eq!(err.to_string(), "Profile error: bad syntax");
}

#[test]
fn test_registry_error_display() {
    let err = ModorderError::Registry {
        message: "duplicate name".to_string(),
    };
    assert_eq!(err.to_string(), "Registry error: duplicate name");
}

#[test]
fn test_resolution_error_display() {
    let err = ModorderError::Resolution {
        message: "cycle".to_string(),
    };
    assert_eq!(err.to_string(), "Load order resolution failed: cycle");
}

#[test]
fn test_scan_error_display() {
    let err = ModorderError::Scan {
        message: "unreadable".to_string(),
    };
    assert_eq!(err.to_string(), "Scan error: unreadable");
}

#[test]
fn test_generic_error_display() {
    let err = ModorderError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: ModorderError = io_err.into();
    assert!(matches!(err, ModorderError::Io(_)));
}
