use cmpmenu::error;
use cmpmenu::layout::display::FixedDisplay;
use cmpmenu::layout::{LayoutScaler, ScaleFactor};
use cmpmenu::CmpMenuError;

#[test]
fn test_fatal_errors() {
    assert!(error::is_fatal(&CmpMenuError::UnknownScreenIdentifier("x".into())));
    assert!(error::is_fatal(&CmpMenuError::TuiError("x".into())));
    assert!(!error::is_fatal(&CmpMenuError::DisplayQueryFailure("x".into())));
    assert!(!error::is_fatal(&CmpMenuError::ActionFailure("x".into())));
    assert!(!error::is_fatal(&CmpMenuError::AssetError("x".into())));
}

#[test]
fn test_user_friendly_message_and_fallback() {
    let msg = error::user_friendly_message(&CmpMenuError::ActionFailure("диск заполнен".into()));
    assert!(msg.contains("диск заполнен"));

    let fallback =
        error::create_fallback_strategy(&CmpMenuError::DisplayQueryFailure("x".into())).unwrap();
    assert!(fallback.contains("1.0"));
    assert!(error::create_fallback_strategy(&CmpMenuError::TuiError("x".into())).is_none());
}

#[test]
fn test_display_failure_never_aborts() {
    let scaler = LayoutScaler::from_display(&FixedDisplay::unavailable());
    assert_eq!(scaler.factor(), ScaleFactor::IDENTITY);
    assert_eq!(scaler.scale(10.0), 10);
}

#[test]
fn test_io_error_converts() {
    let err: CmpMenuError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(err, CmpMenuError::IoError(_)));
    assert!(std::error::Error::source(&err).is_some());
}
