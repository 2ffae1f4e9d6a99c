//! Status Tests
//!
//! The status table and classification of status segments.

use cachelink::protocol::{StatusCode, StatusSegment, STATUS_TABLE};
use cachelink::{CacheError, PersistFailure};

// =============================================================================
// Status Table
// =============================================================================

#[test]
fn test_table_index_matches_wire_byte() {
    for (index, slot) in STATUS_TABLE.iter().enumerate() {
        if let Some(code) = slot {
            assert_eq!(*code as usize, index);
        }
        assert_eq!(StatusCode::from_byte(index as u8), *slot);
    }
}

#[test]
fn test_out_of_range_byte_not_in_table() {
    assert_eq!(StatusCode::from_byte(7), None);
    assert_eq!(StatusCode::from_byte(0xff), None);
}

#[test]
fn test_success_byte_has_no_code() {
    assert_eq!(STATUS_TABLE[0], None);
    assert_eq!(StatusCode::from_byte(0), None);
    assert!(STATUS_TABLE[1..].iter().all(Option::is_some));
}

#[test]
fn test_codes_map_to_semantic_errors() {
    assert!(matches!(StatusCode::Syntax.to_error(), CacheError::Syntax));
    assert!(matches!(StatusCode::NotFound.to_error(), CacheError::NotFound));
    assert!(matches!(
        StatusCode::AlreadyExists.to_error(),
        CacheError::AlreadyExists
    ));
    assert!(matches!(
        StatusCode::NonExpiringSaveFailed.to_error(),
        CacheError::NonExpiringSaveFailed
    ));
    assert!(matches!(
        StatusCode::ExpiringSaveFailed.to_error(),
        CacheError::ExpiringSaveFailed
    ));
    assert!(matches!(
        StatusCode::RestoreFailed.to_error(),
        CacheError::RestoreFailed
    ));
}

// =============================================================================
// Segment Classification
// =============================================================================

#[test]
fn test_classify_zero_byte() {
    let segment = StatusSegment::classify(&[0]);
    assert_eq!(segment, StatusSegment::Ok);
    assert!(segment.is_ok());
    assert!(segment.into_result().is_ok());
}

#[test]
fn test_classify_coded_error() {
    let segment = StatusSegment::classify(&[3]);
    assert_eq!(segment, StatusSegment::Code(StatusCode::AlreadyExists));
    assert!(!segment.is_ok());
    assert!(matches!(segment.into_result(), Err(CacheError::AlreadyExists)));
}

#[test]
fn test_classify_unknown_byte_is_diagnostic() {
    let segment = StatusSegment::classify(&[42]);
    assert_eq!(segment, StatusSegment::Diagnostic(vec![42]));
    assert!(matches!(segment.into_result(), Err(CacheError::Server(_))));
}

#[test]
fn test_every_single_nonzero_byte_is_a_failure() {
    for byte in 1..=u8::MAX {
        let segment = StatusSegment::classify(&[byte]);
        assert!(!segment.is_ok(), "byte {} classified as success", byte);
        assert!(segment.into_result().is_err());
    }
}

#[test]
fn test_classify_multi_byte_is_diagnostic_text() {
    let segment = StatusSegment::classify(b"key too long");
    match segment.into_result() {
        Err(CacheError::Server(text)) => assert_eq!(text, "key too long"),
        other => panic!("Expected server diagnostic, got {:?}", other),
    }
}

#[test]
fn test_multi_byte_starting_with_code_is_not_table_lookup() {
    // Two bytes, even if the first looks like a code
    let segment = StatusSegment::classify(&[2, 0]);
    assert!(matches!(segment.into_result(), Err(CacheError::Server(_))));
}

// =============================================================================
// Error Classification
// =============================================================================

#[test]
fn test_expected_outcomes_are_recoverable() {
    assert!(CacheError::NotFound.is_not_found());
    assert!(CacheError::AlreadyExists.is_already_exists());
    assert!(CacheError::NotFound.is_recoverable());
    assert!(CacheError::AlreadyExists.is_recoverable());
    assert!(CacheError::Server("busy".to_string()).is_recoverable());
}

#[test]
fn test_transport_and_decode_errors_are_not_recoverable() {
    let io = CacheError::Io(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"));
    assert!(!io.is_recoverable());
    assert!(!CacheError::Decode("bad".to_string()).is_recoverable());
    assert!(!CacheError::AuthRejected.is_recoverable());
    assert!(!CacheError::NotFound.is_already_exists());
}

#[test]
fn test_persist_failure_from_phases() {
    assert!(PersistFailure::from_phases(Ok(()), Ok(())).is_none());

    let failure =
        PersistFailure::from_phases(Err(CacheError::NonExpiringSaveFailed), Ok(())).unwrap();
    assert!(failure.non_expiring.is_some());
    assert!(failure.expiring.is_none());
    assert!(failure.to_string().starts_with("non-expiring cache save failed"));

    let failure =
        PersistFailure::from_phases(Ok(()), Err(CacheError::ExpiringSaveFailed)).unwrap();
    assert!(failure.non_expiring.is_none());
    assert!(failure.to_string().starts_with("expiring cache save failed"));
}

#[test]
fn test_persist_failure_reports_both_phases() {
    let failure = PersistFailure::from_phases(
        Err(CacheError::NonExpiringSaveFailed),
        Err(CacheError::Server("disk full".to_string())),
    )
    .unwrap();

    let text = failure.to_string();
    assert!(text.contains("non-expiring cache save failed"));
    assert!(text.contains("; expiring cache save failed (server error: disk full)"));
}
