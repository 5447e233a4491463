//! `DavError::from_http` (§7): every transport failure maps onto the closest domain kind.

use dav_sync::{DavError, ErrorKind, HttpError};

#[test]
fn timeout_maps_to_timeout_kind() {
    let err = DavError::from_http(HttpError::Timeout);
    assert_eq!(err.kind, ErrorKind::Timeout);
    assert_eq!(err.response_code, 0);
}

#[test]
fn tls_error_maps_to_tls_error_kind_and_keeps_the_detail() {
    let err = DavError::from_http(HttpError::Tls("certificate expired".to_string()));
    assert_eq!(err.kind, ErrorKind::TlsError);
    assert_eq!(err.detail, "certificate expired");
}

#[test]
fn auth_required_maps_to_auth_required_kind() {
    let err = DavError::from_http(HttpError::AuthRequired);
    assert_eq!(err.kind, ErrorKind::AuthRequired);
}

#[test]
fn too_many_redirects_maps_to_problem_with_request() {
    let err = DavError::from_http(HttpError::TooManyRedirects);
    assert_eq!(err.kind, ErrorKind::ProblemWithRequest);
}

#[test]
fn an_unmatched_transport_error_falls_back_to_problem_with_request() {
    let err = DavError::from_http(HttpError::Transport(anyhow::anyhow!("connection reset")));
    assert_eq!(err.kind, ErrorKind::ProblemWithRequest);
    assert!(err.detail.contains("connection reset"));
}

#[test]
fn error_kind_as_str_round_trips_the_xquery_variants() {
    // These two kinds have no constructor anywhere in this crate (no XQuery engine backs the
    // `quick-xml` walk), but the variant names themselves must still render correctly.
    assert_eq!(ErrorKind::CollectionFetchXQuerySetFocus.as_str(), "CollectionFetch_XQuerySetFocus");
    assert_eq!(ErrorKind::CollectionFetchXQueryInvalid.as_str(), "CollectionFetch_XQueryInvalid");
}
