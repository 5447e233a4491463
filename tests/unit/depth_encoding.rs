//! `Depth` header encoding (§6): `0`, `1`, or the literal string `infinity`.

use dav_sync::transport::Depth;

#[test]
fn zero_encodes_as_the_digit_zero() {
    assert_eq!(Depth::Zero.header_value(), "0");
}

#[test]
fn one_encodes_as_the_digit_one() {
    assert_eq!(Depth::One.header_value(), "1");
}

#[test]
fn infinity_encodes_as_the_literal_word() {
    assert_eq!(Depth::Infinity.header_value(), "infinity");
}

#[test]
fn with_depth_sets_the_depth_header_on_the_request() {
    use dav_sync::transport::{HttpRequest, Method};

    let uri: hyper::Uri = "https://dav.example.com/cal/".parse().unwrap();
    let request = HttpRequest::new(Method::Propfind, uri).with_depth(Depth::Infinity);
    assert_eq!(request.header("Depth"), Some("infinity"));
}
