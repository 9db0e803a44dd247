use crate::base::neterror::{net_error_to_result, NetError, OK};

#[test]
fn test_net_error_roundtrip() {
    // Generic Chromium error
    let original = NetError::Aborted;
    let code = original.as_i32();
    assert_eq!(code, -3);
    let converted = NetError::from(code);
    assert!(matches!(converted, NetError::Aborted));

    // Proxy resolution error
    let pac = NetError::PacScriptFailed;
    assert_eq!(pac.as_i32(), -327);
    assert!(matches!(NetError::from(-327), NetError::PacScriptFailed));
}

#[test]
fn test_unknown_error() {
    let err = NetError::from(-9999);
    assert!(matches!(err, NetError::Unknown(-9999)));
    assert_eq!(err.as_i32(), -9999);
}

#[test]
fn test_ok_is_success() {
    assert_eq!(net_error_to_result(OK), Ok(()));
    assert_eq!(net_error_to_result(-2), Err(NetError::Failed));
}

#[test]
fn test_ok_is_not_an_error_variant() {
    // 0 must never decode to a named failure
    assert!(matches!(NetError::from(OK), NetError::Unknown(0)));
}
