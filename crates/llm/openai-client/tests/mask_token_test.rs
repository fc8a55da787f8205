//! Unit tests for [`openai_client::mask_token`] and [`openai_client::ProxySettings`].
//!
//! API keys are masked for safe logging: first 7 chars + `***` + last 4 chars.
//! Keys of length ≤ 11 are fully masked as `***` to avoid leaking any segment.

use openai_client::{mask_token, ProxySettings};

/// **Test: Short or empty tokens are fully masked.**
#[test]
fn mask_token_short_returns_all_star() {
    assert_eq!(mask_token(""), "***");
    assert_eq!(mask_token("a"), "***");
    assert_eq!(mask_token("abc:def"), "***");
    assert_eq!(mask_token("0123456789a"), "***");
}

/// **Test: Long tokens show first 7 and last 4 characters.**
#[test]
fn mask_token_long_shows_head_and_tail() {
    assert_eq!(mask_token("0123456789ab"), "0123456***89ab");
    assert_eq!(
        mask_token("a1b2c3d4e5f6:secretsecretsecret"),
        "a1b2c3d***cret"
    );
}

/// **Test: Multi-byte characters are counted as characters, never split.**
#[test]
fn mask_token_multibyte_is_char_safe() {
    let masked = mask_token("密钥密钥密钥密钥密钥密钥");
    assert_eq!(masked, "密钥密钥密钥密***密钥密钥");
}

/// **Test: Proxy values without a scheme get `http://`; full URLs are kept.**
#[test]
fn proxy_normalize_adds_scheme_when_missing() {
    assert_eq!(ProxySettings::normalize("127.0.0.1:7890"), "http://127.0.0.1:7890");
    assert_eq!(
        ProxySettings::normalize(" socks5://127.0.0.1:1080 "),
        "socks5://127.0.0.1:1080"
    );
    assert!(ProxySettings::default().is_empty());
}
