//! `application/x-www-form-urlencoded` body rendering.
//!
//! Pairs are joined as `key=value` with `&`, in input order. The default
//! [`FormEncoding::Raw`] mode copies keys and values verbatim, which is the
//! long-standing wire format existing servers were written against.
//! [`FormEncoding::Percent`] escapes them properly and must be opted into.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::ApiError;

/// Characters escaped in form keys and values. Space is handled separately.
const FORM_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// How keys and values are written into a form body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormEncoding {
    /// Keys and values are concatenated unescaped.
    #[default]
    Raw,
    /// Keys and values are percent-encoded, space becomes `+`.
    Percent,
}

impl FormEncoding {
    fn write(&self, out: &mut String, text: &str) {
        match self {
            FormEncoding::Raw => out.push_str(text),
            FormEncoding::Percent => {
                for chunk in utf8_percent_encode(text, FORM_ESCAPE) {
                    if chunk == "%20" {
                        out.push('+');
                    } else {
                        out.push_str(chunk);
                    }
                }
            }
        }
    }
}

/// Encode a form body, rejecting a missing pair collection.
///
/// An empty collection is valid and yields `""`.
pub fn encode<I, K, V>(pairs: Option<I>, encoding: FormEncoding) -> Result<String, ApiError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let pairs = pairs.ok_or_else(|| {
        ApiError::InvalidArgument("form pair collection must not be missing".to_string())
    })?;
    Ok(encode_pairs(pairs, encoding))
}

/// Encode a form body from pairs that are known to be present.
pub fn encode_pairs<I, K, V>(pairs: I, encoding: FormEncoding) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = String::new();
    for (index, (key, value)) in pairs.into_iter().enumerate() {
        if index > 0 {
            out.push('&');
        }
        encoding.write(&mut out, key.as_ref());
        out.push('=');
        encoding.write(&mut out, value.as_ref());
    }
    out
}
