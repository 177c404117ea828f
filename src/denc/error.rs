use nom::error::ErrorKind;
use thiserror::Error;

//------------------------------------------

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error(
        "{type_name}: struct version {struct_version} (compat {compat_version}) is too new, \
         decoder understands up to version {max_version}"
    )]
    VersionTooNew {
        type_name: &'static str,
        struct_version: u8,
        compat_version: u8,
        max_version: u8,
    },

    #[error("{type_name}: malformed header, struct version {struct_version}, compat {compat_version}")]
    MalformedHeader {
        type_name: &'static str,
        struct_version: u8,
        compat_version: u8,
    },

    #[error("{what}: input truncated")]
    TruncatedInput { what: &'static str },

    #[error("{what}: string is not valid utf8")]
    InvalidUtf8 { what: &'static str },
}

pub type DecodeResult<'a, T> = Result<(&'a [u8], T), DecodeError>;

pub(crate) fn nom_to_dr(what: &'static str, e: nom::Err<nom::error::Error<&[u8]>>) -> DecodeError {
    match e {
        nom::Err::Error(e) | nom::Err::Failure(e) if e.code == ErrorKind::MapRes => {
            DecodeError::InvalidUtf8 { what }
        }
        _ => DecodeError::TruncatedInput { what },
    }
}

//------------------------------------------
