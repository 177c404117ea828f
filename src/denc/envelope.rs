use byteorder::{LittleEndian, WriteBytesExt};
use nom::{bytes::complete::take, number::complete::*};
use std::io::{self, ErrorKind, Write};
use tracing::{debug, trace};

use crate::denc::error::*;
use crate::denc::features::Features;

//------------------------------------------

// struct_version: u8, compat_version: u8, body_length: u32
pub const HEADER_SIZE: usize = 6;

/// A record that is written inside a versioned envelope.
///
/// The envelope header carries the struct version the writer used and the
/// oldest version a reader must understand to make sense of the body.
/// Fields are only ever appended, so a reader walks its own fields in
/// version order and skips whatever trails them.
pub trait Versioned: Sized {
    const TYPE_NAME: &'static str;

    /// Highest struct version this decoder understands.
    const MAX_VERSION: u8;

    /// (struct_version, compat_version) to write given the peers' features.
    fn encoding_version(&self, features: Features) -> (u8, u8);

    fn encode_body<W: Write>(&self, w: &mut W, version: u8, features: Features)
        -> io::Result<()>;

    /// Decodes fields up to `struct_version` from the body. Returns any body
    /// bytes left unread.
    fn decode_body(body: &[u8], struct_version: u8) -> DecodeResult<'_, Self>;
}

//------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub struct_version: u8,
    pub compat_version: u8,
    pub body_len: u32,
}

pub fn pack_header<W: WriteBytesExt>(hdr: &Header, w: &mut W) -> io::Result<()> {
    w.write_u8(hdr.struct_version)?;
    w.write_u8(hdr.compat_version)?;
    w.write_u32::<LittleEndian>(hdr.body_len)
}

pub fn unpack_header<'a>(i: &'a [u8], type_name: &'static str) -> DecodeResult<'a, Header> {
    let parse = |i: &'a [u8]| -> nom::IResult<&'a [u8], Header> {
        let (i, struct_version) = le_u8(i)?;
        let (i, compat_version) = le_u8(i)?;
        let (i, body_len) = le_u32(i)?;
        Ok((
            i,
            Header {
                struct_version,
                compat_version,
                body_len,
            },
        ))
    };

    parse(i).map_err(|e| nom_to_dr(type_name, e))
}

//------------------------------------------

pub fn encode<T: Versioned, W: Write>(v: &T, w: &mut W, features: Features) -> io::Result<()> {
    let (struct_version, compat_version) = v.encoding_version(features);

    let mut body = Vec::new();
    v.encode_body(&mut body, struct_version, features)?;

    let body_len = u32::try_from(body.len()).map_err(|_| {
        io::Error::new(
            ErrorKind::InvalidInput,
            format!("{} body too large", T::TYPE_NAME),
        )
    })?;

    trace!(
        type_name = T::TYPE_NAME,
        struct_version,
        compat_version,
        body_len,
        "encoding"
    );

    pack_header(
        &Header {
            struct_version,
            compat_version,
            body_len,
        },
        w,
    )?;
    w.write_all(&body)
}

/// Decodes one envelope, returning the input that follows it.
pub fn decode<T: Versioned>(i: &[u8]) -> DecodeResult<'_, T> {
    decode_as::<T>(i, T::MAX_VERSION)
}

/// Decodes as a reader that only knows struct versions up to
/// `reader_version` would.
pub fn decode_as<T: Versioned>(i: &[u8], reader_version: u8) -> DecodeResult<'_, T> {
    let max_version = reader_version.min(T::MAX_VERSION);
    let (i, hdr) = unpack_header(i, T::TYPE_NAME)?;

    if hdr.struct_version == 0 || hdr.compat_version > hdr.struct_version {
        return Err(DecodeError::MalformedHeader {
            type_name: T::TYPE_NAME,
            struct_version: hdr.struct_version,
            compat_version: hdr.compat_version,
        });
    }

    if hdr.compat_version > max_version {
        return Err(DecodeError::VersionTooNew {
            type_name: T::TYPE_NAME,
            struct_version: hdr.struct_version,
            compat_version: hdr.compat_version,
            max_version,
        });
    }

    let (rest, body) = take::<_, _, nom::error::Error<&[u8]>>(hdr.body_len as usize)(i)
        .map_err(|_| DecodeError::TruncatedInput {
            what: T::TYPE_NAME,
        })?;

    let struct_version = hdr.struct_version.min(max_version);
    let (unread, v) = T::decode_body(body, struct_version)?;

    if !unread.is_empty() {
        debug!(
            type_name = T::TYPE_NAME,
            struct_version = hdr.struct_version,
            skipped = unread.len(),
            "skipping trailing fields written by a newer encoder"
        );
    }

    Ok((rest, v))
}

//------------------------------------------


//------------------------------------------
