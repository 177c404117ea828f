use byteorder::{LittleEndian, WriteBytesExt};
use nom::{combinator::map_res, multi::length_data, number::complete::*, IResult};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, ErrorKind};

use crate::denc::error::*;

//------------------------------------------

pub trait Unpack {
    fn unpack(data: &[u8]) -> IResult<&[u8], Self>
    where
        Self: std::marker::Sized;
}

/// Unpacks a single field, naming it in any error.
pub fn field<'a, U: Unpack>(i: &'a [u8], what: &'static str) -> DecodeResult<'a, U> {
    U::unpack(i).map_err(|e| nom_to_dr(what, e))
}

//------------------------------------------

pub trait Pack {
    fn pack<W: WriteBytesExt>(&self, data: &mut W) -> io::Result<()>;
}

fn pack_len<W: WriteBytesExt>(len: usize, out: &mut W) -> io::Result<()> {
    let len = u32::try_from(len)
        .map_err(|_| io::Error::new(ErrorKind::InvalidInput, "length exceeds u32"))?;
    out.write_u32::<LittleEndian>(len)
}

//------------------------------------------

impl Unpack for u8 {
    fn unpack(i: &[u8]) -> IResult<&[u8], u8> {
        le_u8(i)
    }
}

impl Pack for u8 {
    fn pack<W: WriteBytesExt>(&self, out: &mut W) -> io::Result<()> {
        out.write_u8(*self)
    }
}

impl Unpack for bool {
    fn unpack(i: &[u8]) -> IResult<&[u8], bool> {
        let (i, b) = le_u8(i)?;
        Ok((i, b != 0))
    }
}

impl Pack for bool {
    fn pack<W: WriteBytesExt>(&self, out: &mut W) -> io::Result<()> {
        out.write_u8(*self as u8)
    }
}

impl Unpack for u32 {
    fn unpack(i: &[u8]) -> IResult<&[u8], u32> {
        le_u32(i)
    }
}

impl Pack for u32 {
    fn pack<W: WriteBytesExt>(&self, out: &mut W) -> io::Result<()> {
        out.write_u32::<LittleEndian>(*self)
    }
}

impl Unpack for u64 {
    fn unpack(i: &[u8]) -> IResult<&[u8], u64> {
        le_u64(i)
    }
}

impl Pack for u64 {
    fn pack<W: WriteBytesExt>(&self, out: &mut W) -> io::Result<()> {
        out.write_u64::<LittleEndian>(*self)
    }
}

impl Unpack for i64 {
    fn unpack(i: &[u8]) -> IResult<&[u8], i64> {
        le_i64(i)
    }
}

impl Pack for i64 {
    fn pack<W: WriteBytesExt>(&self, out: &mut W) -> io::Result<()> {
        out.write_i64::<LittleEndian>(*self)
    }
}

impl Unpack for String {
    fn unpack(i: &[u8]) -> IResult<&[u8], String> {
        let (i, s) = map_res(length_data(le_u32), std::str::from_utf8)(i)?;
        Ok((i, s.to_string()))
    }
}

impl Pack for String {
    fn pack<W: WriteBytesExt>(&self, out: &mut W) -> io::Result<()> {
        pack_len(self.len(), out)?;
        out.write_all(self.as_bytes())
    }
}

// A presence byte, followed by the value if present.
impl<T: Unpack> Unpack for Option<T> {
    fn unpack(i: &[u8]) -> IResult<&[u8], Option<T>> {
        let (i, present) = le_u8(i)?;
        if present != 0 {
            let (i, v) = T::unpack(i)?;
            Ok((i, Some(v)))
        } else {
            Ok((i, None))
        }
    }
}

impl<T: Pack> Pack for Option<T> {
    fn pack<W: WriteBytesExt>(&self, out: &mut W) -> io::Result<()> {
        match self {
            Some(v) => {
                out.write_u8(1)?;
                v.pack(out)
            }
            None => out.write_u8(0),
        }
    }
}

// Containers are a u32 count followed by the elements. The count comes
// off the wire, so never preallocate from it.
impl<T: Unpack + Ord> Unpack for BTreeSet<T> {
    fn unpack(i: &[u8]) -> IResult<&[u8], BTreeSet<T>> {
        let (mut i, n) = le_u32(i)?;
        let mut set = BTreeSet::new();
        for _ in 0..n {
            let (rest, v) = T::unpack(i)?;
            set.insert(v);
            i = rest;
        }
        Ok((i, set))
    }
}

impl<T: Pack> Pack for BTreeSet<T> {
    fn pack<W: WriteBytesExt>(&self, out: &mut W) -> io::Result<()> {
        pack_len(self.len(), out)?;
        for v in self {
            v.pack(out)?;
        }
        Ok(())
    }
}

impl<K: Unpack + Ord, V: Unpack> Unpack for BTreeMap<K, V> {
    fn unpack(i: &[u8]) -> IResult<&[u8], BTreeMap<K, V>> {
        let (mut i, n) = le_u32(i)?;
        let mut map = BTreeMap::new();
        for _ in 0..n {
            let (rest, k) = K::unpack(i)?;
            let (rest, v) = V::unpack(rest)?;
            map.insert(k, v);
            i = rest;
        }
        Ok((i, map))
    }
}

impl<K: Pack, V: Pack> Pack for BTreeMap<K, V> {
    fn pack<W: WriteBytesExt>(&self, out: &mut W) -> io::Result<()> {
        pack_len(self.len(), out)?;
        for (k, v) in self {
            k.pack(out)?;
            v.pack(out)?;
        }
        Ok(())
    }
}

//------------------------------------------


//------------------------------------------
