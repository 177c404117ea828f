use byteorder::WriteBytesExt;
use nom::{number::complete::*, IResult};
use std::fmt;
use std::io;

use crate::denc::unpack::*;

//------------------------------------------

/// Wall clock time as seconds and nanoseconds since the epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UTime {
    pub sec: u32,
    pub nsec: u32,
}

impl UTime {
    pub fn new(sec: u32, nsec: u32) -> UTime {
        UTime { sec, nsec }
    }

    pub fn is_zero(&self) -> bool {
        self.sec == 0 && self.nsec == 0
    }
}

impl fmt::Display for UTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.sec, self.nsec)
    }
}

impl Unpack for UTime {
    fn unpack(i: &[u8]) -> IResult<&[u8], UTime> {
        let (i, sec) = le_u32(i)?;
        let (i, nsec) = le_u32(i)?;
        Ok((i, UTime { sec, nsec }))
    }
}

impl Pack for UTime {
    fn pack<W: WriteBytesExt>(&self, w: &mut W) -> io::Result<()> {
        self.sec.pack(w)?;
        self.nsec.pack(w)
    }
}

//------------------------------------------
