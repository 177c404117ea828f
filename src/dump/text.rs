use std::io::{self, Write};

use crate::dump::*;

//------------------------------------------

fn write_entries<W: Write>(w: &mut W, entries: &[Entry], depth: usize) -> io::Result<()> {
    let indent = depth * 2;
    for e in entries {
        match &e.value {
            Value::Int(n) => writeln!(w, "{:indent$}{}: {}", "", e.name, n)?,
            Value::Unsigned(n) => writeln!(w, "{:indent$}{}: {}", "", e.name, n)?,
            Value::Str(s) => writeln!(w, "{:indent$}{}: \"{}\"", "", e.name, s.escape_debug())?,
            Value::Object(children) => {
                writeln!(w, "{:indent$}{}:", "", e.name)?;
                write_entries(w, children, depth + 1)?;
            }
        }
    }
    Ok(())
}

pub fn write_text<W: Write>(mut w: W, tree: &Tree) -> io::Result<()> {
    writeln!(w, "{}:", tree.name)?;
    write_entries(&mut w, &tree.entries, 1)?;
    w.flush()
}

//------------------------------------------


//------------------------------------------
