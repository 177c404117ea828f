use anyhow::Result;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Write;

use crate::dump::*;

//------------------------------------------

fn scalar_val(v: &Value) -> Option<String> {
    match v {
        Value::Int(n) => Some(n.to_string()),
        Value::Unsigned(n) => Some(n.to_string()),
        Value::Str(s) => Some(s.clone()),
        Value::Object(_) => None,
    }
}

// Scalars become attributes, objects become child elements.
fn write_elem<W: Write>(w: &mut Writer<W>, name: &str, entries: &[Entry]) -> Result<()> {
    let mut elem = BytesStart::new(name);
    for e in entries {
        if let Some(v) = scalar_val(&e.value) {
            elem.push_attribute((e.name.as_str(), v.as_str()));
        }
    }

    let children: Vec<(&str, &[Entry])> = entries
        .iter()
        .filter_map(|e| match &e.value {
            Value::Object(nested) => Some((e.name.as_str(), &nested[..])),
            _ => None,
        })
        .collect();

    if children.is_empty() {
        w.write_event(Event::Empty(elem))?;
    } else {
        w.write_event(Event::Start(elem))?;
        for (child, nested) in children {
            write_elem(w, child, nested)?;
        }
        w.write_event(Event::End(BytesEnd::new(name)))?;
    }

    Ok(())
}

pub fn write_xml<W: Write>(out: W, tree: &Tree) -> Result<()> {
    let mut w = Writer::new_with_indent(out, b' ', 2);
    write_elem(&mut w, &tree.name, &tree.entries)?;

    let out = w.get_mut();
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

//------------------------------------------


//------------------------------------------
