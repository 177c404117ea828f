use thiserror::Error;

pub mod text;
pub mod xml;

//------------------------------------------

/// Receives the named fields of a record as it is walked.
pub trait Formatter {
    fn dump_int(&mut self, name: &str, v: i64);
    fn dump_unsigned(&mut self, name: &str, v: u64);
    fn dump_string(&mut self, name: &str, v: &str);
    fn open_object_section(&mut self, name: &str);
    fn close_section(&mut self);
}

/// Walking a record that is in a state it can never legitimately reach.
/// This indicates corruption or a logic error, not a bad input buffer.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum DumpError {
    #[error("invalid value {value} for enum field '{field}'")]
    InvalidEnumValue { field: &'static str, value: u64 },
}

//------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Unsigned(u64),
    Str(String),
    Object(Vec<Entry>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub value: Value,
}

/// An ordered tree of named entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    pub name: String,
    pub entries: Vec<Entry>,
}

fn lookup<'a>(entries: &'a [Entry], name: &str) -> Option<&'a Value> {
    entries.iter().find(|e| e.name == name).map(|e| &e.value)
}

impl Tree {
    pub fn get(&self, name: &str) -> Option<&Value> {
        lookup(&self.entries, name)
    }

    /// Looks up a '/' separated path through nested objects.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut entries = &self.entries[..];
        let mut components = path.split('/').peekable();
        while let Some(c) = components.next() {
            let v = lookup(entries, c)?;
            if components.peek().is_none() {
                return Some(v);
            }
            match v {
                Value::Object(children) => entries = children,
                _ => return None,
            }
        }
        None
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

//------------------------------------------

/// A Formatter that builds a Tree.
pub struct TreeFormatter {
    name: String,
    stack: Vec<(String, Vec<Entry>)>,
    current: Vec<Entry>,
}

impl TreeFormatter {
    pub fn new(name: &str) -> TreeFormatter {
        TreeFormatter {
            name: name.to_string(),
            stack: Vec::new(),
            current: Vec::new(),
        }
    }

    fn push(&mut self, name: &str, value: Value) {
        self.current.push(Entry {
            name: name.to_string(),
            value,
        });
    }

    /// Closes any sections left open and returns the tree.
    pub fn finish(mut self) -> Tree {
        while !self.stack.is_empty() {
            self.close_section();
        }

        Tree {
            name: self.name,
            entries: self.current,
        }
    }
}

impl Formatter for TreeFormatter {
    fn dump_int(&mut self, name: &str, v: i64) {
        self.push(name, Value::Int(v));
    }

    fn dump_unsigned(&mut self, name: &str, v: u64) {
        self.push(name, Value::Unsigned(v));
    }

    fn dump_string(&mut self, name: &str, v: &str) {
        self.push(name, Value::Str(v.to_string()));
    }

    fn open_object_section(&mut self, name: &str) {
        let parent = std::mem::take(&mut self.current);
        self.stack.push((name.to_string(), parent));
    }

    fn close_section(&mut self) {
        if let Some((name, parent)) = self.stack.pop() {
            let children = std::mem::replace(&mut self.current, parent);
            self.push(&name, Value::Object(children));
        }
    }
}

//------------------------------------------


//------------------------------------------
