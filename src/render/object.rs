//! PDF object types used by the writer.

use std::collections::HashMap;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// String (byte array)
    String(Vec<u8>),
    /// Name (starting with /)
    Name(String),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (key-value pairs)
    Dictionary(HashMap<String, Object>),
    /// Stream (dictionary + data)
    Stream {
        /// Stream dictionary
        dict: HashMap<String, Object>,
        /// Stream data
        data: bytes::Bytes,
    },
    /// Indirect object reference
    Reference(ObjectRef),
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to dictionary. Works for both Dictionary and Stream objects.
    pub fn as_dict(&self) -> Option<&HashMap<String, Object>> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }

    /// Build a stream object, adding the `FlateDecode` filter when the data
    /// was compressed.
    pub fn stream(mut dict: HashMap<String, Object>, data: Vec<u8>, compressed: bool) -> Object {
        if compressed {
            dict.insert("Filter".to_string(), Object::Name("FlateDecode".to_string()));
        }
        dict.insert("Length".to_string(), Object::Integer(data.len() as i64));
        Object::Stream {
            dict,
            data: bytes::Bytes::from(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_display() {
        assert_eq!(ObjectRef::new(12, 0).to_string(), "12 0 R");
    }

    #[test]
    fn test_stream_sets_length_and_filter() {
        let obj = Object::stream(HashMap::new(), vec![1, 2, 3], true);
        let dict = obj.as_dict().unwrap();
        assert_eq!(dict.get("Length"), Some(&Object::Integer(3)));
        assert_eq!(dict.get("Filter").and_then(Object::as_name), Some("FlateDecode"));

        let plain = Object::stream(HashMap::new(), vec![1], false);
        assert!(!plain.as_dict().unwrap().contains_key("Filter"));
    }
}
