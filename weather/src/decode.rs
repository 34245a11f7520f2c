// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
//! Turns raw bodies into a format-agnostic [`DecodedRecord`].
//!
//! XML documents become `{ "<root>": <element> }`. An element with neither
//! attributes nor child elements becomes its text. Any other element becomes
//! a map where attributes are plain keys, every child name maps to an array
//! of child values, and non-blank text is kept under `"_"`.

use crate::{classify, transport::ContentFormat};
use error::ClassifiedError;
use quick_xml::{
  events::{BytesStart, Event},
  Reader,
};
use serde_json::{Map, Value};
use std::fmt;

/// Nested value produced by the decoder. Nothing about its shape is trusted.
pub type DecodedRecord = Value;

pub const TEXT_KEY: &str = "_";

pub fn decode(body: &str, format: ContentFormat) -> Result<DecodedRecord, ClassifiedError> {
  match format {
    ContentFormat::Json => {
      serde_json::from_str(body).map_err(|e| classify::malformed_payload(format, e))
    }
    ContentFormat::Xml => xml_to_value(body).map_err(|e| classify::malformed_payload(format, e)),
  }
}

#[derive(Debug)]
pub enum XmlError {
  Syntax(quick_xml::Error),
  NoRootElement,
  MultipleRootElements,
  TextOutsideRoot,
  UnclosedElement(String),
}

impl fmt::Display for XmlError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      XmlError::Syntax(e) => write!(f, "{}", e),
      XmlError::NoRootElement => write!(f, "document has no root element"),
      XmlError::MultipleRootElements => write!(f, "document has more than one root element"),
      XmlError::TextOutsideRoot => write!(f, "text found outside the root element"),
      XmlError::UnclosedElement(name) => write!(f, "element <{}> is never closed", name),
    }
  }
}

impl std::error::Error for XmlError {}

impl From<quick_xml::Error> for XmlError {
  fn from(e: quick_xml::Error) -> Self {
    XmlError::Syntax(e)
  }
}

struct Element {
  name: String,
  attributes: Map<String, Value>,
  children: Map<String, Value>,
  text: String,
}

impl Element {
  fn open(start: &BytesStart<'_>) -> Result<Self, XmlError> {
    let mut attributes = Map::new();
    for attr in start.attributes() {
      let attr = attr.map_err(quick_xml::Error::from)?;
      let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
      let value = attr.unescape_value()?.into_owned();
      attributes.insert(key, Value::String(value));
    }

    Ok(Self {
      name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
      attributes,
      children: Map::new(),
      text: String::new(),
    })
  }

  fn push_child(&mut self, name: String, value: Value) {
    if let Value::Array(items) = self
      .children
      .entry(name)
      .or_insert_with(|| Value::Array(Vec::new()))
    {
      items.push(value);
    }
  }

  fn into_value(self) -> Value {
    if self.attributes.is_empty() && self.children.is_empty() {
      return Value::String(self.text);
    }

    let mut map = self.attributes;
    map.extend(self.children);
    if !self.text.trim().is_empty() {
      map.insert(TEXT_KEY.to_string(), Value::String(self.text));
    }
    Value::Object(map)
  }
}

#[derive(Default)]
struct TreeBuilder {
  open: Vec<Element>,
  root: Option<(String, Value)>,
}

impl TreeBuilder {
  fn start(&mut self, element: Element) -> Result<(), XmlError> {
    if self.open.is_empty() && self.root.is_some() {
      return Err(XmlError::MultipleRootElements);
    }
    self.open.push(element);
    Ok(())
  }

  fn end(&mut self) -> Result<(), XmlError> {
    let element = self.open.pop().ok_or(XmlError::NoRootElement)?;
    let name = element.name.clone();
    let value = element.into_value();
    match self.open.last_mut() {
      Some(parent) => parent.push_child(name, value),
      None => self.root = Some((name, value)),
    }
    Ok(())
  }

  fn text(&mut self, text: &str) -> Result<(), XmlError> {
    match self.open.last_mut() {
      Some(element) => element.text.push_str(text),
      None if text.trim().is_empty() => {}
      None => return Err(XmlError::TextOutsideRoot),
    }
    Ok(())
  }

  fn finish(self) -> Result<Value, XmlError> {
    if let Some(element) = self.open.last() {
      return Err(XmlError::UnclosedElement(element.name.clone()));
    }
    let (name, value) = self.root.ok_or(XmlError::NoRootElement)?;
    let mut document = Map::new();
    document.insert(name, value);
    Ok(Value::Object(document))
  }
}

pub fn xml_to_value(body: &str) -> Result<Value, XmlError> {
  let mut reader = Reader::from_str(body);
  let mut tree = TreeBuilder::default();

  loop {
    match reader.read_event()? {
      Event::Start(start) => tree.start(Element::open(&start)?)?,
      Event::Empty(start) => {
        tree.start(Element::open(&start)?)?;
        tree.end()?;
      }
      Event::End(_) => tree.end()?,
      Event::Text(text) => tree.text(&text.unescape()?)?,
      Event::CData(data) => tree.text(&String::from_utf8_lossy(&data.into_inner()))?,
      Event::Eof => break,
      _ => {}
    }
  }

  tree.finish()
}
