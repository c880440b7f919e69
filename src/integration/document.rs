// src/integration/document.rs
//! The linear document tree produced by the text pipeline. Only paragraphs
//! are inspected; every other element is carried through untouched.

use serde::de::Error as _;
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

const TYPE_KEYS: &[&str] = &["type", "tipo"];
const TEXT_KEYS: &[&str] = &["text", "texto"];
const PARAGRAPH_TYPES: &[&str] = &["paragraph", "paragrafo"];
pub const TABLE_TYPE: &str = "table";
const TABLE_TYPE_PT: &str = "tabela";

/// Table block keys as (English, Portuguese).
const TABLE_KEYS: &[(&str, &str)] = &[
    ("type", "tipo"),
    ("recognized_subtype", "tipo_tabela_identificado"),
    ("title", "titulo"),
    ("header_labels", "cabecalho"),
    ("rows", "linhas"),
    ("semantic_summary", "resumo_semantico"),
    ("legend", "legenda"),
    ("source_page", "pagina_origem"),
];

/// Key vocabulary of a document tree. Read from the root key and used again
/// on write, so inserted blocks match the elements around them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    #[default]
    English,
    Portuguese,
}

impl Dialect {
    pub fn root_key(&self) -> &'static str {
        match self {
            Dialect::English => "structure",
            Dialect::Portuguese => "estrutura",
        }
    }

    fn from_root_key(key: &str) -> Option<Self> {
        match key {
            "structure" => Some(Dialect::English),
            "estrutura" => Some(Dialect::Portuguese),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTree {
    pub elements: Vec<DocumentElement>,
    /// Any other top-level fields (title, source file, ...), in input order.
    pub metadata: Map<String, Value>,
    pub dialect: Dialect,
    /// Index of the element list among the top-level keys.
    elements_position: usize,
}

impl DocumentTree {
    pub fn new(elements: Vec<DocumentElement>) -> Self {
        Self {
            elements,
            metadata: Map::new(),
            dialect: Dialect::English,
            elements_position: 0,
        }
    }
}

impl Serialize for DocumentTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let elements = self
            .elements
            .iter()
            .map(|element| element.to_value_in(self.dialect))
            .collect::<Result<Vec<Value>, _>>()
            .map_err(S::Error::custom)?;

        let mut map = serializer.serialize_map(Some(self.metadata.len() + 1))?;
        let position = self.elements_position.min(self.metadata.len());
        for (index, (key, value)) in self.metadata.iter().enumerate() {
            if index == position {
                map.serialize_entry(self.dialect.root_key(), &elements)?;
            }
            map.serialize_entry(key, value)?;
        }
        if position == self.metadata.len() {
            map.serialize_entry(self.dialect.root_key(), &elements)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DocumentTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;

        let mut found = None;
        let mut metadata = Map::new();
        for (key, value) in map {
            match Dialect::from_root_key(&key) {
                Some(dialect) if found.is_none() => found = Some((dialect, metadata.len(), value)),
                _ => {
                    metadata.insert(key, value);
                }
            }
        }

        let Some((dialect, elements_position, value)) = found else {
            return Err(D::Error::missing_field("structure"));
        };
        let elements = Vec::<DocumentElement>::deserialize(value).map_err(D::Error::custom)?;

        Ok(Self {
            elements,
            metadata,
            dialect,
            elements_position,
        })
    }
}

/// Normalized table block written in place of a placeholder paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub recognized_subtype: String,
    pub title: String,
    pub header_labels: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    pub semantic_summary: Option<String>,
    pub legend: Option<String>,
    pub source_page: u32,
}

impl TableBlock {
    fn to_value_in(&self, dialect: Dialect) -> Result<Value, serde_json::Error> {
        match (dialect, serde_json::to_value(self)?) {
            (Dialect::Portuguese, Value::Object(mut map)) => {
                let mut renamed = Map::new();
                for (english, portuguese) in TABLE_KEYS {
                    if let Some(field) = map.remove(*english) {
                        renamed.insert(portuguese.to_string(), field);
                    }
                }
                renamed.insert("tipo".to_string(), Value::String(TABLE_TYPE_PT.to_string()));
                Ok(Value::Object(renamed))
            }
            (_, value) => Ok(value),
        }
    }

    fn from_portuguese(map: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut renamed = Map::new();
        for (english, portuguese) in TABLE_KEYS {
            if let Some(field) = map.get(*portuguese) {
                renamed.insert(english.to_string(), field.clone());
            }
        }
        renamed.insert("type".to_string(), Value::String(TABLE_TYPE.to_string()));
        serde_json::from_value(Value::Object(renamed))
    }
}

/// A paragraph keeps its original object so it serializes back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    text: String,
    raw: Map<String, Value>,
}

impl Paragraph {
    pub fn new(text: &str) -> Self {
        let mut raw = Map::new();
        raw.insert("type".to_string(), Value::String("paragraph".to_string()));
        raw.insert("text".to_string(), Value::String(text.to_string()));
        Self {
            text: text.to_string(),
            raw,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentElement {
    Paragraph(Paragraph),
    Table(TableBlock),
    Other(Value),
}

impl DocumentElement {
    pub fn paragraph(text: &str) -> Self {
        DocumentElement::Paragraph(Paragraph::new(text))
    }

    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            return DocumentElement::Other(value);
        };

        let kind = TYPE_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string);

        match kind.as_deref() {
            Some(kind) if PARAGRAPH_TYPES.contains(&kind) => {
                let text = TEXT_KEYS
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
                    .map(str::to_string);
                match text {
                    Some(text) => DocumentElement::Paragraph(Paragraph { text, raw: map }),
                    None => DocumentElement::Other(Value::Object(map)),
                }
            }
            Some(TABLE_TYPE) => match serde_json::from_value::<TableBlock>(Value::Object(map.clone())) {
                Ok(block) => DocumentElement::Table(block),
                Err(_) => DocumentElement::Other(Value::Object(map)),
            },
            Some(TABLE_TYPE_PT) => match TableBlock::from_portuguese(&map) {
                Ok(block) => DocumentElement::Table(block),
                Err(_) => DocumentElement::Other(Value::Object(map)),
            },
            _ => DocumentElement::Other(Value::Object(map)),
        }
    }

    /// JSON form of the element; table blocks take the tree's key vocabulary.
    pub fn to_value_in(&self, dialect: Dialect) -> Result<Value, serde_json::Error> {
        match self {
            DocumentElement::Paragraph(paragraph) => Ok(Value::Object(paragraph.raw.clone())),
            DocumentElement::Table(block) => block.to_value_in(dialect),
            DocumentElement::Other(value) => Ok(value.clone()),
        }
    }
}

impl Serialize for DocumentElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DocumentElement::Paragraph(paragraph) => paragraph.raw.serialize(serializer),
            DocumentElement::Table(block) => block.serialize(serializer),
            DocumentElement::Other(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DocumentElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(DocumentElement::from_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_round_trip_unchanged() {
        let json = r#"{"titulo":"PPC","estrutura":[{"tipo":"capitulo","numero":1},{"tipo":"paragrafo","texto":"Calendário Acadêmico","pagina":5},{"type":"paragraph","text":"Hello","style":"bold"},"loose string"]}"#;
        let tree: DocumentTree = serde_json::from_str(json).unwrap();

        assert_eq!(tree.elements.len(), 4);
        assert!(matches!(tree.elements[0], DocumentElement::Other(_)));
        let DocumentElement::Paragraph(p) = &tree.elements[1] else {
            panic!("expected paragraph");
        };
        assert_eq!(p.text(), "Calendário Acadêmico");
        assert!(matches!(tree.elements[3], DocumentElement::Other(Value::String(_))));

        let paragraph_json = serde_json::to_string(&tree.elements[2]).unwrap();
        assert_eq!(paragraph_json, r#"{"type":"paragraph","text":"Hello","style":"bold"}"#);
        assert_eq!(tree.metadata["titulo"], "PPC");
    }

    #[test]
    fn test_table_blocks_are_recognized() {
        let json = r#"{"type":"table","recognized_subtype":"calendar","title":"T","header_labels":[],"rows":[],"semantic_summary":null,"legend":null,"source_page":3}"#;
        let element: DocumentElement = serde_json::from_str(json).unwrap();
        let DocumentElement::Table(block) = &element else {
            panic!("expected table block");
        };
        assert_eq!(block.source_page, 3);
        assert_eq!(serde_json::to_string(&element).unwrap(), json);
    }

    #[test]
    fn test_paragraph_without_text_is_passed_through() {
        let element = DocumentElement::from_value(serde_json::json!({"type": "paragraph"}));
        assert!(matches!(element, DocumentElement::Other(_)));
    }

    #[test]
    fn test_portuguese_tree_written_back_in_its_own_keys() {
        let json = r#"{"titulo":"PPC","estrutura":[{"tipo":"paragrafo","texto":"Introdução"}],"autor":"Colegiado"}"#;
        let mut tree: DocumentTree = serde_json::from_str(json).unwrap();
        assert_eq!(tree.dialect, Dialect::Portuguese);
        assert_eq!(serde_json::to_string(&tree).unwrap(), json);

        tree.elements.push(DocumentElement::Table(TableBlock {
            kind: TABLE_TYPE.to_string(),
            recognized_subtype: "calendar".to_string(),
            title: "MARÇO".to_string(),
            header_labels: vec![],
            rows: vec![],
            semantic_summary: None,
            legend: None,
            source_page: 5,
        }));
        let written = serde_json::to_string(&tree).unwrap();
        assert!(written.starts_with(r#"{"titulo":"PPC","estrutura":[{"tipo":"paragrafo","texto":"Introdução"},{"tipo":"tabela","tipo_tabela_identificado":"calendar","titulo":"MARÇO","cabecalho":[],"linhas":[]"#));
        assert!(written.ends_with(r#""pagina_origem":5}],"autor":"Colegiado"}"#));
        assert!(!written.contains("\"structure\""));

        let reread: DocumentTree = serde_json::from_str(&written).unwrap();
        assert_eq!(reread, tree);
    }

    #[test]
    fn test_tree_without_element_list_is_rejected() {
        assert!(serde_json::from_str::<DocumentTree>(r#"{"titulo":"PPC"}"#).is_err());
    }
}
