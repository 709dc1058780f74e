//! Review-point library as served by `/api/review-points`.
//!
//! Chapters come in three shapes: a plain list of points, a document outline
//! listing the chapters a plan must contain, or a map of named sub-points.
//! Each shape gets its own [`Chapter`] variant so callers dispatch on the tag
//! instead of inspecting JSON at render time.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

const REQUIRED_CHAPTERS_KEY: &str = "必含章节";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPoints {
    chapters: IndexMap<String, Chapter>,
    /// Lowercased JSON of each chapter as served, including entries the
    /// typed model leaves out.
    search_text: IndexMap<String, String>,
}

impl ReviewPoints {
    pub fn new(chapters: IndexMap<String, Chapter>) -> Self {
        let search_text = chapters
            .iter()
            .map(|(name, chapter)| {
                let text = serde_json::to_string(chapter).unwrap_or_default();
                (name.clone(), text.to_lowercase())
            })
            .collect();
        Self {
            chapters,
            search_text,
        }
    }

    pub fn chapter(&self, name: &str) -> Option<&Chapter> {
        self.chapters.get(name)
    }

    pub fn chapter_names(&self) -> impl Iterator<Item = &str> {
        self.chapters.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Chapter)> {
        self.chapters.iter().map(|(name, chapter)| (name.as_str(), chapter))
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Chapters whose name or content contains `term`, case-insensitively,
    /// in library order. A blank term matches every chapter.
    pub fn search(&self, term: &str) -> Vec<&str> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.chapter_names().collect();
        }

        self.chapters
            .keys()
            .filter(|name| {
                name.to_lowercase().contains(&needle)
                    || self
                        .search_text
                        .get(name.as_str())
                        .is_some_and(|text| text.contains(&needle))
            })
            .map(String::as_str)
            .collect()
    }
}

impl Serialize for ReviewPoints {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.chapters.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ReviewPoints {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut chapters = IndexMap::with_capacity(raw.len());
        let mut search_text = IndexMap::with_capacity(raw.len());
        for (name, value) in raw {
            search_text.insert(name.clone(), value.to_string().to_lowercase());
            let chapter = Chapter::from_value(value).map_err(serde::de::Error::custom)?;
            chapters.insert(name, chapter);
        }
        Ok(Self {
            chapters,
            search_text,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Chapter {
    Flat(Vec<PointItem>),
    Outline(ChapterOutline),
    Grouped(IndexMap<String, PointDetail>),
}

impl Chapter {
    fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Array(_) => Ok(Chapter::Flat(serde_json::from_value(value)?)),
            Value::Object(map) if map.contains_key(REQUIRED_CHAPTERS_KEY) => {
                Ok(Chapter::Outline(serde_json::from_value(Value::Object(map))?))
            }
            Value::Object(map) => {
                let mut points = IndexMap::new();
                for (name, entry) in map {
                    // Scalar entries carry no point data.
                    if entry.is_object() {
                        points.insert(name, serde_json::from_value(entry)?);
                    }
                }
                Ok(Chapter::Grouped(points))
            }
            Value::String(text) => Ok(Chapter::Flat(vec![PointItem::Text(text)])),
            _ => Ok(Chapter::Flat(Vec::new())),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Chapter::Flat(items) => items.is_empty(),
            Chapter::Outline(outline) => outline.required_chapters.is_empty(),
            Chapter::Grouped(points) => points.is_empty(),
        }
    }
}

impl<'de> Deserialize<'de> for Chapter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Chapter::from_value(value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointItem {
    Text(String),
    Detail(PointDetail),
    Other(Value),
}

/// Document-completeness chapter: the sections a plan must contain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapterOutline {
    #[serde(rename = "必含章节", default, deserialize_with = "string_list")]
    pub required_chapters: Vec<String>,
    #[serde(rename = "审核标准", default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub criterion: Option<String>,
    #[serde(rename = "严重程度", default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointDetail {
    #[serde(rename = "必含内容", default, deserialize_with = "string_list")]
    pub required_content: Vec<String>,
    #[serde(rename = "审核重点", default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    #[serde(rename = "严重程度", default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(rename = "参考标准", default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Free-text fields: strings pass through, other values are rendered as
/// JSON text, null is absent.
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(text) => text,
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    })
}

/// Lists that arrive as anything other than an array are treated as empty.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn library() -> ReviewPoints {
        serde_json::from_value(json!({
            "文档完整性": {
                "必含章节": ["编制依据", "工程概况", "施工部署"],
                "审核标准": "章节齐全",
                "严重程度": "严重"
            },
            "工程概况": {
                "工程规模": {
                    "必含内容": ["面积", "工期"],
                    "审核重点": "数据一致",
                    "严重程度": "一般"
                },
                "备注": "not a point",
                "参建单位": {
                    "必含内容": "should be a list",
                    "参考标准": "GB 50300"
                }
            },
            "安全管理": [
                "设置安全员",
                {"必含内容": ["应急预案"], "严重程度": "严重"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn chapters_keep_library_order() {
        let points = library();
        let names: Vec<&str> = points.chapter_names().collect();
        assert_eq!(names, vec!["文档完整性", "工程概况", "安全管理"]);
    }

    #[test]
    fn object_with_required_chapters_is_an_outline() {
        let points = library();
        match points.chapter("文档完整性").unwrap() {
            Chapter::Outline(outline) => {
                assert_eq!(outline.required_chapters.len(), 3);
                assert_eq!(outline.criterion.as_deref(), Some("章节齐全"));
                assert_eq!(outline.severity.as_deref(), Some("严重"));
            }
            other => panic!("unexpected chapter shape: {other:?}"),
        }
    }

    #[test]
    fn grouped_chapter_skips_scalar_entries() {
        let points = library();
        let Chapter::Grouped(sub_points) = points.chapter("工程概况").unwrap() else {
            panic!("expected grouped chapter");
        };
        let names: Vec<&String> = sub_points.keys().collect();
        assert_eq!(names, vec!["工程规模", "参建单位"]);
        assert_eq!(sub_points["工程规模"].required_content, vec!["面积", "工期"]);
        assert!(sub_points["参建单位"].required_content.is_empty());
        assert_eq!(sub_points["参建单位"].reference.as_deref(), Some("GB 50300"));
    }

    #[test]
    fn array_chapter_is_flat() {
        let points = library();
        let Chapter::Flat(items) = points.chapter("安全管理").unwrap() else {
            panic!("expected flat chapter");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], PointItem::Text("设置安全员".into()));
        assert!(matches!(&items[1], PointItem::Detail(detail) if detail.severity.as_deref() == Some("严重")));
    }

    #[test]
    fn search_matches_names_and_content() {
        let points = library();
        assert_eq!(points.search("安全"), vec!["安全管理"]);
        assert_eq!(points.search("gb 50300"), vec!["工程概况"]);
        assert_eq!(points.search("应急预案"), vec!["安全管理"]);
        assert_eq!(points.search("  ").len(), 3);
        assert!(points.search("nothing like this").is_empty());
    }

    #[test]
    fn search_covers_entries_outside_the_typed_model() {
        let points = library();
        assert_eq!(points.search("NOT A POINT"), vec!["工程概况"]);

        let points: ReviewPoints = serde_json::from_value(json!({
            "工程概况": {"工程规模": {"必含内容": ["面积"]}, "备注": "含地下室"},
            "安全管理": ["设置安全员"]
        }))
        .unwrap();
        assert_eq!(points.search("地下室"), vec!["工程概况"]);
    }

    #[test]
    fn non_string_text_fields_are_kept_as_text() {
        let points: ReviewPoints = serde_json::from_value(json!({
            "工程概况": {
                "工程规模": {
                    "必含内容": ["面积"],
                    "审核重点": ["数据一致", "单位统一"],
                    "严重程度": null,
                    "参考标准": 50300
                }
            },
            "文档完整性": {"必含章节": ["编制依据"], "审核标准": {"最少": 3}}
        }))
        .unwrap();

        let Chapter::Grouped(sub_points) = points.chapter("工程概况").unwrap() else {
            panic!("expected grouped chapter");
        };
        let detail = &sub_points["工程规模"];
        assert_eq!(detail.focus.as_deref(), Some("数据一致, 单位统一"));
        assert_eq!(detail.severity, None);
        assert_eq!(detail.reference.as_deref(), Some("50300"));

        let Chapter::Outline(outline) = points.chapter("文档完整性").unwrap() else {
            panic!("expected outline chapter");
        };
        assert_eq!(outline.criterion.as_deref(), Some(r#"{"最少":3}"#));
    }
}
