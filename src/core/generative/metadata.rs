//! Upload Pack Generation
//!
//! Parameters and payload for the metadata "upload pack": titles,
//! description, tags, hashtags, pinned comment, and thumbnail concepts for a
//! single video upload. The provider is asked for structured JSON output
//! conforming to a declared schema, then decoded into [`UploadPack`].

use serde::{Deserialize, Serialize};

use crate::core::{CoreError, CoreResult};

/// Expected number of title options
pub const EXPECTED_TITLES: usize = 3;

/// Expected number of thumbnail concepts
pub const EXPECTED_THUMBNAIL_CONCEPTS: usize = 4;

/// Parameters for an upload pack request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPackParams {
    /// Target keywords driving titles, tags, and description
    pub keywords: String,
    /// Optional script or context to ground the metadata in
    pub script: Option<String>,
}

impl UploadPackParams {
    /// Creates new params from keywords
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            script: None,
        }
    }

    /// Attaches a script/context; blank scripts are treated as absent
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        let script = script.into();
        self.script = if script.trim().is_empty() {
            None
        } else {
            Some(script)
        };
        self
    }

    /// Validates the parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.keywords.trim().is_empty() {
            return Err("Keywords cannot be empty".to_string());
        }
        Ok(())
    }

    /// Builds the natural-language instruction for the provider
    pub fn instruction(&self) -> String {
        let context = match &self.script {
            Some(script) => format!("Keywords: {}\nScript/Context: {}", self.keywords, script),
            None => format!("Keywords: {}", self.keywords),
        };

        format!(
            "You are a world-class YouTube Strategist optimized for 2025 SEO.\n\
             \n\
             Context:\n\
             {}\n\
             \n\
             Task: Generate a complete metadata upload package.\n\
             1. Create {} highly viral, click-driven titles.\n\
             2. Write an SEO-optimized description (200-300 words).\n\
             3. Generate a list of comma-separated tags (500 chars limit logic).\n\
             4. Generate relevant hashtags.\n\
             5. Write a high-CTR pinned comment to engage viewers.\n\
             6. Describe {} visual concepts for high CTR thumbnails.",
            context, EXPECTED_TITLES, EXPECTED_THUMBNAIL_CONCEPTS
        )
    }

    /// Structured-output schema declaring the six required fields
    pub fn response_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "titles": { "type": "ARRAY", "items": { "type": "STRING" } },
                "description": { "type": "STRING" },
                "tags": { "type": "ARRAY", "items": { "type": "STRING" } },
                "hashtags": { "type": "ARRAY", "items": { "type": "STRING" } },
                "pinnedComment": { "type": "STRING" },
                "thumbnailConcepts": { "type": "ARRAY", "items": { "type": "STRING" } }
            },
            "required": [
                "titles",
                "description",
                "tags",
                "hashtags",
                "pinnedComment",
                "thumbnailConcepts"
            ]
        })
    }
}

/// Complete metadata pack for one upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPack {
    /// Title options, exactly [`EXPECTED_TITLES`] entries
    pub titles: Vec<String>,
    /// SEO description
    pub description: String,
    /// Comma-separable tags
    pub tags: Vec<String>,
    /// Hashtags
    pub hashtags: Vec<String>,
    /// Pinned comment text
    pub pinned_comment: String,
    /// Thumbnail concepts, exactly [`EXPECTED_THUMBNAIL_CONCEPTS`] entries
    pub thumbnail_concepts: Vec<String>,
}

impl UploadPack {
    /// Decodes the provider's JSON text into a fully populated pack.
    ///
    /// Malformed JSON or wrong field cardinality fails with a decode error;
    /// a partially populated pack is never returned.
    pub fn from_json(text: &str) -> CoreResult<Self> {
        let pack: UploadPack = serde_json::from_str(text)
            .map_err(|e| CoreError::Decode(format!("Malformed upload pack payload: {}", e)))?;
        pack.check_shape()?;
        Ok(pack)
    }

    fn check_shape(&self) -> CoreResult<()> {
        if self.titles.len() != EXPECTED_TITLES {
            return Err(CoreError::Decode(format!(
                "Expected {} titles, got {}",
                EXPECTED_TITLES,
                self.titles.len()
            )));
        }
        if self.thumbnail_concepts.len() != EXPECTED_THUMBNAIL_CONCEPTS {
            return Err(CoreError::Decode(format!(
                "Expected {} thumbnail concepts, got {}",
                EXPECTED_THUMBNAIL_CONCEPTS,
                self.thumbnail_concepts.len()
            )));
        }
        if self.description.trim().is_empty() {
            return Err(CoreError::Decode("Description is empty".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_pack_json() -> String {
        serde_json::json!({
            "titles": ["T1", "T2", "T3"],
            "description": "A long SEO description.",
            "tags": ["ai", "automation"],
            "hashtags": ["#ai"],
            "pinnedComment": "What would you automate first?",
            "thumbnailConcepts": ["C1", "C2", "C3", "C4"]
        })
        .to_string()
    }

    #[test]
    fn test_params_validate() {
        assert!(UploadPackParams::new("ai automation").validate().is_ok());
        assert!(UploadPackParams::new("   ").validate().is_err());
        assert!(UploadPackParams::new("").validate().is_err());
    }

    #[test]
    fn test_blank_script_treated_as_absent() {
        let params = UploadPackParams::new("ai automation").with_script("");
        assert!(params.script.is_none());

        let params = UploadPackParams::new("ai automation").with_script("Full script text");
        assert_eq!(params.script.as_deref(), Some("Full script text"));
    }

    #[test]
    fn test_instruction_embeds_keywords_and_script() {
        let params = UploadPackParams::new("ai automation").with_script("my script");
        let prompt = params.instruction();
        assert!(prompt.contains("Keywords: ai automation"));
        assert!(prompt.contains("Script/Context: my script"));
        assert!(prompt.contains("3 highly viral"));
        assert!(prompt.contains("4 visual concepts"));

        let no_script = UploadPackParams::new("ai automation").instruction();
        assert!(!no_script.contains("Script/Context"));
    }

    #[test]
    fn test_response_schema_declares_required_fields() {
        let schema = UploadPackParams::response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();

        for field in [
            "titles",
            "description",
            "tags",
            "hashtags",
            "pinnedComment",
            "thumbnailConcepts",
        ] {
            assert!(required.contains(&field), "missing required field {field}");
            assert!(schema["properties"][field].is_object());
        }
    }

    #[test]
    fn test_from_json_valid() {
        let pack = UploadPack::from_json(&valid_pack_json()).unwrap();
        assert_eq!(pack.titles.len(), EXPECTED_TITLES);
        assert_eq!(pack.thumbnail_concepts.len(), EXPECTED_THUMBNAIL_CONCEPTS);
        assert!(!pack.description.is_empty());
        assert_eq!(pack.pinned_comment, "What would you automate first?");
    }

    #[test]
    fn test_from_json_malformed_is_decode_error() {
        let err = UploadPack::from_json("not json at all").unwrap_err();
        assert!(matches!(err, CoreError::Decode(_)));
    }

    #[test]
    fn test_from_json_missing_field_is_decode_error() {
        let err = UploadPack::from_json(r#"{"titles":["a","b","c"]}"#).unwrap_err();
        assert!(matches!(err, CoreError::Decode(_)));
    }

    #[test]
    fn test_from_json_wrong_cardinality_never_partial() {
        let mut value: serde_json::Value = serde_json::from_str(&valid_pack_json()).unwrap();
        value["titles"] = serde_json::json!(["only one"]);
        let err = UploadPack::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, CoreError::Decode(_)));

        let mut value: serde_json::Value = serde_json::from_str(&valid_pack_json()).unwrap();
        value["thumbnailConcepts"] = serde_json::json!(["C1", "C2"]);
        let err = UploadPack::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, CoreError::Decode(_)));
    }

    #[test]
    fn test_pack_roundtrip_uses_camel_case() {
        let pack = UploadPack::from_json(&valid_pack_json()).unwrap();
        let json = serde_json::to_string(&pack).unwrap();
        assert!(json.contains("\"pinnedComment\""));
        assert!(json.contains("\"thumbnailConcepts\""));
    }
}
